//! Catalog service repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::service::{self, ActiveModel, Entity as ServiceEntity};
use super::json_list;
use crate::domain::{NewService, Service, ServicePatch};
use crate::errors::{AppError, AppResult};

/// Service repository trait
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// Every service, ordered for display
    async fn find_all(&self) -> AppResult<Vec<Service>>;

    /// Active services, optionally restricted to one category
    async fn find_active(&self, category: Option<String>) -> AppResult<Vec<Service>>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Service>>;

    async fn create(&self, service: NewService) -> AppResult<Service>;

    /// Apply present fields; `None` when the id does not exist
    async fn update(&self, id: i64, patch: ServicePatch) -> AppResult<Option<Service>>;

    /// `true` when a row was deleted
    async fn remove(&self, id: i64) -> AppResult<bool>;

    async fn count(&self) -> AppResult<u64>;
}

/// SeaORM-backed service repository
pub struct ServiceStore {
    db: DatabaseConnection,
}

impl ServiceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ServiceRepository for ServiceStore {
    async fn find_all(&self) -> AppResult<Vec<Service>> {
        let models = ServiceEntity::find()
            .order_by_asc(service::Column::SortOrder)
            .order_by_asc(service::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Service::from).collect())
    }

    async fn find_active(&self, category: Option<String>) -> AppResult<Vec<Service>> {
        let mut query = ServiceEntity::find().filter(service::Column::IsActive.eq(true));
        if let Some(category) = category {
            query = query.filter(service::Column::Category.eq(category));
        }

        let models = query
            .order_by_asc(service::Column::SortOrder)
            .order_by_asc(service::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Service::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Service>> {
        let model = ServiceEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(model.map(Service::from))
    }

    async fn create(&self, service: NewService) -> AppResult<Service> {
        let now = Utc::now();
        let active_model = ActiveModel {
            category: Set(service.category),
            title: Set(service.title),
            description: Set(service.description),
            duration_mins: Set(service.duration_mins),
            starting_price: Set(service.starting_price),
            includes_json: Set(json_list::encode(&service.includes)?),
            is_active: Set(service.is_active),
            sort_order: Set(service.sort_order),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        tracing::debug!(service_id = model.id, "Service created");

        Ok(Service::from(model))
    }

    async fn update(&self, id: i64, patch: ServicePatch) -> AppResult<Option<Service>> {
        let Some(existing) = ServiceEntity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();
        if let Some(category) = patch.category {
            active.category = Set(category);
        }
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(duration) = patch.duration_mins {
            active.duration_mins = Set(duration);
        }
        if let Some(price) = patch.starting_price {
            active.starting_price = Set(price);
        }
        if let Some(includes) = patch.includes {
            active.includes_json = Set(json_list::encode(&includes)?);
        }
        if let Some(is_active) = patch.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(sort_order) = patch.sort_order {
            active.sort_order = Set(sort_order);
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Some(Service::from(model)))
    }

    async fn remove(&self, id: i64) -> AppResult<bool> {
        let result = ServiceEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        ServiceEntity::find()
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}

impl From<service::Model> for Service {
    fn from(model: service::Model) -> Self {
        Self {
            includes: json_list::decode(model.includes_json.as_deref(), "includes_json", model.id),
            id: model.id,
            category: model.category,
            title: model.title,
            description: model.description,
            duration_mins: model.duration_mins,
            starting_price: model.starting_price,
            is_active: model.is_active,
            sort_order: model.sort_order,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
