//! Pricing plan repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::pricing_plan::{self, ActiveModel, Entity as PricingPlanEntity};
use super::json_list;
use crate::domain::{NewPricingPlan, PricingPlan, PricingPlanPatch};
use crate::errors::{AppError, AppResult};

/// Pricing plan repository trait
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PricingRepository: Send + Sync {
    async fn find_all(&self) -> AppResult<Vec<PricingPlan>>;

    async fn find_active(&self) -> AppResult<Vec<PricingPlan>>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<PricingPlan>>;

    /// Fails with `Conflict` when the plan name is taken
    async fn create(&self, plan: NewPricingPlan) -> AppResult<PricingPlan>;

    async fn update(&self, id: i64, patch: PricingPlanPatch) -> AppResult<Option<PricingPlan>>;

    async fn remove(&self, id: i64) -> AppResult<bool>;

    async fn count(&self) -> AppResult<u64>;
}

/// SeaORM-backed pricing plan repository
pub struct PricingStore {
    db: DatabaseConnection,
}

impl PricingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PricingRepository for PricingStore {
    async fn find_all(&self) -> AppResult<Vec<PricingPlan>> {
        let models = PricingPlanEntity::find()
            .order_by_asc(pricing_plan::Column::SortOrder)
            .order_by_asc(pricing_plan::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(PricingPlan::from).collect())
    }

    async fn find_active(&self) -> AppResult<Vec<PricingPlan>> {
        let models = PricingPlanEntity::find()
            .filter(pricing_plan::Column::IsActive.eq(true))
            .order_by_asc(pricing_plan::Column::SortOrder)
            .order_by_asc(pricing_plan::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(PricingPlan::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<PricingPlan>> {
        let model = PricingPlanEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(model.map(PricingPlan::from))
    }

    async fn create(&self, plan: NewPricingPlan) -> AppResult<PricingPlan> {
        let now = Utc::now();
        let active_model = ActiveModel {
            name: Set(plan.name),
            price_monthly: Set(plan.price_monthly),
            features_json: Set(json_list::encode(&plan.features)?),
            is_popular: Set(plan.is_popular),
            is_active: Set(plan.is_active),
            sort_order: Set(plan.sort_order),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(PricingPlan::from(model))
    }

    async fn update(&self, id: i64, patch: PricingPlanPatch) -> AppResult<Option<PricingPlan>> {
        let Some(existing) = PricingPlanEntity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(price) = patch.price_monthly {
            active.price_monthly = Set(price);
        }
        if let Some(features) = patch.features {
            active.features_json = Set(json_list::encode(&features)?);
        }
        if let Some(is_popular) = patch.is_popular {
            active.is_popular = Set(is_popular);
        }
        if let Some(is_active) = patch.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(sort_order) = patch.sort_order {
            active.sort_order = Set(sort_order);
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Some(PricingPlan::from(model)))
    }

    async fn remove(&self, id: i64) -> AppResult<bool> {
        let result = PricingPlanEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        PricingPlanEntity::find()
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}

impl From<pricing_plan::Model> for PricingPlan {
    fn from(model: pricing_plan::Model) -> Self {
        Self {
            features: json_list::decode(model.features_json.as_deref(), "features_json", model.id),
            id: model.id,
            name: model.name,
            price_monthly: model.price_monthly,
            is_popular: model.is_popular,
            is_active: model.is_active,
            sort_order: model.sort_order,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
