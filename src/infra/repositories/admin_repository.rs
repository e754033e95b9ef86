//! Admin repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::admin::{self, ActiveModel, Entity as AdminEntity};
use crate::domain::Admin;
use crate::errors::{AppError, AppResult};

/// Admin repository trait
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Admin>>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Admin>>;

    async fn create(&self, email: String, password_hash: String) -> AppResult<Admin>;

    /// Insert, or refresh the password hash when the email already exists
    async fn create_if_not_exists(&self, email: String, password_hash: String) -> AppResult<Admin>;
}

/// SeaORM-backed admin repository
pub struct AdminStore {
    db: DatabaseConnection,
}

impl AdminStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AdminRepository for AdminStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Admin>> {
        let model = AdminEntity::find()
            .filter(admin::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(model.map(Admin::from))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Admin>> {
        let model = AdminEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(model.map(Admin::from))
    }

    async fn create(&self, email: String, password_hash: String) -> AppResult<Admin> {
        let active_model = ActiveModel {
            email: Set(email.trim().to_lowercase()),
            password_hash: Set(password_hash),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Admin::from(model))
    }

    async fn create_if_not_exists(&self, email: String, password_hash: String) -> AppResult<Admin> {
        let email = email.trim().to_lowercase();
        let active_model = ActiveModel {
            email: Set(email.clone()),
            password_hash: Set(password_hash),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        AdminEntity::insert(active_model)
            .on_conflict(
                OnConflict::column(admin::Column::Email)
                    .update_column(admin::Column::PasswordHash)
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(AppError::from)?;

        self.find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::internal("Admin could not be read back"))
    }
}

impl From<admin::Model> for Admin {
    fn from(model: admin::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            created_at: model.created_at,
        }
    }
}
