//! External identity repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::user::Entity as UserEntity;
use super::entities::user_identity::{self, ActiveModel, Entity as IdentityEntity};
use crate::domain::{ExternalIdentity, User};
use crate::errors::{AppError, AppResult};

/// Identity repository trait
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// The account linked to a provider identity
    async fn find_user_by_identity(
        &self,
        provider: &str,
        provider_user_id: &str,
    ) -> AppResult<Option<User>>;

    async fn find_identity(
        &self,
        provider: &str,
        provider_user_id: &str,
    ) -> AppResult<Option<ExternalIdentity>>;

    /// Link an identity; linking an existing pair again is a no-op
    async fn link_identity(
        &self,
        user_id: i64,
        provider: &str,
        provider_user_id: &str,
        email: Option<String>,
    ) -> AppResult<ExternalIdentity>;

    async fn count_for_user(&self, user_id: i64) -> AppResult<u64>;
}

/// SeaORM-backed identity repository
pub struct IdentityStore {
    db: DatabaseConnection,
}

impl IdentityStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IdentityRepository for IdentityStore {
    async fn find_user_by_identity(
        &self,
        provider: &str,
        provider_user_id: &str,
    ) -> AppResult<Option<User>> {
        find_user_by_identity(&self.db, provider, provider_user_id).await
    }

    async fn find_identity(
        &self,
        provider: &str,
        provider_user_id: &str,
    ) -> AppResult<Option<ExternalIdentity>> {
        find_identity(&self.db, provider, provider_user_id).await
    }

    async fn link_identity(
        &self,
        user_id: i64,
        provider: &str,
        provider_user_id: &str,
        email: Option<String>,
    ) -> AppResult<ExternalIdentity> {
        link_identity(&self.db, user_id, provider, provider_user_id, email).await
    }

    async fn count_for_user(&self, user_id: i64) -> AppResult<u64> {
        count_for_user(&self.db, user_id).await
    }
}

pub(crate) async fn find_user_by_identity<C: ConnectionTrait>(
    db: &C,
    provider: &str,
    provider_user_id: &str,
) -> AppResult<Option<User>> {
    let model = UserEntity::find()
        .inner_join(IdentityEntity)
        .filter(user_identity::Column::Provider.eq(provider))
        .filter(user_identity::Column::ProviderUserId.eq(provider_user_id))
        .one(db)
        .await
        .map_err(AppError::from)?;

    Ok(model.map(User::from))
}

pub(crate) async fn find_identity<C: ConnectionTrait>(
    db: &C,
    provider: &str,
    provider_user_id: &str,
) -> AppResult<Option<ExternalIdentity>> {
    let model = IdentityEntity::find()
        .filter(user_identity::Column::Provider.eq(provider))
        .filter(user_identity::Column::ProviderUserId.eq(provider_user_id))
        .one(db)
        .await
        .map_err(AppError::from)?;

    Ok(model.map(ExternalIdentity::from))
}

pub(crate) async fn link_identity<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
    provider: &str,
    provider_user_id: &str,
    email: Option<String>,
) -> AppResult<ExternalIdentity> {
    let active_model = ActiveModel {
        user_id: Set(user_id),
        provider: Set(provider.to_string()),
        provider_user_id: Set(provider_user_id.to_string()),
        email: Set(email),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let inserted = IdentityEntity::insert(active_model)
        .on_conflict(
            OnConflict::columns([
                user_identity::Column::Provider,
                user_identity::Column::ProviderUserId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(db)
        .await
        .map_err(AppError::from)?;

    if inserted == 0 {
        tracing::debug!(provider, user_id, "Identity already linked");
    }

    find_identity(db, provider, provider_user_id)
        .await?
        .ok_or_else(|| AppError::internal("Linked identity could not be read back"))
}

pub(crate) async fn count_for_user<C: ConnectionTrait>(db: &C, user_id: i64) -> AppResult<u64> {
    IdentityEntity::find()
        .filter(user_identity::Column::UserId.eq(user_id))
        .count(db)
        .await
        .map_err(AppError::from)
}

impl From<user_identity::Model> for ExternalIdentity {
    fn from(model: user_identity::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            provider: model.provider,
            provider_user_id: model.provider_user_id,
            email: model.email,
            created_at: model.created_at,
        }
    }
}
