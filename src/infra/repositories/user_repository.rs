//! Customer account repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUser, User, UserPatch};
use crate::errors::{AppError, AppResult};

/// User repository trait
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Fails with `Conflict("Email")` when the email is taken
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Apply present fields; `None` when the id does not exist
    async fn update(&self, id: i64, patch: UserPatch) -> AppResult<Option<User>>;
}

/// SeaORM-backed user repository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        find_by_id(&self.db, id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        find_by_email(&self.db, email).await
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        create(&self.db, user).await
    }

    async fn update(&self, id: i64, patch: UserPatch) -> AppResult<Option<User>> {
        update(&self.db, id, patch).await
    }
}

// Queries shared by the pooled store and the transactional repository.

pub(crate) async fn find_by_id<C: ConnectionTrait>(db: &C, id: i64) -> AppResult<Option<User>> {
    let model = UserEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(AppError::from)?;

    Ok(model.map(User::from))
}

pub(crate) async fn find_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> AppResult<Option<User>> {
    let model = UserEntity::find()
        .filter(user::Column::Email.eq(email.trim().to_lowercase()))
        .one(db)
        .await
        .map_err(AppError::from)?;

    Ok(model.map(User::from))
}

pub(crate) async fn create<C: ConnectionTrait>(db: &C, user: NewUser) -> AppResult<User> {
    let now = Utc::now();
    let active_model = ActiveModel {
        name: Set(user.name),
        email: Set(user.email.trim().to_lowercase()),
        password_hash: Set(user.password_hash),
        phone: Set(user.phone),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = active_model.insert(db).await.map_err(AppError::from)?;
    tracing::info!(user_id = model.id, "User account created");

    Ok(User::from(model))
}

pub(crate) async fn update<C: ConnectionTrait>(
    db: &C,
    id: i64,
    patch: UserPatch,
) -> AppResult<Option<User>> {
    let Some(existing) = UserEntity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    let mut active: ActiveModel = existing.into();
    if let Some(name) = patch.name {
        active.name = Set(name);
    }
    if let Some(email) = patch.email {
        active.email = Set(email.trim().to_lowercase());
    }
    if let Some(phone) = patch.phone {
        active.phone = Set(phone);
    }
    if let Some(password_hash) = patch.password_hash {
        active.password_hash = Set(password_hash);
    }
    active.updated_at = Set(Utc::now());

    let model = active.update(db).await.map_err(AppError::from)?;
    Ok(Some(User::from(model)))
}

impl From<user::Model> for User {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            password_hash: model.password_hash,
            phone: model.phone,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
