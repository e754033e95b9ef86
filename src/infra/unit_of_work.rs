//! Unit of Work: repository access and transaction management.
//!
//! Pooled repositories run each call as its own statement. Work that must be
//! atomic goes through [`UnitOfWork::transaction`], whose context hands out
//! repositories bound to a single database transaction.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ConnectionTrait, DatabaseBackend, DatabaseConnection, DatabaseTransaction,
    IsolationLevel, TransactionTrait,
};
use std::sync::Arc;

use super::repositories::{
    identity_repository, user_repository, AdminRepository, AdminStore, BookingRepository,
    BookingStore, IdentityRepository, IdentityStore, PricingRepository, PricingStore,
    ServiceRepository, ServiceStore, UserRepository, UserStore,
};
use crate::domain::{ExternalIdentity, NewUser, User, UserPatch};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Note: This trait is not mockable directly due to generic methods.
/// Tests implement it over mocked repositories instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn services(&self) -> Arc<dyn ServiceRepository>;

    fn pricing(&self) -> Arc<dyn PricingRepository>;

    fn bookings(&self) -> Arc<dyn BookingRepository>;

    fn users(&self) -> Arc<dyn UserRepository>;

    fn identities(&self) -> Arc<dyn IdentityRepository>;

    fn admins(&self) -> Arc<dyn AdminRepository>;

    /// Execute a closure within a transaction.
    ///
    /// Commits when the closure returns `Ok`; otherwise rolls back and
    /// returns the closure's error unchanged.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn users(&self) -> TxUserRepository<'_> {
        TxUserRepository { txn: self.txn }
    }

    pub fn identities(&self) -> TxIdentityRepository<'_> {
        TxIdentityRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    service_repo: Arc<ServiceStore>,
    pricing_repo: Arc<PricingStore>,
    booking_repo: Arc<BookingStore>,
    user_repo: Arc<UserStore>,
    identity_repo: Arc<IdentityStore>,
    admin_repo: Arc<AdminStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            service_repo: Arc::new(ServiceStore::new(db.clone())),
            pricing_repo: Arc::new(PricingStore::new(db.clone())),
            booking_repo: Arc::new(BookingStore::new(db.clone())),
            user_repo: Arc::new(UserStore::new(db.clone())),
            identity_repo: Arc::new(IdentityStore::new(db.clone())),
            admin_repo: Arc::new(AdminStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn services(&self) -> Arc<dyn ServiceRepository> {
        self.service_repo.clone()
    }

    fn pricing(&self) -> Arc<dyn PricingRepository> {
        self.pricing_repo.clone()
    }

    fn bookings(&self) -> Arc<dyn BookingRepository> {
        self.booking_repo.clone()
    }

    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn identities(&self) -> Arc<dyn IdentityRepository> {
        self.identity_repo.clone()
    }

    fn admins(&self) -> Arc<dyn AdminRepository> {
        self.admin_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        // SQLite has no per-transaction isolation or access modes
        let (isolation, access) = match self.db.get_database_backend() {
            DatabaseBackend::Sqlite => (None, None),
            _ => (
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            ),
        };

        let txn = self
            .db
            .begin_with_config(isolation, access)
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// User repository bound to an open transaction.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserRepository<'a> {
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        user_repository::find_by_id(self.txn, id).await
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        user_repository::find_by_email(self.txn, email).await
    }

    pub async fn create(&self, user: NewUser) -> AppResult<User> {
        user_repository::create(self.txn, user).await
    }

    pub async fn update(&self, id: i64, patch: UserPatch) -> AppResult<Option<User>> {
        user_repository::update(self.txn, id, patch).await
    }
}

/// Identity repository bound to an open transaction.
pub struct TxIdentityRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxIdentityRepository<'a> {
    pub async fn find_user_by_identity(
        &self,
        provider: &str,
        provider_user_id: &str,
    ) -> AppResult<Option<User>> {
        identity_repository::find_user_by_identity(self.txn, provider, provider_user_id).await
    }

    pub async fn link_identity(
        &self,
        user_id: i64,
        provider: &str,
        provider_user_id: &str,
        email: Option<String>,
    ) -> AppResult<ExternalIdentity> {
        identity_repository::link_identity(self.txn, user_id, provider, provider_user_id, email)
            .await
    }

    pub async fn count_for_user(&self, user_id: i64) -> AppResult<u64> {
        identity_repository::count_for_user(self.txn, user_id).await
    }
}

/// Simpler API for executing transactional operations.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
