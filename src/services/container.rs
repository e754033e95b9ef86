//! Service container and concurrency helpers.
//!
//! Handlers reach every application service through [`ServiceContainer`];
//! the `parallel` helpers run independent reads concurrently.

use std::future::Future;
use std::sync::Arc;

use super::{AccountService, AdminService, AuthService, BookingService, CatalogService};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn accounts(&self) -> Arc<dyn AccountService>;

    fn admins(&self) -> Arc<dyn AdminService>;

    fn bookings(&self) -> Arc<dyn BookingService>;

    fn catalog(&self) -> Arc<dyn CatalogService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    account_service: Arc<dyn AccountService>,
    admin_service: Arc<dyn AdminService>,
    booking_service: Arc<dyn BookingService>,
    catalog_service: Arc<dyn CatalogService>,
}

impl Services {
    /// Wire every service over one pool and one config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        use super::{AccountManager, AdminManager, Authenticator, BookingManager, CatalogManager};

        let uow = Arc::new(Persistence::new(db));
        let auth_service: Arc<dyn AuthService> = Arc::new(Authenticator::new(config));

        Self {
            account_service: Arc::new(AccountManager::new(uow.clone(), auth_service.clone())),
            admin_service: Arc::new(AdminManager::new(uow.clone(), auth_service.clone())),
            booking_service: Arc::new(BookingManager::new(uow.clone())),
            catalog_service: Arc::new(CatalogManager::new(uow)),
            auth_service,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn accounts(&self) -> Arc<dyn AccountService> {
        self.account_service.clone()
    }

    fn admins(&self) -> Arc<dyn AdminService> {
        self.admin_service.clone()
    }

    fn bookings(&self) -> Arc<dyn BookingService> {
        self.booking_service.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogService> {
        self.catalog_service.clone()
    }
}

/// Run independent async operations concurrently.
///
/// Each helper returns when every operation has finished, or with the
/// first error.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Execute two independent async operations in parallel.
    ///
    /// # Example
    /// ```ignore
    /// let ((rows, total), counts) = parallel::join2(
    ///     bookings.find_paginated(filter, params),
    ///     bookings.status_counts(),
    /// ).await?;
    /// ```
    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join!(f1, f2)
    }

    /// Execute four independent async operations in parallel.
    pub async fn join4<F1, F2, F3, F4, T1, T2, T3, T4>(
        f1: F1,
        f2: F2,
        f3: F3,
        f4: F4,
    ) -> AppResult<(T1, T2, T3, T4)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
        F3: Future<Output = AppResult<T3>>,
        F4: Future<Output = AppResult<T4>>,
    {
        try_join!(f1, f2, f3, f4)
    }
}
