//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    AccountService, AdminService, AuthService, BookingService, CatalogService, ServiceContainer,
    Services,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Bearer token issuing and verification
    pub auth_service: Arc<dyn AuthService>,
    /// Customer accounts
    pub account_service: Arc<dyn AccountService>,
    /// Back office sign-in and dashboard
    pub admin_service: Arc<dyn AdminService>,
    /// Booking lifecycle
    pub booking_service: Arc<dyn BookingService>,
    /// Services and pricing plans
    pub catalog_service: Arc<dyn CatalogService>,
    /// Database handle, used by the health check
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);
        Self::from_container(&container, database)
    }

    /// Create application state from any service container (mocks included).
    pub fn from_container(container: &dyn ServiceContainer, database: Arc<Database>) -> Self {
        Self {
            auth_service: container.auth(),
            account_service: container.accounts(),
            admin_service: container.admins(),
            booking_service: container.bookings(),
            catalog_service: container.catalog(),
            database,
        }
    }
}
