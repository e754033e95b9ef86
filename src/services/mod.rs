//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services use Unit of Work pattern for centralized repository
//! access and transaction management.

mod account_service;
mod admin_service;
mod auth_service;
mod booking_service;
mod catalog_service;
pub mod container;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use account_service::{AccountManager, AccountService, CustomerDashboard};
pub use admin_service::{AdminDashboard, AdminManager, AdminService};
pub use auth_service::{Audience, AuthService, Authenticator, Claims, TokenResponse};
pub use booking_service::{BookingListing, BookingManager, BookingService};
pub use catalog_service::{CatalogManager, CatalogService};

// Parallel execution utilities
pub use container::parallel;

#[cfg(any(test, feature = "test-utils"))]
pub use auth_service::MockAuthService;
#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
