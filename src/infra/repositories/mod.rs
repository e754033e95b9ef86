//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod admin_repository;
mod booking_repository;
pub(crate) mod entities;
pub(crate) mod identity_repository;
mod json_list;
mod pricing_repository;
mod service_repository;
pub(crate) mod user_repository;

pub use admin_repository::{AdminRepository, AdminStore};
pub use booking_repository::{BookingRepository, BookingStore};
pub use identity_repository::{IdentityRepository, IdentityStore};
pub use pricing_repository::{PricingRepository, PricingStore};
pub use service_repository::{ServiceRepository, ServiceStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use admin_repository::MockAdminRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use booking_repository::MockBookingRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use identity_repository::MockIdentityRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use pricing_repository::MockPricingRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use service_repository::MockServiceRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
