//! HTTP request handlers.

pub mod account_handler;
pub mod admin_handler;
pub mod booking_handler;
pub mod catalog_handler;

pub use account_handler::{account_routes, auth_routes};
pub use admin_handler::{admin_login_routes, admin_routes};
pub use booking_handler::booking_routes;
pub use catalog_handler::catalog_routes;
