//! API middleware.

mod auth;

pub use auth::{admin_auth, customer_auth, optional_customer, CurrentAdmin, CurrentUser};
