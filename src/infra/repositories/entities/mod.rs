//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod admin;
pub mod booking;
pub mod pricing_plan;
pub mod service;
pub mod user;
pub mod user_identity;
