//! Booking Desk - backend for a small-business booking website
//!
//! Customers browse the service catalog and pricing plans and submit
//! booking requests; an admin back office manages the catalog and moves
//! bookings through their statuses.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and validation
//! - **services**: Application use cases and business logic
//! - **infra**: Database, migrations, repositories and Unit of Work
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Booking, BookingStatus, Password, User};
pub use errors::{AppError, AppResult};
