//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and migrations
//! - Repositories
//! - Unit of Work for transaction management

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    AdminRepository, AdminStore, BookingRepository, BookingStore, IdentityRepository,
    IdentityStore, PricingRepository, PricingStore, ServiceRepository, ServiceStore,
    UserRepository, UserStore,
};
pub use unit_of_work::{
    Persistence, TransactionContext, TxIdentityRepository, TxUserRepository, UnitOfWork,
};
