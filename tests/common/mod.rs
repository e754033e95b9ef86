//! Shared helpers for integration tests: an in-memory database with the real
//! migrations applied, plus form builders.

#![allow(dead_code)]

use std::sync::Arc;

use rust_decimal::Decimal;

use booking_desk::config::Config;
use booking_desk::domain::{BookingSubmission, ListInput, PricingPlanForm, ServiceForm};
use booking_desk::infra::{Database, Persistence};

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-testing-only-32chars";

pub fn test_config() -> Config {
    let mut config = Config::for_database("sqlite::memory:", TEST_JWT_SECRET);
    // One connection keeps every query on the same in-memory database
    config.max_connections = 1;
    config
}

/// Fresh in-memory database with every migration applied.
pub async fn test_database() -> Arc<Database> {
    let db = Database::connect(&test_config())
        .await
        .expect("in-memory database should start");
    Arc::new(db)
}

pub async fn test_persistence() -> (Arc<Database>, Arc<Persistence>) {
    let db = test_database().await;
    let uow = Arc::new(Persistence::new(db.get_connection()));
    (db, uow)
}

pub fn submission(name: &str, service: &str) -> BookingSubmission {
    BookingSubmission {
        customer_name: name.to_string(),
        phone: "555-0100".to_string(),
        email: "jane@example.com".to_string(),
        address_line1: "1 Main St".to_string(),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        pincode: "62701".to_string(),
        service: service.to_string(),
        preferred_date: "2025-03-01".to_string(),
        preferred_time: "10:00".to_string(),
        ..Default::default()
    }
}

pub fn service_form(category: &str, title: &str) -> ServiceForm {
    ServiceForm {
        category: category.to_string(),
        title: title.to_string(),
        description: format!("{} by trained staff", title),
        duration_mins: Some(30i64.into()),
        starting_price: Some(Decimal::new(2550, 2).into()),
        includes: Some(ListInput::Items(vec![
            "Leash".to_string(),
            "Water".to_string(),
        ])),
        ..Default::default()
    }
}

pub fn plan_form(name: &str) -> PricingPlanForm {
    PricingPlanForm {
        name: name.to_string(),
        price_monthly: Some(Decimal::new(4950, 2).into()),
        features: Some(ListInput::Lines("Weekly walks\n\nMonthly grooming\n".to_string())),
        ..Default::default()
    }
}
