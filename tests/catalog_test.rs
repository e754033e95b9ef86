//! Catalog management against an in-memory database.

mod common;

use rust_decimal::Decimal;

use booking_desk::domain::{ListInput, PricingPlanPatchForm, ServicePatchForm};
use booking_desk::errors::AppError;
use booking_desk::services::{CatalogManager, CatalogService};

use common::{plan_form, service_form, test_persistence};

#[tokio::test]
async fn test_service_includes_round_trip_in_order() {
    let (_db, uow) = test_persistence().await;
    let catalog = CatalogManager::new(uow);

    let mut form = service_form("Dog Care", "Dog Walking");
    form.includes = Some(ListInput::Items(vec![
        " Leash ".to_string(),
        "".to_string(),
        "Water".to_string(),
        "Treats".to_string(),
    ]));
    let created = catalog.create_service(form).await.unwrap();

    let fetched = catalog.get_service(created.id).await.unwrap();
    assert_eq!(fetched.includes, vec!["Leash", "Water", "Treats"]);
    assert_eq!(fetched.starting_price, Decimal::new(2550, 2));
    assert_eq!(fetched.duration_mins, 30);
}

#[tokio::test]
async fn test_active_services_by_category() {
    let (_db, uow) = test_persistence().await;
    let catalog = CatalogManager::new(uow);

    let mut late = service_form("Dog Care", "Dog Bathing");
    late.sort_order = Some(5);
    catalog.create_service(late).await.unwrap();
    catalog
        .create_service(service_form("Dog Care", "Dog Walking"))
        .await
        .unwrap();
    catalog
        .create_service(service_form("Cat Care", "Cat Sitting"))
        .await
        .unwrap();
    let mut hidden = service_form("Dog Care", "Retired Service");
    hidden.is_active = Some(false);
    catalog.create_service(hidden).await.unwrap();

    let titles = |services: Vec<booking_desk::domain::Service>| {
        services.into_iter().map(|s| s.title).collect::<Vec<_>>()
    };

    let all = catalog.active_services(Some("All".to_string())).await.unwrap();
    assert_eq!(titles(all), vec!["Dog Walking", "Cat Sitting", "Dog Bathing"]);

    let blank = catalog.active_services(Some("  ".to_string())).await.unwrap();
    assert_eq!(blank.len(), 3);

    let dogs = catalog.active_services(Some("Dog Care".to_string())).await.unwrap();
    assert_eq!(titles(dogs), vec!["Dog Walking", "Dog Bathing"]);

    let everything = catalog.list_services().await.unwrap();
    assert_eq!(everything.len(), 4);
}

#[tokio::test]
async fn test_service_patch_updates_only_present_fields() {
    let (_db, uow) = test_persistence().await;
    let catalog = CatalogManager::new(uow);

    let created = catalog
        .create_service(service_form("Dog Care", "Dog Walking"))
        .await
        .unwrap();

    let updated = catalog
        .update_service(
            created.id,
            ServicePatchForm {
                title: Some("Long Dog Walk".to_string()),
                includes: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Long Dog Walk");
    assert_eq!(updated.category, "Dog Care");
    assert_eq!(updated.description, created.description);
    assert!(updated.includes.is_empty());

    let err = catalog
        .update_service(created.id + 1, ServicePatchForm::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn test_service_form_validation_messages() {
    let (_db, uow) = test_persistence().await;
    let catalog = CatalogManager::new(uow);

    let mut form = service_form("", "Dog Walking");
    form.duration_mins = Some((-5i64).into());

    let err = catalog.create_service(form).await.unwrap_err();
    assert_eq!(
        err.messages(),
        &[
            "Category is required".to_string(),
            "Duration must be a positive number".to_string(),
        ]
    );
    assert!(catalog.list_services().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_missing_service_is_not_found() {
    let (_db, uow) = test_persistence().await;
    let catalog = CatalogManager::new(uow);

    assert!(matches!(
        catalog.delete_service(42).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn test_plan_features_from_lines_and_duplicate_name() {
    let (_db, uow) = test_persistence().await;
    let catalog = CatalogManager::new(uow);

    let plan = catalog.create_plan(plan_form("Basic")).await.unwrap();
    assert_eq!(plan.features, vec!["Weekly walks", "Monthly grooming"]);
    assert_eq!(plan.price_monthly, Decimal::new(4950, 2));
    assert!(!plan.is_popular);

    let err = catalog.create_plan(plan_form("Basic")).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(catalog.list_plans().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_active_plans_and_patch() {
    let (_db, uow) = test_persistence().await;
    let catalog = CatalogManager::new(uow);

    let basic = catalog.create_plan(plan_form("Basic")).await.unwrap();
    let premium = catalog.create_plan(plan_form("Premium")).await.unwrap();

    catalog
        .update_plan(
            premium.id,
            PricingPlanPatchForm {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let active = catalog.active_plans().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, basic.id);

    let err = catalog
        .update_plan(
            basic.id,
            PricingPlanPatchForm {
                price_monthly: Some(Decimal::new(-1, 0).into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Monthly price must be a valid number");

    catalog.delete_plan(premium.id).await.unwrap();
    assert!(matches!(
        catalog.get_plan(premium.id).await,
        Err(AppError::NotFound)
    ));
}
