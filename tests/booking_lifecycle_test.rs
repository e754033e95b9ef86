//! Booking lifecycle against an in-memory database with the real migrations.

mod common;

use booking_desk::domain::{BookingFilter, BookingStatus};
use booking_desk::errors::AppError;
use booking_desk::services::{BookingManager, BookingService, CatalogManager, CatalogService};
use booking_desk::types::PaginationParams;

use common::{service_form, submission, test_persistence};

#[tokio::test]
async fn test_submit_creates_new_booking_with_generated_id() {
    let (_db, uow) = test_persistence().await;
    let bookings = BookingManager::new(uow);

    let booking = bookings
        .submit(submission("Jane Doe", "Dog Walking"), None)
        .await
        .unwrap();

    assert!(booking.id > 0);
    assert_eq!(booking.status, BookingStatus::New);
    assert_eq!(booking.customer_name, "Jane Doe");
    assert_eq!(booking.service_title_snapshot, "Dog Walking");
    assert_eq!(booking.service_id, None);
    assert_eq!(booking.user_id, None);
    assert_eq!(booking.preferred_date.to_string(), "2025-03-01");

    let fetched = bookings.get(booking.id).await.unwrap();
    assert_eq!(fetched.id, booking.id);
    assert_eq!(fetched.status, BookingStatus::New);
    assert_eq!(fetched.email.as_deref(), Some("jane@example.com"));
}

#[tokio::test]
async fn test_submit_reports_every_missing_field() {
    let (_db, uow) = test_persistence().await;
    let bookings = BookingManager::new(uow);

    let mut form = submission("", "");
    form.email = "not-an-email".to_string();
    form.preferred_date = "01/03/2025".to_string();

    let err = bookings.submit(form, None).await.unwrap_err();

    assert_eq!(err.to_string(), "Name is required");
    assert_eq!(
        err.messages(),
        &[
            "Name is required".to_string(),
            "Valid email is required".to_string(),
            "Service selection is required".to_string(),
            "Start date must be a valid date (YYYY-MM-DD)".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_snapshot_uses_catalog_title_and_survives_service_delete() {
    let (_db, uow) = test_persistence().await;
    let catalog = CatalogManager::new(uow.clone());
    let bookings = BookingManager::new(uow);

    let service = catalog
        .create_service(service_form("Dog Care", "Dog Walking"))
        .await
        .unwrap();

    let mut form = submission("Jane Doe", "whatever was typed");
    form.service_id = Some(service.id);
    let booking = bookings.submit(form, None).await.unwrap();

    assert_eq!(booking.service_id, Some(service.id));
    assert_eq!(booking.service_title_snapshot, "Dog Walking");

    catalog.delete_service(service.id).await.unwrap();

    let after = bookings.get(booking.id).await.unwrap();
    assert_eq!(after.service_id, None);
    assert_eq!(after.service_title_snapshot, "Dog Walking");
}

#[tokio::test]
async fn test_unknown_service_id_is_dropped() {
    let (_db, uow) = test_persistence().await;
    let bookings = BookingManager::new(uow);

    let mut form = submission("Jane Doe", "Cat Sitting");
    form.service_id = Some(9_999);
    let booking = bookings.submit(form, None).await.unwrap();

    assert_eq!(booking.service_id, None);
    assert_eq!(booking.service_title_snapshot, "Cat Sitting");
}

#[tokio::test]
async fn test_status_update_then_fetch() {
    let (_db, uow) = test_persistence().await;
    let bookings = BookingManager::new(uow);

    let booking = bookings
        .submit(submission("Jane Doe", "Dog Walking"), None)
        .await
        .unwrap();

    let updated = bookings.update_status(booking.id, "Confirmed").await.unwrap();
    assert_eq!(updated.status, BookingStatus::Confirmed);

    let fetched = bookings.get(booking.id).await.unwrap();
    assert_eq!(fetched.status, BookingStatus::Confirmed);
    assert_eq!(fetched.customer_name, "Jane Doe");

    // Any state may follow any other
    let reopened = bookings.update_status(booking.id, "New").await.unwrap();
    assert_eq!(reopened.status, BookingStatus::New);
}

#[tokio::test]
async fn test_status_update_rejects_unknown_status_and_missing_booking() {
    let (_db, uow) = test_persistence().await;
    let bookings = BookingManager::new(uow);

    let booking = bookings
        .submit(submission("Jane Doe", "Dog Walking"), None)
        .await
        .unwrap();

    let err = bookings.update_status(booking.id, "Shipped").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid status");

    let err = bookings.update_status(booking.id + 100, "Completed").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    assert_eq!(bookings.get(booking.id).await.unwrap().status, BookingStatus::New);
}

#[tokio::test]
async fn test_status_counts_sum_to_total() {
    let (_db, uow) = test_persistence().await;
    let bookings = BookingManager::new(uow);

    let mut ids = Vec::new();
    for name in ["Ann", "Ben", "Cat", "Dan", "Eve"] {
        ids.push(bookings.submit(submission(name, "Dog Walking"), None).await.unwrap().id);
    }
    bookings.update_status(ids[0], "Confirmed").await.unwrap();
    bookings.update_status(ids[1], "Confirmed").await.unwrap();
    bookings.update_status(ids[2], "Cancelled").await.unwrap();

    let counts = bookings.status_counts().await.unwrap();

    assert_eq!(counts.all, 5);
    assert_eq!(counts.new, 2);
    assert_eq!(counts.confirmed, 2);
    assert_eq!(counts.completed, 0);
    assert_eq!(counts.cancelled, 1);
    assert_eq!(
        counts.new + counts.confirmed + counts.completed + counts.cancelled,
        counts.all
    );
}

#[tokio::test]
async fn test_pagination_pages_and_out_of_range() {
    let (_db, uow) = test_persistence().await;
    let bookings = BookingManager::new(uow);

    for i in 0..5 {
        bookings
            .submit(submission(&format!("Customer {}", i), "Dog Walking"), None)
            .await
            .unwrap();
    }

    let first = bookings
        .list(BookingFilter::default(), PaginationParams::new(1, 2))
        .await
        .unwrap();
    assert_eq!(first.data.len(), 2);
    assert_eq!(first.meta.total, 5);
    assert_eq!(first.meta.total_pages, 3);
    // Newest first
    assert_eq!(first.data[0].customer_name, "Customer 4");

    let last = bookings
        .list(BookingFilter::default(), PaginationParams::new(3, 2))
        .await
        .unwrap();
    assert_eq!(last.data.len(), 1);
    assert_eq!(last.data[0].customer_name, "Customer 0");

    for page in [0, 4, 50] {
        let beyond = bookings
            .list(BookingFilter::default(), PaginationParams::new(page, 2))
            .await
            .unwrap();
        assert!(beyond.data.is_empty());
        assert_eq!(beyond.meta.total, 5);
        assert_eq!(beyond.meta.total_pages, 3);
    }

    let huge = bookings
        .list(BookingFilter::default(), PaginationParams::new(u64::MAX, 100))
        .await
        .unwrap();
    assert!(huge.data.is_empty());
    assert_eq!(huge.meta.total, 5);
}

#[tokio::test]
async fn test_search_and_status_filters_combine() {
    let (_db, uow) = test_persistence().await;
    let bookings = BookingManager::new(uow);

    let jane = bookings
        .submit(submission("Jane Doe", "Dog Walking"), None)
        .await
        .unwrap();
    let mut other = submission("Bob Smith", "Cat Sitting");
    other.email = "bob@example.com".to_string();
    other.phone = "555-0199".to_string();
    bookings.submit(other, None).await.unwrap();

    let by_name = BookingFilter::from_query(None, Some("all"), Some("jANE")).unwrap();
    let page = bookings.list(by_name, PaginationParams::default()).await.unwrap();
    assert_eq!(page.meta.total, 1);
    assert_eq!(page.data[0].id, jane.id);

    let by_service = BookingFilter::from_query(None, None, Some("cat sit")).unwrap();
    let page = bookings.list(by_service, PaginationParams::default()).await.unwrap();
    assert_eq!(page.meta.total, 1);
    assert_eq!(page.data[0].customer_name, "Bob Smith");

    let cancelled_jane = BookingFilter::from_query(None, Some("Cancelled"), Some("Jane")).unwrap();
    let page = bookings
        .list(cancelled_jane, PaginationParams::default())
        .await
        .unwrap();
    assert!(page.data.is_empty());
    assert_eq!(page.meta.total, 0);
    assert_eq!(page.meta.total_pages, 0);
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let (_db, uow) = test_persistence().await;
    let bookings = BookingManager::new(uow);

    bookings
        .submit(submission("Jane Doe", "Dog Walking"), None)
        .await
        .unwrap();

    let filter = BookingFilter::from_query(None, None, Some("%")).unwrap();
    let page = bookings.list(filter, PaginationParams::default()).await.unwrap();
    assert_eq!(page.meta.total, 0);
}

#[tokio::test]
async fn test_list_with_counts_reports_global_counts() {
    let (_db, uow) = test_persistence().await;
    let bookings = BookingManager::new(uow);

    let first = bookings
        .submit(submission("Jane Doe", "Dog Walking"), None)
        .await
        .unwrap();
    bookings
        .submit(submission("John Roe", "Dog Walking"), None)
        .await
        .unwrap();
    bookings.update_status(first.id, "Completed").await.unwrap();

    let filter = BookingFilter::from_query(None, Some("Completed"), None).unwrap();
    let listing = bookings
        .list_with_counts(filter, PaginationParams::default())
        .await
        .unwrap();

    assert_eq!(listing.bookings.meta.total, 1);
    assert_eq!(listing.counts.all, 2);
    assert_eq!(listing.counts.completed, 1);
}

#[tokio::test]
async fn test_delete_booking() {
    let (_db, uow) = test_persistence().await;
    let bookings = BookingManager::new(uow);

    let booking = bookings
        .submit(submission("Jane Doe", "Dog Walking"), None)
        .await
        .unwrap();

    bookings.delete(booking.id).await.unwrap();

    assert!(matches!(bookings.get(booking.id).await, Err(AppError::NotFound)));
    assert!(matches!(bookings.delete(booking.id).await, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_invalid_status_filter_rejected() {
    let err = BookingFilter::from_query(None, Some("Archived"), None).unwrap_err();
    assert_eq!(err.to_string(), "Invalid status");
}
