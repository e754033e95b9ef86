//! Integration tests for API endpoints.
//!
//! The full router runs over an in-memory database, so requests exercise the
//! middleware, handlers, services and migrations together.

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use booking_desk::api::create_router;
use booking_desk::AppState;

const ADMIN_EMAIL: &str = "owner@example.com";
const ADMIN_PASSWORD: &str = "owner-pass";

async fn test_app() -> (Router, AppState) {
    let db = common::test_database().await;
    let state = AppState::from_config(db, common::test_config());
    state
        .admin_service
        .ensure_admin(ADMIN_EMAIL.to_string(), ADMIN_PASSWORD.to_string())
        .await
        .unwrap();

    (create_router(state.clone()), state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

fn booking_body(name: &str) -> Value {
    json!({
        "customer_name": name,
        "phone": "555-0100",
        "email": "jane@example.com",
        "address_line1": "1 Main St",
        "city": "Springfield",
        "state": "IL",
        "pincode": "62701",
        "service": "Dog Walking",
        "preferred_date": "2025-03-01",
        "preferred_time": "10:00"
    })
}

async fn admin_token(app: &Router) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/admin/login",
        None,
        Some(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["access_token"].as_str().unwrap().to_string()
}

async fn customer_token(app: &Router) -> String {
    let (status, _) = send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "password": "secret1"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "jane@example.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["access_token"].as_str().unwrap().to_string()
}

// =============================================================================
// Public endpoints
// =============================================================================

#[tokio::test]
async fn test_root_and_health() {
    let (app, _) = test_app().await;

    let (status, body) = send(&app, Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Booking Desk API");

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["status"], "healthy");
}

#[tokio::test]
async fn test_submitted_status_is_ignored() {
    let (app, _) = test_app().await;

    let mut body = booking_body("Jane Doe");
    body["status"] = json!("Completed");

    let (status, body) = send(&app, Method::POST, "/booking", None, Some(body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "New");
    assert_eq!(body["data"]["customer_name"], "Jane Doe");
    assert_eq!(body["data"]["preferred_date"], "2025-03-01");
    assert!(body["data"]["user_id"].is_null());
}

#[tokio::test]
async fn test_invalid_booking_lists_every_message() {
    let (app, _) = test_app().await;

    let mut body = booking_body("");
    body["phone"] = json!("");

    let (status, body) = send(&app, Method::POST, "/booking", None, Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["message"], "Name is required");
    assert_eq!(
        body["error"]["details"],
        json!(["Name is required", "Phone number is required"])
    );
}

#[tokio::test]
async fn test_undecodable_body_uses_error_envelope() {
    let (app, _) = test_app().await;

    let mut body = booking_body("Jane Doe");
    body["customer_name"] = json!(42);

    let (status, body) = send(&app, Method::POST, "/booking", None, Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"].as_str().unwrap().contains("customer_name"));
}

#[tokio::test]
async fn test_numeric_text_fields_are_accepted() {
    let (app, _) = test_app().await;
    let token = admin_token(&app).await;

    let mut service = json!({
        "category": "Dog Care",
        "title": "Dog Walking",
        "description": "Around the block",
        "duration_mins": "45",
        "starting_price": "a lot"
    });

    let (status, body) = send(&app, Method::POST, "/admin/services", Some(&token), Some(service.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["details"],
        json!(["Starting price must be a valid number"])
    );

    service["starting_price"] = json!("25.5");
    let (status, body) = send(&app, Method::POST, "/admin/services", Some(&token), Some(service)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["duration_mins"], 45);
    let service_id = body["data"]["id"].as_i64().unwrap();

    let mut booking = booking_body("Jane Doe");
    booking["service"] = json!("typed title");
    booking["service_id"] = json!(service_id.to_string());

    let (status, body) = send(&app, Method::POST, "/booking", None, Some(booking)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["service_id"], service_id);
    assert_eq!(body["data"]["service_title_snapshot"], "Dog Walking");
}

#[tokio::test]
async fn test_overlong_booking_field_is_a_validation_error() {
    let (app, _) = test_app().await;

    let mut body = booking_body("Jane Doe");
    body["preferred_time"] = json!("any time after lunch please");

    let (status, body) = send(&app, Method::POST, "/booking", None, Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["details"],
        json!(["Preferred time must be at most 20 characters"])
    );
}

#[tokio::test]
async fn test_signed_in_booking_is_linked_and_bad_token_is_anonymous() {
    let (app, _) = test_app().await;
    let token = customer_token(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/booking",
        Some(&token),
        Some(booking_body("Jane Doe")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"]["user_id"].is_i64());

    let (status, body) = send(
        &app,
        Method::POST,
        "/booking",
        Some("not-a-token"),
        Some(booking_body("Someone")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"]["user_id"].is_null());

    let (status, body) = send(&app, Method::GET, "/account/bookings", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["customer_name"], "Jane Doe");
}

#[tokio::test]
async fn test_public_catalog_hides_inactive_services() {
    let (app, _) = test_app().await;
    let token = admin_token(&app).await;

    for (title, active) in [("Dog Walking", true), ("Retired", false)] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/admin/services",
            Some(&token),
            Some(json!({
                "category": "Dog Care",
                "title": title,
                "description": "Around the block",
                "duration_mins": 30,
                "starting_price": "25.00",
                "includes": "Leash\nWater",
                "is_active": active
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, Method::GET, "/services?category=All", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let services = body.as_array().unwrap();
    assert_eq!(services.len(), 1);
    assert_eq!(services[0]["title"], "Dog Walking");
    assert_eq!(services[0]["includes"], json!(["Leash", "Water"]));

    let (status, body) = send(&app, Method::GET, "/services?category=Cat%20Care", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let (status, body) = send(&app, Method::GET, "/pricing", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

// =============================================================================
// Authentication boundaries
// =============================================================================

#[tokio::test]
async fn test_account_requires_token() {
    let (app, _) = test_app().await;

    let (status, body) = send(&app, Method::GET, "/account/dashboard", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_customer_token_is_forbidden_on_admin_routes() {
    let (app, _) = test_app().await;
    let token = customer_token(&app).await;

    let (status, _) = send(&app, Method::GET, "/admin/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::GET, "/admin/dashboard", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_token_does_not_open_account_routes() {
    let (app, _) = test_app().await;
    let token = admin_token(&app).await;

    let (status, _) = send(&app, Method::GET, "/account/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_failures() {
    let (app, _) = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/admin/login",
        None,
        Some(json!({ "email": ADMIN_EMAIL, "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Invalid credentials");

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "nobody@example.com", "password": "whatever" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Invalid email or password");
}

// =============================================================================
// Back office
// =============================================================================

#[tokio::test]
async fn test_admin_status_update_and_listing() {
    let (app, _) = test_app().await;
    let token = admin_token(&app).await;

    let mut ids = Vec::new();
    for name in ["Ann", "Ben", "Cat"] {
        let (_, body) = send(&app, Method::POST, "/booking", None, Some(booking_body(name))).await;
        ids.push(body["data"]["id"].as_i64().unwrap());
    }

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/admin/bookings/{}/status", ids[0]),
        Some(&token),
        Some(json!({ "status": "Confirmed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Status updated");
    assert_eq!(body["data"]["status"], "Confirmed");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/admin/bookings/{}/status", ids[0]),
        Some(&token),
        Some(json!({ "status": "Shipped" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Invalid status");

    let (status, _) = send(
        &app,
        Method::PUT,
        "/admin/bookings/9999/status",
        Some(&token),
        Some(json!({ "status": "Completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        Method::GET,
        "/admin/bookings?status=New&page=1&per_page=1",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bookings"]["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["bookings"]["meta"]["total"], 2);
    assert_eq!(body["bookings"]["meta"]["total_pages"], 2);
    assert_eq!(body["counts"]["all"], 3);
    assert_eq!(body["counts"]["New"], 2);
    assert_eq!(body["counts"]["Confirmed"], 1);

    let (status, body) = send(&app, Method::GET, "/admin/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_bookings"], 3);
    assert_eq!(body["new_bookings"], 2);
}

#[tokio::test]
async fn test_admin_delete_booking() {
    let (app, _) = test_app().await;
    let token = admin_token(&app).await;

    let (_, body) = send(&app, Method::POST, "/booking", None, Some(booking_body("Ann"))).await;
    let id = body["data"]["id"].as_i64().unwrap();
    let uri = format!("/admin/bookings/{}", id);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_plan_name_conflicts() {
    let (app, _) = test_app().await;
    let token = admin_token(&app).await;

    let plan = json!({
        "name": "Basic",
        "price_monthly": "49.50",
        "features": ["Weekly walks"],
        "is_popular": true
    });

    let (status, body) = send(&app, Method::POST, "/admin/pricing", Some(&token), Some(plan.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["is_popular"], true);

    let (status, body) = send(&app, Method::POST, "/admin/pricing", Some(&token), Some(plan)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}
