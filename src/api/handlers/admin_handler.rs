//! Back office handlers: dashboard, catalog management and bookings.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::account_handler::LoginRequest;
use super::booking_handler::BookingQuery;
use crate::api::extractors::{AppJson, ValidatedJson};
use crate::api::middleware::CurrentAdmin;
use crate::api::AppState;
use crate::domain::{
    Booking, PricingPlan, PricingPlanForm, PricingPlanPatchForm, Service, ServiceForm,
    ServicePatchForm,
};
use crate::errors::AppResult;
use crate::services::{AdminDashboard, BookingListing, TokenResponse};
use crate::types::{ApiResponse, Created, NoContent};

/// Booking status change
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StatusUpdateRequest {
    #[validate(length(min = 1, message = "Invalid status"))]
    #[schema(example = "Confirmed")]
    pub status: String,
}

/// Create the public admin sign-in route
pub fn admin_login_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Create admin-bearer-protected routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/services", get(list_services).post(create_service))
        .route(
            "/services/:id",
            get(get_service).patch(update_service).delete(delete_service),
        )
        .route("/pricing", get(list_plans).post(create_plan))
        .route(
            "/pricing/:id",
            get(get_plan).patch(update_plan).delete(delete_plan),
        )
        .route("/bookings", get(list_bookings))
        .route("/bookings/:id", get(get_booking).delete(delete_booking))
        .route("/bookings/:id/status", put(update_booking_status))
}

/// Admin sign-in
#[utoipa::path(
    post,
    path = "/admin/login",
    tag = "Admin",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .admin_service
        .login(payload.email, payload.password)
        .await?;

    Ok(Json(token))
}

/// Totals and the most recent bookings
#[utoipa::path(
    get,
    path = "/admin/dashboard",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard summary", body = AdminDashboard),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn dashboard(
    Extension(admin): Extension<CurrentAdmin>,
    State(state): State<AppState>,
) -> AppResult<Json<AdminDashboard>> {
    tracing::debug!(admin_id = admin.id, "Dashboard requested");
    Ok(Json(state.admin_service.dashboard().await?))
}

/// All services, active or not
#[utoipa::path(
    get,
    path = "/admin/services",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Every service", body = Vec<Service>))
)]
pub async fn list_services(State(state): State<AppState>) -> AppResult<Json<Vec<Service>>> {
    Ok(Json(state.catalog_service.list_services().await?))
}

/// Create a service
#[utoipa::path(
    post,
    path = "/admin/services",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = ServiceForm,
    responses(
        (status = 201, description = "Service created", body = Service),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_service(
    State(state): State<AppState>,
    AppJson(form): AppJson<ServiceForm>,
) -> AppResult<Created<Service>> {
    Ok(Created(state.catalog_service.create_service(form).await?))
}

/// Get a service
#[utoipa::path(
    get,
    path = "/admin/services/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service", body = Service),
        (status = 404, description = "Service not found")
    )
)]
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Service>> {
    Ok(Json(state.catalog_service.get_service(id).await?))
}

/// Update the fields present in the body
#[utoipa::path(
    patch,
    path = "/admin/services/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Service ID")),
    request_body = ServicePatchForm,
    responses(
        (status = 200, description = "Service updated", body = Service),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Service not found")
    )
)]
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(form): AppJson<ServicePatchForm>,
) -> AppResult<Json<Service>> {
    Ok(Json(state.catalog_service.update_service(id, form).await?))
}

/// Delete a service; bookings keep their title snapshot
#[utoipa::path(
    delete,
    path = "/admin/services/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Service ID")),
    responses(
        (status = 204, description = "Service deleted"),
        (status = 404, description = "Service not found")
    )
)]
pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<NoContent> {
    state.catalog_service.delete_service(id).await?;
    Ok(NoContent)
}

/// All pricing plans, active or not
#[utoipa::path(
    get,
    path = "/admin/pricing",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Every pricing plan", body = Vec<PricingPlan>))
)]
pub async fn list_plans(State(state): State<AppState>) -> AppResult<Json<Vec<PricingPlan>>> {
    Ok(Json(state.catalog_service.list_plans().await?))
}

/// Create a pricing plan
#[utoipa::path(
    post,
    path = "/admin/pricing",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = PricingPlanForm,
    responses(
        (status = 201, description = "Plan created", body = PricingPlan),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Plan name already exists")
    )
)]
pub async fn create_plan(
    State(state): State<AppState>,
    AppJson(form): AppJson<PricingPlanForm>,
) -> AppResult<Created<PricingPlan>> {
    Ok(Created(state.catalog_service.create_plan(form).await?))
}

/// Get a pricing plan
#[utoipa::path(
    get,
    path = "/admin/pricing/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Plan ID")),
    responses(
        (status = 200, description = "Pricing plan", body = PricingPlan),
        (status = 404, description = "Plan not found")
    )
)]
pub async fn get_plan(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PricingPlan>> {
    Ok(Json(state.catalog_service.get_plan(id).await?))
}

/// Update the fields present in the body
#[utoipa::path(
    patch,
    path = "/admin/pricing/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Plan ID")),
    request_body = PricingPlanPatchForm,
    responses(
        (status = 200, description = "Plan updated", body = PricingPlan),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Plan not found"),
        (status = 409, description = "Plan name already exists")
    )
)]
pub async fn update_plan(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(form): AppJson<PricingPlanPatchForm>,
) -> AppResult<Json<PricingPlan>> {
    Ok(Json(state.catalog_service.update_plan(id, form).await?))
}

/// Delete a pricing plan
#[utoipa::path(
    delete,
    path = "/admin/pricing/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Plan ID")),
    responses(
        (status = 204, description = "Plan deleted"),
        (status = 404, description = "Plan not found")
    )
)]
pub async fn delete_plan(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<NoContent> {
    state.catalog_service.delete_plan(id).await?;
    Ok(NoContent)
}

/// Every booking, filtered and paginated, with status counts
#[utoipa::path(
    get,
    path = "/admin/bookings",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(BookingQuery),
    responses(
        (status = 200, description = "One page of bookings plus counts", body = BookingListing),
        (status = 400, description = "Invalid status")
    )
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingQuery>,
) -> AppResult<Json<BookingListing>> {
    let filter = query.filter(None)?;
    let listing = state
        .booking_service
        .list_with_counts(filter, query.pagination())
        .await?;

    Ok(Json(listing))
}

/// Get a booking
#[utoipa::path(
    get,
    path = "/admin/bookings/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking", body = Booking),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Booking>> {
    Ok(Json(state.booking_service.get(id).await?))
}

/// Move a booking to another status
#[utoipa::path(
    put,
    path = "/admin/bookings/{id}/status",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Booking ID")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Status updated", body = Booking),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn update_booking_status(
    Extension(admin): Extension<CurrentAdmin>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<StatusUpdateRequest>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    let booking = state
        .booking_service
        .update_status(id, &payload.status)
        .await?;

    tracing::info!(
        booking_id = id,
        admin_id = admin.id,
        status = %booking.status,
        "Booking status changed"
    );

    Ok(Json(ApiResponse::with_message(booking, "Status updated")))
}

/// Delete a booking
#[utoipa::path(
    delete,
    path = "/admin/bookings/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Booking ID")),
    responses(
        (status = 204, description = "Booking deleted"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<NoContent> {
    state.booking_service.delete(id).await?;
    Ok(NoContent)
}
