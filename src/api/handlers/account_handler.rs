//! Customer authentication and account handlers.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::booking_handler::BookingQuery;
use crate::api::extractors::{AppJson, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{Booking, UpdateProfile, UserResponse};
use crate::errors::AppResult;
use crate::services::{CustomerDashboard, TokenResponse};
use crate::types::{Created, Paginated};

/// Customer registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Jane Doe")]
    pub name: String,
    /// Sign-in email, unique per account
    #[validate(email(message = "Valid email is required"))]
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[schema(example = "555-0100")]
    pub phone: Option<String>,
    /// At least 6 characters
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[schema(example = "walkies42", min_length = 6)]
    pub password: String,
}

/// Customer login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "walkies42")]
    pub password: String,
}

/// Create public customer authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Create bearer-protected customer account routes
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_account).patch(update_account))
        .route("/dashboard", get(dashboard))
        .route("/bookings", get(list_bookings))
}

/// Register a customer account
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Accounts",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<UserResponse>> {
    let user = state
        .account_service
        .register(payload.name, payload.email, payload.phone, payload.password)
        .await?;

    Ok(Created(UserResponse::from(user)))
}

/// Sign in with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Accounts",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .account_service
        .login(payload.email, payload.password)
        .await?;

    Ok(Json(token))
}

/// Current customer profile
#[utoipa::path(
    get,
    path = "/account",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile", body = UserResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_account(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<UserResponse>> {
    let user = state.account_service.get_profile(current_user.id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Update name, email, phone or password
///
/// `null` clears `phone`; `null` for `password` is accepted only when a
/// sign-in provider is linked.
#[utoipa::path(
    patch,
    path = "/account",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Email already exists")
    )
)]
pub async fn update_account(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    AppJson(update): AppJson<UpdateProfile>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .account_service
        .update_profile(current_user.id, update)
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// Customer dashboard: bookings grouped by status
#[utoipa::path(
    get,
    path = "/account/dashboard",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard", body = CustomerDashboard),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn dashboard(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<CustomerDashboard>> {
    let dashboard = state.account_service.dashboard(current_user.id).await?;
    Ok(Json(dashboard))
}

/// The customer's own bookings, filtered and paginated
#[utoipa::path(
    get,
    path = "/account/bookings",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    params(BookingQuery),
    responses(
        (status = 200, description = "One page of bookings", body = PaginatedBookings),
        (status = 400, description = "Invalid status"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_bookings(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<BookingQuery>,
) -> AppResult<Json<Paginated<Booking>>> {
    let filter = query.filter(Some(current_user.id))?;
    let page = state
        .booking_service
        .list(filter, query.pagination())
        .await?;

    Ok(Json(page))
}
