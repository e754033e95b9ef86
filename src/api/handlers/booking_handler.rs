//! Booking submission handler and the shared listing query.

use axum::{extract::State, middleware, routing::post, Extension, Router};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::extractors::AppJson;
use crate::api::middleware::{optional_customer, CurrentUser};
use crate::api::AppState;
use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};
use crate::domain::{Booking, BookingFilter, BookingSubmission};
use crate::errors::AppResult;
use crate::types::{Created, PaginationParams};

/// Listing query shared by the customer and admin booking lists
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct BookingQuery {
    /// `New`, `Confirmed`, `Completed`, `Cancelled` or `all`
    #[param(example = "New")]
    pub status: Option<String>,
    /// Matches customer name, phone, email or service title
    #[param(example = "Jane")]
    pub search: Option<String>,
    /// 1-based page number
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Page size, capped at 100
    #[param(example = 20)]
    pub per_page: Option<u64>,
}

impl BookingQuery {
    pub fn filter(&self, user_id: Option<i64>) -> AppResult<BookingFilter> {
        BookingFilter::from_query(user_id, self.status.as_deref(), self.search.as_deref())
    }

    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(
            self.page.unwrap_or(DEFAULT_PAGE_NUMBER),
            self.per_page.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

/// Create booking submission routes
pub fn booking_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/booking", post(submit_booking))
        .route_layer(middleware::from_fn_with_state(state, optional_customer))
}

/// Submit a booking request
///
/// A customer bearer token, when present, links the booking to that account.
#[utoipa::path(
    post,
    path = "/booking",
    tag = "Bookings",
    request_body = BookingSubmission,
    security((), ("bearer_auth" = [])),
    responses(
        (status = 201, description = "Booking stored with status New", body = Booking),
        (status = 400, description = "Validation error; every violated rule is listed")
    )
)]
pub async fn submit_booking(
    State(state): State<AppState>,
    customer: Option<Extension<CurrentUser>>,
    AppJson(submission): AppJson<BookingSubmission>,
) -> AppResult<Created<Booking>> {
    let user_id = customer.map(|Extension(user)| user.id);
    let booking = state.booking_service.submit(submission, user_id).await?;
    Ok(Created(booking))
}
