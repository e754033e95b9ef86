//! Public catalog handlers: services and pricing plans.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::AppState;
use crate::domain::{PricingPlan, Service};
use crate::errors::AppResult;

/// Category filter for the public service list
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CategoryQuery {
    /// Category name; `All` or empty lists every category
    #[param(example = "Grooming")]
    pub category: Option<String>,
}

/// Create public catalog routes
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(list_services))
        .route("/pricing", get(list_pricing))
}

/// List active services
#[utoipa::path(
    get,
    path = "/services",
    tag = "Catalog",
    params(CategoryQuery),
    responses(
        (status = 200, description = "Active services in display order", body = Vec<Service>)
    )
)]
pub async fn list_services(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> AppResult<Json<Vec<Service>>> {
    let services = state.catalog_service.active_services(query.category).await?;
    Ok(Json(services))
}

/// List active pricing plans
#[utoipa::path(
    get,
    path = "/pricing",
    tag = "Catalog",
    responses(
        (status = 200, description = "Active pricing plans in display order", body = Vec<PricingPlan>)
    )
)]
pub async fn list_pricing(State(state): State<AppState>) -> AppResult<Json<Vec<PricingPlan>>> {
    let plans = state.catalog_service.active_plans().await?;
    Ok(Json(plans))
}
