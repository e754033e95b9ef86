//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{account_handler, admin_handler, booking_handler, catalog_handler};
use crate::domain::{
    Booking, BookingStatus, BookingSubmission, BookingsByStatus, ListInput, PricingPlan,
    PricingPlanForm, PricingPlanPatchForm, Service, ServiceForm, ServicePatchForm, StatusCounts,
    UpdateProfile, UserResponse,
};
use crate::services::{AdminDashboard, BookingListing, CustomerDashboard, TokenResponse};
use crate::types::{MessageResponse, PaginatedBookings, PaginationMeta};

/// OpenAPI documentation for the Booking Desk API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Booking Desk API",
        version = "0.1.0",
        description = "Service catalog, booking requests, customer accounts and back office"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Catalog
        catalog_handler::list_services,
        catalog_handler::list_pricing,
        // Bookings
        booking_handler::submit_booking,
        // Accounts
        account_handler::register,
        account_handler::login,
        account_handler::get_account,
        account_handler::update_account,
        account_handler::dashboard,
        account_handler::list_bookings,
        // Admin
        admin_handler::login,
        admin_handler::dashboard,
        admin_handler::list_services,
        admin_handler::create_service,
        admin_handler::get_service,
        admin_handler::update_service,
        admin_handler::delete_service,
        admin_handler::list_plans,
        admin_handler::create_plan,
        admin_handler::get_plan,
        admin_handler::update_plan,
        admin_handler::delete_plan,
        admin_handler::list_bookings,
        admin_handler::get_booking,
        admin_handler::update_booking_status,
        admin_handler::delete_booking,
    ),
    components(
        schemas(
            // Domain types
            Booking,
            BookingStatus,
            BookingSubmission,
            BookingsByStatus,
            StatusCounts,
            Service,
            ServiceForm,
            ServicePatchForm,
            PricingPlan,
            PricingPlanForm,
            PricingPlanPatchForm,
            ListInput,
            UserResponse,
            UpdateProfile,
            // Service views
            AdminDashboard,
            BookingListing,
            CustomerDashboard,
            TokenResponse,
            // Shared types
            PaginatedBookings,
            PaginationMeta,
            MessageResponse,
            // Request bodies
            account_handler::RegisterRequest,
            account_handler::LoginRequest,
            admin_handler::StatusUpdateRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Catalog", description = "Public service and pricing listings"),
        (name = "Bookings", description = "Booking requests"),
        (name = "Accounts", description = "Customer registration, sign-in and dashboard"),
        (name = "Admin", description = "Back office operations")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Token from /auth/login (customer) or /admin/login (admin)",
                        ))
                        .build(),
                ),
            );
        }
    }
}
