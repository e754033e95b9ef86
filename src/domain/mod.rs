//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod admin;
pub mod booking;
pub mod form;
pub mod identity;
pub mod password;
pub mod pricing_plan;
pub mod service;
pub mod user;

pub use admin::Admin;
pub use booking::{
    Booking, BookingDraft, BookingFilter, BookingStatus, BookingSubmission, BookingsByStatus,
    NewBooking, StatusCounts,
};
pub use form::{ListInput, NumberInput};
pub use identity::{ExternalIdentity, FederatedProfile};
pub use password::Password;
pub use pricing_plan::{
    NewPricingPlan, PricingPlan, PricingPlanForm, PricingPlanPatch, PricingPlanPatchForm,
};
pub use service::{NewService, Service, ServiceForm, ServicePatch, ServicePatchForm};
pub use user::{NewUser, UpdateProfile, User, UserPatch, UserResponse};
