//! Back office: admin sign-in, provisioning and the dashboard summary.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::auth_service::{Audience, AuthService, TokenResponse};
use super::container::parallel;
use crate::config::{DASHBOARD_RECENT_BOOKINGS, DUMMY_PASSWORD_HASH, MSG_INVALID_ADMIN_LOGIN};
use crate::domain::{Admin, Booking, BookingStatus, Password};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminDashboard {
    #[schema(example = 42)]
    pub total_bookings: u64,
    #[schema(example = 5)]
    pub new_bookings: u64,
    #[schema(example = 8)]
    pub total_services: u64,
    #[schema(example = 3)]
    pub total_plans: u64,
    pub recent_bookings: Vec<Booking>,
}

/// Admin service trait for dependency injection.
#[async_trait]
pub trait AdminService: Send + Sync {
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Create the admin, or refresh its password when the email exists
    async fn ensure_admin(&self, email: String, password: String) -> AppResult<Admin>;

    async fn dashboard(&self) -> AppResult<AdminDashboard>;
}

/// Concrete implementation of AdminService using Unit of Work.
pub struct AdminManager<U: UnitOfWork> {
    uow: Arc<U>,
    auth: Arc<dyn AuthService>,
}

impl<U: UnitOfWork> AdminManager<U> {
    pub fn new(uow: Arc<U>, auth: Arc<dyn AuthService>) -> Self {
        Self { uow, auth }
    }
}

#[async_trait]
impl<U: UnitOfWork> AdminService for AdminManager<U> {
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let admin = self
            .uow
            .admins()
            .find_by_email(&email.trim().to_lowercase())
            .await?;

        let stored_hash = admin
            .as_ref()
            .map(|a| a.password_hash.as_str())
            .unwrap_or(DUMMY_PASSWORD_HASH);
        let password_valid = Password::from_hash(stored_hash.to_string()).verify(&password);

        match admin {
            Some(admin) if password_valid => {
                tracing::info!(admin_id = admin.id, "Admin signed in");
                self.auth.issue_token(admin.id, &admin.email, Audience::Admin)
            }
            _ => {
                tracing::warn!("Rejected admin sign-in");
                Err(AppError::InvalidCredentials(MSG_INVALID_ADMIN_LOGIN))
            }
        }
    }

    async fn ensure_admin(&self, email: String, password: String) -> AppResult<Admin> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::validation("Admin email and password are required"));
        }

        let password_hash = Password::hash_unchecked(&password)?.into_string();
        let admin = self
            .uow
            .admins()
            .create_if_not_exists(email, password_hash)
            .await?;

        tracing::info!(admin_id = admin.id, email = %admin.email, "Admin account ready");
        Ok(admin)
    }

    async fn dashboard(&self) -> AppResult<AdminDashboard> {
        let bookings = self.uow.bookings();
        let services = self.uow.services();
        let pricing = self.uow.pricing();

        let (counts, total_services, total_plans, recent_bookings) = parallel::join4(
            bookings.status_counts(),
            services.count(),
            pricing.count(),
            bookings.find_recent(DASHBOARD_RECENT_BOOKINGS),
        )
        .await?;

        Ok(AdminDashboard {
            total_bookings: counts.all,
            new_bookings: counts.get(BookingStatus::New),
            total_services,
            total_plans,
            recent_bookings,
        })
    }
}
