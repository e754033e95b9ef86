//! Customer accounts: registration, sign-in, federated identities, profile.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::ValidateEmail;

use super::auth_service::{Audience, AuthService, TokenResponse};
use crate::config::{
    DUMMY_PASSWORD_HASH, MAX_EMAIL_CHARS, MAX_NAME_CHARS, MAX_PHONE_CHARS,
    MSG_INVALID_CUSTOMER_LOGIN,
};
use crate::domain::form::{clean, max_chars, max_chars_opt};
use crate::domain::{
    Booking, BookingFilter, BookingsByStatus, FederatedProfile, NewUser, Password, UpdateProfile,
    User, UserPatch,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::with_transaction;

const MSG_NAME_REQUIRED: &str = "Name is required";
const MSG_EMAIL_INVALID: &str = "Valid email is required";
const MSG_PASSWORD_REQUIRED_WITHOUT_IDENTITY: &str =
    "Cannot remove the password from an account without a linked sign-in provider";

/// A customer's bookings, flat and grouped by status
#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerDashboard {
    pub bookings: Vec<Booking>,
    pub by_status: BookingsByStatus,
}

/// Account service trait for dependency injection.
#[async_trait]
pub trait AccountService: Send + Sync {
    async fn register(
        &self,
        name: String,
        email: String,
        phone: Option<String>,
        password: String,
    ) -> AppResult<User>;

    /// Password sign-in; every failure reads "Invalid email or password"
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Resolve a federated sign-in to a local account, creating or linking as needed
    async fn login_with_identity(&self, profile: FederatedProfile) -> AppResult<User>;

    async fn get_profile(&self, user_id: i64) -> AppResult<User>;

    async fn update_profile(&self, user_id: i64, update: UpdateProfile) -> AppResult<User>;

    async fn dashboard(&self, user_id: i64) -> AppResult<CustomerDashboard>;
}

/// Concrete implementation of AccountService using Unit of Work.
pub struct AccountManager<U: UnitOfWork> {
    uow: Arc<U>,
    auth: Arc<dyn AuthService>,
}

impl<U: UnitOfWork> AccountManager<U> {
    pub fn new(uow: Arc<U>, auth: Arc<dyn AuthService>) -> Self {
        Self { uow, auth }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn check_name(name: &str, errors: &mut Vec<String>) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        errors.push(MSG_NAME_REQUIRED.to_string());
        return None;
    }
    max_chars(name, MAX_NAME_CHARS, "Name", errors);
    Some(name.to_string())
}

fn check_email(email: &str, errors: &mut Vec<String>) -> Option<String> {
    let email = normalize_email(email);
    if !email.validate_email() {
        errors.push(MSG_EMAIL_INVALID.to_string());
        return None;
    }
    max_chars(&email, MAX_EMAIL_CHARS, "Email", errors);
    Some(email)
}

fn check_phone(phone: Option<String>, errors: &mut Vec<String>) -> Option<String> {
    let phone = clean(phone);
    max_chars_opt(phone.as_deref(), MAX_PHONE_CHARS, "Phone number", errors);
    phone
}

fn check_password(plain: &str, errors: &mut Vec<String>) -> AppResult<Option<String>> {
    match Password::new(plain) {
        Ok(password) => Ok(Some(password.into_string())),
        Err(AppError::Validation(messages)) => {
            errors.extend(messages);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Validated registration fields, collecting every rule they break.
fn registration(
    name: &str,
    email: &str,
    phone: Option<String>,
    password: &str,
) -> AppResult<NewUser> {
    let mut errors = Vec::new();

    let name = check_name(name, &mut errors);
    let email = check_email(email, &mut errors);
    let phone = check_phone(phone, &mut errors);
    let password_hash = check_password(password, &mut errors)?;

    if let Some(err) = AppError::from_messages(errors) {
        return Err(err);
    }

    // No messages means every check above returned a value
    Ok(NewUser {
        name: name.unwrap_or_default(),
        email: email.unwrap_or_default(),
        password_hash,
        phone,
    })
}

/// Turn the profile form into a patch, collecting every rule it breaks.
fn profile_patch(update: UpdateProfile) -> AppResult<UserPatch> {
    let mut errors = Vec::new();
    let mut patch = UserPatch::default();

    patch.name = update.name.and_then(|name| check_name(&name, &mut errors));
    patch.email = update.email.and_then(|email| check_email(&email, &mut errors));
    patch.phone = update.phone.map(|phone| check_phone(phone, &mut errors));

    match update.password {
        Some(Some(plain)) => {
            if let Some(hash) = check_password(&plain, &mut errors)? {
                patch.password_hash = Some(Some(hash));
            }
        }
        Some(None) => patch.password_hash = Some(None),
        None => {}
    }

    match AppError::from_messages(errors) {
        Some(err) => Err(err),
        None => Ok(patch),
    }
}

#[async_trait]
impl<U: UnitOfWork> AccountService for AccountManager<U> {
    async fn register(
        &self,
        name: String,
        email: String,
        phone: Option<String>,
        password: String,
    ) -> AppResult<User> {
        let new_user = registration(&name, &email, phone, &password)?;

        if self.uow.users().find_by_email(&new_user.email).await?.is_some() {
            return Err(AppError::conflict("Email"));
        }

        let user = self.uow.users().create(new_user).await?;

        tracing::info!(user_id = user.id, "Customer registered");
        Ok(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let user = self.uow.users().find_by_email(&normalize_email(&email)).await?;

        let stored_hash = user
            .as_ref()
            .and_then(|u| u.password_hash.as_deref())
            .unwrap_or(DUMMY_PASSWORD_HASH);
        let password_valid = Password::from_hash(stored_hash.to_string()).verify(&password);

        match user {
            Some(user) if user.has_password() && password_valid => {
                self.auth.issue_token(user.id, &user.email, Audience::Customer)
            }
            _ => Err(AppError::InvalidCredentials(MSG_INVALID_CUSTOMER_LOGIN)),
        }
    }

    async fn login_with_identity(&self, profile: FederatedProfile) -> AppResult<User> {
        let user: User = with_transaction!(self.uow, |ctx| {
            let identities = ctx.identities();

            if let Some(user) = identities
                .find_user_by_identity(&profile.provider, &profile.provider_user_id)
                .await?
            {
                return Ok(user);
            }

            let existing = match profile.email() {
                Some(email) => ctx.users().find_by_email(&email).await?,
                None => None,
            };

            let user = match existing {
                Some(user) => user,
                None => {
                    ctx.users()
                        .create(NewUser {
                            name: profile.account_name(),
                            email: profile.account_email(),
                            password_hash: None,
                            phone: None,
                        })
                        .await?
                }
            };

            let identity = identities
                .link_identity(
                    user.id,
                    &profile.provider,
                    &profile.provider_user_id,
                    profile.email(),
                )
                .await?;

            // A concurrent sign-in may have linked the pair first
            if identity.user_id != user.id {
                tracing::warn!(
                    user_id = user.id,
                    linked_user_id = identity.user_id,
                    "Identity already linked to another account"
                );
                return ctx.users().find_by_id(identity.user_id).await?.ok_or_not_found();
            }

            Ok(user)
        })?;

        tracing::info!(user_id = user.id, "Federated sign-in resolved");
        Ok(user)
    }

    async fn get_profile(&self, user_id: i64) -> AppResult<User> {
        self.uow.users().find_by_id(user_id).await?.ok_or_not_found()
    }

    async fn update_profile(&self, user_id: i64, update: UpdateProfile) -> AppResult<User> {
        let patch = profile_patch(update)?;

        with_transaction!(self.uow, |ctx| {
            let user = ctx.users().find_by_id(user_id).await?.ok_or_not_found()?;

            if patch.is_empty() {
                return Ok(user);
            }

            if patch.password_hash == Some(None)
                && ctx.identities().count_for_user(user_id).await? == 0
            {
                return Err(AppError::validation(MSG_PASSWORD_REQUIRED_WITHOUT_IDENTITY));
            }

            ctx.users().update(user_id, patch).await?.ok_or_not_found()
        })
    }

    async fn dashboard(&self, user_id: i64) -> AppResult<CustomerDashboard> {
        let bookings = self
            .uow
            .bookings()
            .find_all(BookingFilter::for_user(user_id))
            .await?;
        let by_status = BookingsByStatus::group(&bookings);

        Ok(CustomerDashboard { bookings, by_status })
    }
}
