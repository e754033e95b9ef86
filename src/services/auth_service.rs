//! Bearer token issuing and verification.
//!
//! Customer and admin tokens are signed with the same secret and told apart
//! by their `aud` claim, so a customer token never opens an admin route.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::config::{Config, AUDIENCE_ADMIN, AUDIENCE_CUSTOMER, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::errors::AppResult;

/// Who a token was issued to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Customer,
    Admin,
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::Customer => AUDIENCE_CUSTOMER,
            Audience::Admin => AUDIENCE_ADMIN,
        }
    }
}

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id (users.id or admins.id, depending on `aud`)
    pub sub: i64,
    pub email: String,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Token service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait AuthService: Send + Sync {
    /// Sign a token for an authenticated account
    fn issue_token(&self, subject: i64, email: &str, audience: Audience) -> AppResult<TokenResponse>;

    /// Verify signature, expiry and audience
    fn verify_token(&self, token: &str, audience: Audience) -> AppResult<Claims>;
}

/// JWT implementation of [`AuthService`]
pub struct Authenticator {
    config: Config,
}

impl Authenticator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl AuthService for Authenticator {
    fn issue_token(&self, subject: i64, email: &str, audience: Audience) -> AppResult<TokenResponse> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.config.jwt_expiration_hours);

        let claims = Claims {
            sub: subject,
            email: email.to_string(),
            aud: audience.as_str().to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret_bytes()),
        )?;

        Ok(TokenResponse {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.config.jwt_expiration_hours * SECONDS_PER_HOUR,
        })
    }

    fn verify_token(&self, token: &str, audience: Audience) -> AppResult<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(&[audience.as_str()]);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &validation,
        )?;

        Ok(token_data.claims)
    }
}
