//! Bearer token middleware for customer and admin routes.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::AppError;
use crate::services::{Audience, Claims};

/// Signed-in customer extracted from a `customer` token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
}

/// Signed-in administrator extracted from an `admin` token
#[derive(Clone, Debug)]
pub struct CurrentAdmin {
    pub id: i64,
    pub email: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
        }
    }
}

impl From<Claims> for CurrentAdmin {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
}

/// Require a customer token and inject [`CurrentUser`].
pub async fn customer_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::Unauthorized)?;
    let claims = state.auth_service.verify_token(token, Audience::Customer)?;

    request.extensions_mut().insert(CurrentUser::from(claims));

    Ok(next.run(request).await)
}

/// Require an admin token and inject [`CurrentAdmin`].
pub async fn admin_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::Unauthorized)?;
    let claims = match state.auth_service.verify_token(token, Audience::Admin) {
        Ok(claims) => claims,
        // A valid customer token is authenticated but not allowed here
        Err(e) => match state.auth_service.verify_token(token, Audience::Customer) {
            Ok(_) => return Err(AppError::Forbidden),
            Err(_) => return Err(e),
        },
    };

    request.extensions_mut().insert(CurrentAdmin::from(claims));

    Ok(next.run(request).await)
}

/// Attach [`CurrentUser`] when a valid customer token is present.
///
/// A missing or unusable token leaves the request anonymous.
pub async fn optional_customer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let claims = bearer_token(request.headers())
        .map(|token| state.auth_service.verify_token(token, Audience::Customer));

    match claims {
        Some(Ok(claims)) => {
            request.extensions_mut().insert(CurrentUser::from(claims));
        }
        Some(Err(e)) => tracing::debug!("Ignoring unusable bearer token: {}", e),
        None => {}
    }

    next.run(request).await
}
