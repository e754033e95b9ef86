//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("{0}")]
    InvalidCredentials(&'static str),

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    /// Unique-key violation (duplicate email, plan name, ...)
    #[error("{0} already exists")]
    Conflict(String),

    // Validation: every violated rule, the first one is the display text
    #[error("{}", first_message(.0))]
    Validation(Vec<String>),

    // Store unreachable or database missing
    #[error("Database unavailable: {0}")]
    Connection(String),

    #[error("Database error")]
    Database(DbErr),

    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

fn first_message(messages: &[String]) -> &str {
    messages.first().map(String::as_str).unwrap_or("Invalid input")
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<String>,
}

impl AppError {
    /// Get error code for client
    fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::InvalidCredentials(_) => "INVALID_CREDENTIALS",
            AppError::NotFound => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Connection(_) => "DATABASE_UNAVAILABLE",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Jwt(_) => "AUTH_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidCredentials(_) | AppError::Jwt(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            AppError::Conflict(what) => format!("{} already exists", what),

            // Hide details for internal/security errors
            AppError::Connection(diagnostic) => {
                tracing::error!("Database unavailable: {}", diagnostic);
                "The service is temporarily unavailable".to_string()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Jwt(e) => {
                tracing::error!("JWT error: {:?}", e);
                "Invalid or expired token".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }

    /// All validation messages (empty for non-validation errors)
    pub fn messages(&self) -> &[String] {
        match self {
            AppError::Validation(messages) => messages,
            _ => &[],
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
                details: self.messages().to_vec(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Classify driver failures into the error taxonomy.
impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            return AppError::Conflict(unique_subject(&detail));
        }

        match err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => {
                AppError::Connection(connection_diagnostic(&err.to_string()))
            }
            other => AppError::Database(other),
        }
    }
}

/// Build an actionable diagnostic for a connection failure.
pub fn connection_diagnostic(detail: &str) -> String {
    let lower = detail.to_lowercase();
    if lower.contains("does not exist") || lower.contains("unknown database") {
        format!(
            "{} (the target database does not exist; create it and run `booking-desk migrate up`)",
            detail
        )
    } else {
        format!(
            "{} (check that the database server is running and DATABASE_URL is correct)",
            detail
        )
    }
}

/// Map a unique-violation message onto the entity it concerns.
fn unique_subject(detail: &str) -> String {
    let lower = detail.to_lowercase();
    if lower.contains("pricing_plans") {
        "Pricing plan".to_string()
    } else if lower.contains("user_identities") || lower.contains("provider") {
        "Identity".to_string()
    } else if lower.contains("email") {
        "Email".to_string()
    } else {
        "Record".to_string()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(vec![msg.into()])
    }

    /// Validation error from a collected list; `None` when the list is empty.
    pub fn from_messages(messages: Vec<String>) -> Option<Self> {
        if messages.is_empty() {
            None
        } else {
            Some(AppError::Validation(messages))
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_displays_first_message() {
        let err = AppError::Validation(vec![
            "Name is required".to_string(),
            "Phone number is required".to_string(),
        ]);

        assert_eq!(err.to_string(), "Name is required");
        assert_eq!(err.messages().len(), 2);
    }

    #[test]
    fn test_from_messages_empty_is_none() {
        assert!(AppError::from_messages(vec![]).is_none());
        assert!(AppError::from_messages(vec!["x".into()]).is_some());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::conflict("Email").status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Connection("down".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(AppError::validation("bad").status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_connection_diagnostic_missing_database() {
        let msg = connection_diagnostic("database \"shop\" does not exist");
        assert!(msg.contains("migrate up"));

        let msg = connection_diagnostic("Connection refused");
        assert!(msg.contains("DATABASE_URL"));
    }

    #[test]
    fn test_unique_subject() {
        assert_eq!(unique_subject("UNIQUE constraint failed: users.email"), "Email");
        assert_eq!(
            unique_subject("UNIQUE constraint failed: pricing_plans.name"),
            "Pricing plan"
        );
    }
}
