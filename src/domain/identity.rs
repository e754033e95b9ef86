//! External sign-in identities linked to customer accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{FALLBACK_EMAIL_DOMAIN, FALLBACK_USER_NAME};

/// A provider account linked to a customer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalIdentity {
    pub id: i64,
    pub user_id: i64,
    pub provider: String,
    pub provider_user_id: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Profile handed over by the sign-in provider after a successful login.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
pub struct FederatedProfile {
    #[schema(example = "google")]
    pub provider: String,
    #[schema(example = "1098765")]
    pub provider_user_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl FederatedProfile {
    /// Normalized email, if the provider returned a usable one.
    pub fn email(&self) -> Option<String> {
        self.email
            .as_deref()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
    }

    /// Email for a new account; synthesized when the provider returned none.
    pub fn account_email(&self) -> String {
        self.email().unwrap_or_else(|| {
            format!(
                "{}_{}@{}",
                self.provider, self.provider_user_id, FALLBACK_EMAIL_DOMAIN
            )
        })
    }

    /// Display name for a new account.
    pub fn account_name(&self) -> String {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(FALLBACK_USER_NAME)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(email: Option<&str>, name: Option<&str>) -> FederatedProfile {
        FederatedProfile {
            provider: "google".to_string(),
            provider_user_id: "42".to_string(),
            email: email.map(str::to_string),
            display_name: name.map(str::to_string),
        }
    }

    #[test]
    fn test_fallbacks() {
        let p = profile(None, Some("  "));
        assert_eq!(p.account_email(), "google_42@noemail.local");
        assert_eq!(p.account_name(), "User");
    }

    #[test]
    fn test_email_normalized() {
        let p = profile(Some(" Jane@Example.COM "), Some("Jane"));
        assert_eq!(p.account_email(), "jane@example.com");
        assert_eq!(p.account_name(), "Jane");
    }
}
