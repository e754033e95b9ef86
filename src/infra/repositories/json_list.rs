//! Text columns holding a JSON array of strings.

use crate::errors::{AppError, AppResult};

/// Encode a list for storage; an empty list is stored as NULL.
pub fn encode(items: &[String]) -> AppResult<Option<String>> {
    if items.is_empty() {
        return Ok(None);
    }

    serde_json::to_string(items)
        .map(Some)
        .map_err(|e| AppError::internal(format!("List encode failed: {}", e)))
}

/// Decode a stored list. NULL, blank or malformed values yield an empty list.
pub fn decode(raw: Option<&str>, column: &'static str, id: i64) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(column, id, error = %e, "Malformed list column, using empty list");
            Vec::new()
        }
    }
}
