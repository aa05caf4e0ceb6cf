// src/utils/id.rs

use uuid::Uuid;

use crate::error::AppError;

/// Parses a path or body id into canonical hyphenated form. Malformed ids are
/// rejected with 400 before reaching the store.
pub fn parse_id(raw: &str, what: &str) -> Result<String, AppError> {
    Uuid::parse_str(raw.trim())
        .map(|id| id.to_string())
        .map_err(|_| AppError::BadRequest(format!("Invalid {what} id")))
}
