// src/models/mod.rs

pub mod comment;
pub mod feed;
pub mod notification;
pub mod post;
pub mod user;

use url::Url;

/// Validates that a string is a correctly formatted URL.
/// Empty strings are accepted and mean "no image".
pub(crate) fn validate_image_url(url: &str) -> Result<(), validator::ValidationError> {
    if url.is_empty() {
        return Ok(());
    }
    if Url::parse(url).is_err() {
        return Err(validator::ValidationError::new("invalid_url"));
    }
    Ok(())
}
