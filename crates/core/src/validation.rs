//! Field-level validation shared by the API handlers.

use validator::ValidateEmail;

use crate::error::CoreError;
use crate::sanitize::sanitize_line;

/// Maximum length of an email address (RFC 5321 path limit).
pub const MAX_EMAIL_LEN: usize = 254;

/// Maximum length of a display name.
pub const MAX_DISPLAY_NAME_LEN: usize = 80;

/// Normalize and validate an email address.
///
/// Returns the trimmed, lowercased address.
pub fn validate_email(email: &str) -> Result<String, CoreError> {
    let normalized = email.trim().to_lowercase();
    if normalized.len() > MAX_EMAIL_LEN || !normalized.validate_email() {
        return Err(CoreError::Validation(format!(
            "'{}' is not a valid email address",
            email.trim()
        )));
    }
    Ok(normalized)
}

/// Sanitize and validate a display name.
pub fn validate_display_name(name: &str) -> Result<String, CoreError> {
    require_line("Display name", name, MAX_DISPLAY_NAME_LEN)
}

/// Sanitize a required single-line field and fail when nothing is left.
pub fn require_line(field: &str, value: &str, max_chars: usize) -> Result<String, CoreError> {
    let cleaned = sanitize_line(value, max_chars);
    if cleaned.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(cleaned)
}

/// Validate a URL-safe slug: lowercase ASCII letters, digits and single dashes.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    let valid = !slug.is_empty()
        && slug.len() <= 120
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid slug '{slug}'. Use lowercase letters, digits and single dashes"
        )))
    }
}
