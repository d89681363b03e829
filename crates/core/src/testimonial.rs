//! Testimonial submission rules and moderation decisions.
//!
//! Submissions land in the pending table; an admin either promotes them to
//! the published table or rejects them. The limits below are applied to
//! sanitized text, before anything is stored.

use serde::Serialize;

use crate::error::CoreError;
use crate::sanitize::{sanitize_line, sanitize_text};

/// Maximum length of the author name.
pub const MAX_NAME_LEN: usize = 80;

/// Maximum length of the author role/title (e.g. "Estudiante").
pub const MAX_ROLE_LEN: usize = 100;

/// Minimum length of the testimonial body.
pub const MIN_CONTENT_LEN: usize = 3;

/// Maximum length of the testimonial body.
pub const MAX_CONTENT_LEN: usize = 1_000;

/// Suggested refresh interval for the moderation panel.
pub const PENDING_POLL_INTERVAL_SECS: u64 = 5;

/// Terminal state of a moderated testimonial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approved,
    Rejected,
}

/// Sanitized, validated submission fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanSubmission {
    pub name: String,
    pub role: String,
    pub content: String,
}

/// Sanitize and validate a submission.
///
/// `name` falls back to `fallback_name` (the account display name) when it is
/// missing or blank after sanitizing.
pub fn clean_submission(
    name: Option<&str>,
    fallback_name: &str,
    role: &str,
    content: &str,
) -> Result<CleanSubmission, CoreError> {
    let name = name
        .map(|n| sanitize_line(n, MAX_NAME_LEN))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| sanitize_line(fallback_name, MAX_NAME_LEN));
    if name.is_empty() {
        return Err(CoreError::Validation("Name is required".into()));
    }

    let role = sanitize_line(role, MAX_ROLE_LEN);
    if role.is_empty() {
        return Err(CoreError::Validation("Role is required".into()));
    }

    let content = sanitize_text(content, MAX_CONTENT_LEN);
    if content.chars().count() < MIN_CONTENT_LEN {
        return Err(CoreError::Validation(format!(
            "Testimonial must be at least {MIN_CONTENT_LEN} characters long"
        )));
    }

    Ok(CleanSubmission {
        name,
        role,
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_name_wins_over_account_name() {
        let s = clean_submission(Some("Ana"), "ana.perez", "Estudiante", "Excelente").unwrap();
        assert_eq!(s.name, "Ana");
        assert_eq!(s.role, "Estudiante");
        assert_eq!(s.content, "Excelente");
    }

    #[test]
    fn blank_name_falls_back_to_account_name() {
        let s = clean_submission(Some("   "), "Ana Pérez", "Docente", "Muy buena experiencia").unwrap();
        assert_eq!(s.name, "Ana Pérez");
    }

    #[test]
    fn markup_is_removed_before_length_checks() {
        let err = clean_submission(None, "Ana", "Estudiante", "<p> </p>ok").unwrap_err();
        assert!(err.to_string().contains("at least 3 characters"));
    }

    #[test]
    fn role_is_required() {
        assert!(clean_submission(None, "Ana", "  ", "Excelente experiencia").is_err());
    }

    #[test]
    fn content_is_truncated_to_limit() {
        let long = "a".repeat(MAX_CONTENT_LEN + 50);
        let s = clean_submission(None, "Ana", "Estudiante", &long).unwrap();
        assert_eq!(s.content.chars().count(), MAX_CONTENT_LEN);
    }

    #[test]
    fn decisions_serialize_in_snake_case() {
        assert_eq!(serde_json::to_value(Decision::Approved).unwrap(), "approved");
        assert_eq!(serde_json::to_value(Decision::Rejected).unwrap(), "rejected");
    }
}
