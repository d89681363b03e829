//! Password strength rules.
//!
//! [`check_password_strength`] scores a candidate password for the strength
//! meter shown on sign-up and password-change forms; [`validate_password`] is
//! the hard gate applied before any hash is computed.

use serde::Serialize;

use crate::error::CoreError;

/// Minimum accepted password length (characters).
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Upper bound to keep Argon2 input bounded.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Length at which a password earns the "long" point.
const LONG_PASSWORD_LENGTH: usize = 12;

/// A single strength rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordRule {
    MinLength,
    Uppercase,
    Lowercase,
    Digit,
    Symbol,
}

/// Coarse strength bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthLevel {
    Weak,
    Fair,
    Strong,
}

/// Result of scoring a password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordStrength {
    /// 0..=5: one point per character class present plus one for length >= 12.
    pub score: u8,
    pub level: StrengthLevel,
    /// Rules the password does not satisfy yet.
    pub missing: Vec<PasswordRule>,
}

/// Score a password against all rules.
pub fn check_password_strength(password: &str) -> PasswordStrength {
    let len = password.chars().count();
    let mut missing = Vec::new();

    if len < MIN_PASSWORD_LENGTH {
        missing.push(PasswordRule::MinLength);
    }
    if !password.chars().any(char::is_uppercase) {
        missing.push(PasswordRule::Uppercase);
    }
    if !password.chars().any(char::is_lowercase) {
        missing.push(PasswordRule::Lowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        missing.push(PasswordRule::Digit);
    }
    if !password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace())
    {
        missing.push(PasswordRule::Symbol);
    }

    let classes = missing
        .iter()
        .filter(|rule| **rule != PasswordRule::MinLength)
        .count();
    let score = (4 - classes) as u8 + u8::from(len >= LONG_PASSWORD_LENGTH);

    let level = match score {
        0..=2 => StrengthLevel::Weak,
        3 => StrengthLevel::Fair,
        _ if missing.contains(&PasswordRule::MinLength) => StrengthLevel::Fair,
        _ => StrengthLevel::Strong,
    };

    PasswordStrength {
        score,
        level,
        missing,
    }
}

/// Reject passwords that cannot be used for an account.
///
/// Requires the minimum length, an uppercase letter, a lowercase letter and
/// a digit. Symbols raise the score but are not mandatory.
pub fn validate_password(password: &str) -> Result<(), CoreError> {
    if password.chars().count() > MAX_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at most {MAX_PASSWORD_LENGTH} characters long"
        )));
    }

    let strength = check_password_strength(password);
    let required = [
        (
            PasswordRule::MinLength,
            format!("at least {MIN_PASSWORD_LENGTH} characters"),
        ),
        (PasswordRule::Uppercase, "an uppercase letter".to_string()),
        (PasswordRule::Lowercase, "a lowercase letter".to_string()),
        (PasswordRule::Digit, "a digit".to_string()),
    ];

    let unmet: Vec<String> = required
        .into_iter()
        .filter(|(rule, _)| strength.missing.contains(rule))
        .map(|(_, text)| text)
        .collect();

    if unmet.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Password must contain {}",
            unmet.join(", ")
        )))
    }
}

/// Check that a new password and its confirmation match.
pub fn validate_confirmation(password: &str, confirmation: &str) -> Result<(), CoreError> {
    if password != confirmation {
        return Err(CoreError::Validation(
            "Password confirmation does not match".into(),
        ));
    }
    Ok(())
}
