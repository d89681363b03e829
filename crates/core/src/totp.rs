//! Time-based one-time passwords (RFC 6238) for the optional second factor.
//!
//! Codes are 6 digits over 30-second steps using HMAC-SHA256. The enrollment
//! payload is an `otpauth://` URI that authenticator apps read from a QR code.

use data_encoding::BASE32_NOPAD;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use url::Url;

use crate::error::CoreError;

type HmacSha256 = Hmac<Sha256>;

/// Number of digits in a code.
pub const CODE_DIGITS: usize = 6;

/// Length of one time step in seconds.
pub const STEP_SECS: u64 = 30;

/// Accepted clock skew in steps on either side of the current one.
pub const ALLOWED_SKEW_STEPS: u64 = 1;

/// Raw secret length in bytes (256 bits).
const SECRET_LEN: usize = 32;

/// Generate a random shared secret, base32-encoded without padding.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_LEN];
    rand::rng().fill_bytes(&mut bytes);
    BASE32_NOPAD.encode(&bytes)
}

/// Compute the code for the step containing `unix_secs`.
pub fn code_at(secret_b32: &str, unix_secs: u64) -> Result<String, CoreError> {
    let key = decode_secret(secret_b32)?;
    hotp(&key, unix_secs / STEP_SECS)
}

/// Verify a user-entered code against the current time, allowing
/// [`ALLOWED_SKEW_STEPS`] steps of drift.
pub fn verify_code(secret_b32: &str, code: &str, unix_secs: u64) -> Result<bool, CoreError> {
    let code = code.trim();
    if code.len() != CODE_DIGITS || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(CoreError::Validation(format!(
            "Verification code must be {CODE_DIGITS} digits"
        )));
    }

    let key = decode_secret(secret_b32)?;
    let step = unix_secs / STEP_SECS;
    let first = step.saturating_sub(ALLOWED_SKEW_STEPS);
    for candidate in first..=step + ALLOWED_SKEW_STEPS {
        if constant_time_eq(hotp(&key, candidate)?.as_bytes(), code.as_bytes()) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Build the `otpauth://totp/...` provisioning URI rendered as a QR code.
pub fn provisioning_uri(secret_b32: &str, issuer: &str, account: &str) -> Result<String, CoreError> {
    let mut url = Url::parse("otpauth://totp/")
        .map_err(|e| CoreError::Internal(format!("Invalid otpauth base: {e}")))?;
    url.set_path(&format!("{issuer}:{account}"));
    url.query_pairs_mut()
        .append_pair("secret", secret_b32)
        .append_pair("issuer", issuer)
        .append_pair("algorithm", "SHA256")
        .append_pair("digits", &CODE_DIGITS.to_string())
        .append_pair("period", &STEP_SECS.to_string());
    Ok(url.to_string())
}

fn hotp(key: &[u8], counter: u64) -> Result<String, CoreError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| CoreError::Internal(format!("Invalid TOTP key: {e}")))?;
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let binary = (u32::from(digest[offset] & 0x7f) << 24)
        | (u32::from(digest[offset + 1]) << 16)
        | (u32::from(digest[offset + 2]) << 8)
        | u32::from(digest[offset + 3]);

    Ok(format!(
        "{:0width$}",
        binary % 10u32.pow(CODE_DIGITS as u32),
        width = CODE_DIGITS
    ))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Decode a stored secret, tolerating lowercase, padding and whitespace the
/// way authenticator apps display it.
fn decode_secret(secret_b32: &str) -> Result<Vec<u8>, CoreError> {
    let normalized: String = secret_b32
        .chars()
        .filter(|c| *c != '=' && !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    let key = BASE32_NOPAD
        .decode(normalized.as_bytes())
        .map_err(|_| CoreError::Internal("Stored TOTP secret is not base32".into()))?;
    if key.is_empty() {
        return Err(CoreError::Internal("TOTP secret is empty".into()));
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// RFC 6238 appendix B seed for the SHA-256 test vectors.
    const RFC_SEED: &[u8] = b"12345678901234567890123456789012";

    #[test]
    fn matches_rfc6238_sha256_vectors() {
        let secret = BASE32_NOPAD.encode(RFC_SEED);
        // The RFC lists 8-digit codes; the last six digits are the 6-digit code.
        assert_eq!(code_at(&secret, 59).unwrap(), "119246");
        assert_eq!(code_at(&secret, 1_111_111_109).unwrap(), "084774");
        assert_eq!(code_at(&secret, 1_234_567_890).unwrap(), "819424");
    }

    #[test]
    fn secrets_decode_as_authenticators_display_them() {
        let shown = "jbsw y3dp ehpk 3pxp";
        assert_eq!(
            code_at(shown, 1_700_000_000).unwrap(),
            code_at("JBSWY3DPEHPK3PXP", 1_700_000_000).unwrap()
        );
        assert_eq!(generate_secret().len(), 52);
        assert!(code_at("not-base32!", 0).is_err());
        assert!(code_at("===", 0).is_err());
    }

    #[test]
    fn verify_accepts_adjacent_step() {
        let secret = generate_secret();
        let now = 1_700_000_000;
        let previous = code_at(&secret, now - STEP_SECS).unwrap();
        assert!(verify_code(&secret, &previous, now).unwrap());

        let window: Vec<String> = (now / STEP_SECS - 1..=now / STEP_SECS + 1)
            .map(|step| code_at(&secret, step * STEP_SECS).unwrap())
            .collect();
        let stale = code_at(&secret, now - 10 * STEP_SECS).unwrap();
        if !window.contains(&stale) {
            assert!(!verify_code(&secret, &stale, now).unwrap());
        }
    }

    #[test]
    fn verify_rejects_malformed_codes() {
        let secret = generate_secret();
        assert!(verify_code(&secret, "12345", 0).is_err());
        assert!(verify_code(&secret, "12a456", 0).is_err());
    }

    #[test]
    fn provisioning_uri_carries_issuer_and_secret() {
        let uri = provisioning_uri("JBSWY3DPEHPK3PXP", "Campus", "ana@example.com").unwrap();
        assert!(uri.starts_with("otpauth://totp/"), "{uri}");
        assert!(uri.contains("Campus:ana@example.com"), "{uri}");
        assert!(uri.contains("secret=JBSWY3DPEHPK3PXP"));
        assert!(uri.contains("algorithm=SHA256"));
    }
}
