//! WhatsApp click-to-chat links for professional profiles and course pages.

use url::Url;

use crate::error::CoreError;

/// Base of the click-to-chat endpoint.
const WA_BASE: &str = "https://wa.me/";

/// Phone numbers shorter than this cannot carry a country code.
const MIN_PHONE_DIGITS: usize = 8;

/// E.164 upper bound.
const MAX_PHONE_DIGITS: usize = 15;

/// Keep only the digits of a phone number as typed by an admin
/// (`+57 300 123 4567`, `(300) 123-4567`, ...).
pub fn normalize_phone(phone: &str) -> Result<String, CoreError> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len()) {
        return Err(CoreError::Validation(format!(
            "Phone number '{phone}' must contain between {MIN_PHONE_DIGITS} and \
             {MAX_PHONE_DIGITS} digits including the country code"
        )));
    }
    Ok(digits)
}

/// Build a `https://wa.me/<digits>?text=<message>` deep link.
///
/// The message is percent-encoded; an empty message yields a link without
/// the `text` parameter.
pub fn whatsapp_link(phone: &str, message: &str) -> Result<String, CoreError> {
    let digits = normalize_phone(phone)?;
    let mut url = Url::parse(WA_BASE)
        .and_then(|base| base.join(&digits))
        .map_err(|e| CoreError::Internal(format!("Invalid WhatsApp URL: {e}")))?;

    let message = message.trim();
    if !message.is_empty() {
        url.query_pairs_mut().append_pair("text", message);
    }
    Ok(url.to_string())
}
