//! Price formatting for the public catalog.
//!
//! Prices are stored as integer minor units (centavos / cents). Colombian
//! pesos are shown without decimals and with `.` grouping; US dollars with
//! `,` grouping and two decimals.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Currencies a course may be priced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Cop,
    Usd,
}

impl Currency {
    /// ISO 4217 code as stored in the `courses.currency` column.
    pub fn code(self) -> &'static str {
        match self {
            Currency::Cop => "COP",
            Currency::Usd => "USD",
        }
    }

    /// Parse an ISO 4217 code (case-insensitive).
    pub fn parse(code: &str) -> Result<Self, CoreError> {
        match code.trim().to_ascii_uppercase().as_str() {
            "COP" => Ok(Currency::Cop),
            "USD" => Ok(Currency::Usd),
            other => Err(CoreError::Validation(format!(
                "Unsupported currency '{other}'. Must be one of: COP, USD"
            ))),
        }
    }
}

/// Format an amount given in minor units for display.
///
/// ```
/// use campus_core::currency::{format_currency, Currency};
///
/// assert_eq!(format_currency(125_000_000, Currency::Cop), "$ 1.250.000");
/// assert_eq!(format_currency(125_000, Currency::Usd), "US$ 1,250.00");
/// ```
pub fn format_currency(minor_units: i64, currency: Currency) -> String {
    let sign = if minor_units < 0 { "-" } else { "" };
    let abs = minor_units.unsigned_abs();
    let whole = abs / 100;
    let cents = abs % 100;

    match currency {
        // Round half up to whole pesos.
        Currency::Cop => {
            let pesos = whole + u64::from(cents >= 50);
            format!("{sign}$ {}", group_thousands(pesos, '.'))
        }
        Currency::Usd => format!("{sign}US$ {}.{cents:02}", group_thousands(whole, ',')),
    }
}

fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}
