//! Course financing plans: validation and installment arithmetic.
//!
//! A plan splits a course price into `installments` monthly payments with
//! simple monthly interest expressed in basis points (1 bp = 0.01 %).

use serde::Serialize;

use crate::error::CoreError;

/// Maximum number of monthly installments a plan may offer.
pub const MAX_INSTALLMENTS: i32 = 60;

/// Maximum monthly interest (100 %).
pub const MAX_MONTHLY_RATE_BPS: i32 = 10_000;

/// Maximum length of a plan label.
pub const MAX_LABEL_LEN: usize = 120;

/// Validate the numeric terms of a financing plan.
pub fn validate_terms(installments: i32, monthly_rate_bps: i32) -> Result<(), CoreError> {
    if !(1..=MAX_INSTALLMENTS).contains(&installments) {
        return Err(CoreError::Validation(format!(
            "Installments must be between 1 and {MAX_INSTALLMENTS}"
        )));
    }
    if !(0..=MAX_MONTHLY_RATE_BPS).contains(&monthly_rate_bps) {
        return Err(CoreError::Validation(format!(
            "Monthly rate must be between 0 and {MAX_MONTHLY_RATE_BPS} basis points"
        )));
    }
    Ok(())
}

/// Payment schedule derived from a price and plan terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    /// Amount of each monthly payment, in minor units (rounded up).
    pub installment_amount: i64,
    /// Sum of all payments, in minor units.
    pub total_amount: i64,
}

/// Compute the installment schedule for `price` (minor units).
///
/// Interest is simple: `price * rate * installments`, rounded up to the next
/// minor unit. The installment is the total divided evenly, rounded up, so
/// the customer never pays less than the total.
pub fn quote(price: i64, installments: i32, monthly_rate_bps: i32) -> Result<Quote, CoreError> {
    validate_terms(installments, monthly_rate_bps)?;
    if price < 0 {
        return Err(CoreError::Validation("Price must not be negative".into()));
    }

    let price = i128::from(price);
    let n = i128::from(installments);
    let interest = div_ceil(price * i128::from(monthly_rate_bps) * n, 10_000);
    let total = price + interest;
    let installment = div_ceil(total, n);

    let to_i64 = |v: i128| {
        i64::try_from(v).map_err(|_| CoreError::Validation("Amount out of range".into()))
    };

    Ok(Quote {
        installment_amount: to_i64(installment)?,
        total_amount: to_i64(installment * n)?,
    })
}

fn div_ceil(a: i128, b: i128) -> i128 {
    (a + b - 1) / b
}
