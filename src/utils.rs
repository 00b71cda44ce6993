//! Utility functions for the gex-profile library.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Returns the instant an expiration date starts at: midnight UTC.
#[must_use]
pub fn expiration_instant(expiration: NaiveDate) -> DateTime<Utc> {
    expiration.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Sums decimal values, returning `None` if the total overflows.
///
/// ```rust
/// use gex_profile::utils::checked_sum;
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(checked_sum([dec!(1.5), dec!(-3)]), Some(dec!(-1.5)));
/// assert_eq!(checked_sum([Decimal::MAX, Decimal::ONE]), None);
/// ```
#[must_use]
pub fn checked_sum<I>(values: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().try_fold(Decimal::ZERO, Decimal::checked_add)
}

/// Scales a dollar value to millions.
#[must_use]
pub fn to_millions(value: Decimal) -> Decimal {
    value / dec!(1_000_000)
}

/// Formats a value rounded to whole units with `,` thousands separators.
///
/// ```rust
/// use gex_profile::utils::format_thousands;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_thousands(dec!(1234567.6)), "1,234,568");
/// assert_eq!(format_thousands(dec!(-1000)), "-1,000");
/// ```
#[must_use]
pub fn format_thousands(value: Decimal) -> String {
    let rounded = value.round_dp(0);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Formats a value rounded to `dp` decimals, padding with zeros.
///
/// ```rust
/// use gex_profile::utils::format_fixed;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_fixed(dec!(100), 2), "100.00");
/// assert_eq!(format_fixed(dec!(-0.36), 1), "-0.4");
/// ```
#[must_use]
pub fn format_fixed(value: Decimal, dp: u32) -> String {
    format!("{:.*}", dp as usize, value.round_dp(dp))
}

/// Formats a value with an explicit sign and a fixed number of decimals.
#[must_use]
pub fn format_signed(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp(dp);
    let body = format_fixed(rounded.abs(), dp);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{body}")
    } else {
        format!("+{body}")
    }
}
