//! Signed currency amounts.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::FormatError;

/// Signed amount with two decimal places. Negative = outflow, positive = inflow.
pub type Amount = Decimal;

/// Parse a currency-formatted string such as `-$1,234.56`.
///
/// The currency symbol, thousands separators and inner whitespace are
/// dropped. The literal sign is preserved; callers apply their own column
/// or format sign convention on top. More than two decimal places is an
/// error. The result always carries scale 2.
pub fn parse_amount(text: &str) -> Result<Amount, FormatError> {
    let invalid = || FormatError::Amount(text.to_string());

    let cleaned: String = text
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();

    let (sign, digits) = match cleaned.strip_prefix(['-', '+']) {
        Some(rest) => (&cleaned[..1], rest),
        None => ("", cleaned.as_str()),
    };
    let well_formed = digits.bytes().any(|b| b.is_ascii_digit())
        && digits.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        && digits.matches('.').count() <= 1;
    if !well_formed {
        return Err(invalid());
    }

    let lead = if digits.starts_with('.') { "0" } else { "" };
    let mut amount =
        Decimal::from_str(&format!("{sign}{lead}{digits}")).map_err(|_| invalid())?;
    if amount.scale() > 2 {
        return Err(invalid());
    }
    amount.rescale(2);
    Ok(amount)
}
