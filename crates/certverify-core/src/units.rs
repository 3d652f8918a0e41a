//! Unit formatting for receipt amounts.

use alloy_primitives::utils::format_units;
use alloy_primitives::U256;

use crate::error::CoreError;

/// Format a wei amount in gwei.
///
/// Trailing zeros of the fraction are trimmed, but at least one fractional
/// digit is always printed: one gwei is `"1.0"`.
pub fn format_gwei(wei: U256) -> Result<String, CoreError> {
    Ok(trim_fraction(format_units(wei, "gwei")?))
}

fn trim_fraction(mut formatted: String) -> String {
    if let Some(dot) = formatted.find('.') {
        let keep = formatted.trim_end_matches('0').len().max(dot + 2);
        formatted.truncate(keep);
    }
    formatted
}
