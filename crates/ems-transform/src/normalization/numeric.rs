//! Numeric normalization utilities.

use ems_common::{format_numeric, parse_f64};

/// Parses a number, ignoring thousands separators, a currency sign and
/// surrounding whitespace. Accounting negatives like `(12.50)` are accepted.
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let (negative, body) = match trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        Some(inner) => (true, inner),
        None => (false, trimmed),
    };
    let cleaned: String = body.chars().filter(|c| !matches!(c, ',' | '$')).collect();
    let parsed = parse_f64(&cleaned)?;
    Some(if negative { -parsed } else { parsed })
}

/// Canonical text for a number: no trailing zeros, no exponent.
pub fn transform_to_numeric(value: &str) -> Option<String> {
    parse_number(value).map(format_numeric)
}

/// Parses a number and truncates it toward zero.
pub fn transform_to_integer(value: &str) -> Option<String> {
    let number = parse_number(value)?.trunc();
    if number.abs() >= i64::MAX as f64 {
        return None;
    }
    let int = number as i64;
    Some(int.to_string())
}
