//! Numeric interpretation of textual bureau leaves.
//!
//! Amounts are passed through in the bureau's reported unit. Unparsable
//! text is a data-quality fact and becomes the default, never an error.

use crate::tree::{self, ShapeError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Plain base-10 numbers: optional sign, digits, optional fraction.
/// Exponents, hex, `inf` and `NaN` are not accepted.
static DECIMAL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)$").expect("valid decimal pattern"));

/// Parses `value` as a decimal number, or returns `default`.
///
/// Surrounding whitespace is ignored.
pub fn to_number(value: Option<&str>, default: f64) -> f64 {
    let Some(text) = value.map(str::trim).filter(|t| !t.is_empty()) else {
        return default;
    };

    if !DECIMAL_PATTERN.is_match(text) {
        return default;
    }

    match text.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => parsed,
        _ => default,
    }
}

/// Integer-typed variant of [`to_number`]; fractions truncate toward zero.
pub fn to_integer(value: Option<&str>, default: i64) -> i64 {
    let parsed = to_number(value, f64::NAN);
    if parsed.is_nan() || parsed.abs() >= i64::MAX as f64 {
        return default;
    }
    parsed.trunc() as i64
}

/// Coerces a tree node, defaulting to zero.
///
/// Faults only when a container sits where a numeric leaf was expected.
pub fn coerce_number(node: Option<&Value>) -> Result<f64, ShapeError> {
    Ok(to_number(tree::leaf_text(node)?.as_deref(), 0.0))
}

/// Integer counterpart of [`coerce_number`].
pub fn coerce_integer(node: Option<&Value>) -> Result<i64, ShapeError> {
    Ok(to_integer(tree::leaf_text(node)?.as_deref(), 0))
}
