//! Numeric-Safe Decoding
//!
//! Errorly identifiers are 64-bit snowflakes. A browser decoding them as
//! doubles silently rounds anything above 2^53, so every integer literal
//! outside that range is kept as its original decimal string. The rule is
//! applied to the whole document: the decoder cannot know which fields are
//! identifiers. Fractional and exponent literals follow the same idea: they
//! become doubles only when no digit is lost.

use serde::de::DeserializeOwned;
use serde_json::{Number, Value};
use thiserror::Error;

/// Largest integer a double represents exactly (2^53 - 1)
pub const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

/// Malformed response body
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Malformed response at line {line}, column {column}: {message}")]
pub struct DecodeError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

/// Decode a response body, keeping unsafe integers as decimal strings
pub fn decode(raw: &str) -> Result<Value, DecodeError> {
    let value: Value = serde_json::from_str(raw)?;
    Ok(preserve_numbers(value))
}

/// Decode a response body into `T` after numeric-safe decoding.
///
/// Fields of `T` that hold identifiers must accept strings (see
/// [`crate::state::projects::Snowflake`]).
pub fn decode_as<T: DeserializeOwned>(raw: &str) -> Result<T, DecodeError> {
    let value = decode(raw)?;
    serde_json::from_value(value).map_err(DecodeError::from)
}

fn preserve_numbers(value: Value) -> Value {
    match value {
        Value::Number(number) => safe_number(number),
        Value::Array(items) => Value::Array(items.into_iter().map(preserve_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, preserve_numbers(value)))
                .collect(),
        ),
        other => other,
    }
}

fn safe_number(number: Number) -> Value {
    // arbitrary_precision keeps every digit; the exponent may be re-spelled
    let literal = number.to_string();

    if is_integer_literal(&literal) {
        let magnitude = literal.trim_start_matches('-').parse::<u64>();
        return match (magnitude, literal.parse::<i64>()) {
            (Ok(m), Ok(n)) if m <= MAX_SAFE_INTEGER => Value::Number(Number::from(n)),
            _ => Value::String(literal),
        };
    }

    // A fraction becomes a double only when the double reads back as the same decimal
    let exact = literal
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .filter(|f| same_decimal(&literal, &format!("{:e}", f)))
        .and_then(Number::from_f64);

    match exact {
        Some(n) => Value::Number(n),
        None => Value::String(literal),
    }
}

fn is_integer_literal(literal: &str) -> bool {
    !literal.contains(['.', 'e', 'E'])
}

fn same_decimal(a: &str, b: &str) -> bool {
    match (decimal_key(a), decimal_key(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// `(negative, significant digits, exponent)` with zeros trimmed, so equal
/// decimals spelled differently compare equal
fn decimal_key(text: &str) -> Option<(bool, String, i64)> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (mantissa, exponent) = match rest.find(['e', 'E']) {
        Some(at) => (&rest[..at], rest[at + 1..].parse::<i64>().ok()?),
        None => (rest, 0),
    };
    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int.is_empty() && frac.is_empty() {
        return None;
    }
    if !int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = format!("{}{}", int, frac);
    let leading = digits.trim_start_matches('0');
    let significant = leading.trim_end_matches('0');
    if significant.is_empty() {
        return Some((false, String::new(), 0));
    }
    let exponent = exponent - frac.len() as i64 + (leading.len() - significant.len()) as i64;
    Some((negative, significant.to_string(), exponent))
}
