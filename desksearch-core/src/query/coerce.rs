//! Coercion of raw query text into comparison values
//!
//! Coercion is purely syntactic: it looks at the field name and the raw
//! text, never at the schema or at what the records actually store.

use crate::record::Value;
use serde::{Deserialize, Serialize};

/// How raw text for an `_id` field becomes an integer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdCoercion {
    /// Non-numeric text is a coercion error
    #[default]
    Strict,
    /// Parse the leading integer prefix, yielding 0 when there is none
    Legacy,
}

/// Identifier fields are compared as integers. `external_id` holds opaque
/// text and is the one exception.
pub fn is_id_field(field: &str) -> bool {
    field.ends_with("_id") && field != "external_id"
}

/// Convert raw input into the value a field is compared against.
///
/// Rules, in order:
/// 1. exactly `true` / `false` becomes a boolean
/// 2. identifier fields become integers (see [`IdCoercion`])
/// 3. anything else stays text, the empty string included
pub fn coerce(field: &str, raw: &str, mode: IdCoercion) -> Result<Value, CoercionError> {
    match raw {
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        _ => {}
    }

    if !is_id_field(field) {
        return Ok(Value::Text(raw.to_string()));
    }

    match mode {
        IdCoercion::Legacy => Ok(Value::Int(leading_integer(raw))),
        // An empty value still asks for records where the field is empty
        IdCoercion::Strict if raw.is_empty() => Ok(Value::Text(String::new())),
        IdCoercion::Strict => raw
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| CoercionError::NotAnInteger {
                field: field.to_string(),
                raw: raw.to_string(),
            }),
    }
}

/// Lenient integer parse: optional leading whitespace, optional sign, then
/// as many digits as follow. No digits means 0; overflow saturates.
fn leading_integer(raw: &str) -> i64 {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = (b - b'0') as i64;
        value = value.saturating_mul(10);
        value = if negative {
            value.saturating_sub(digit)
        } else {
            value.saturating_add(digit)
        };
    }
    value
}

/// Coercion errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoercionError {
    #[error("Invalid query: '{raw}' is not an integer, as required for field '{field}'")]
    NotAnInteger { field: String, raw: String },
}
