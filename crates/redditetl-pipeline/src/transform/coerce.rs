//! Coercion of raw JSON values into the normalized column types.
//!
//! Every function is total over [`Value`] or returns a human-readable reason
//! that the caller wraps into a `SchemaError`.

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Stringify a value. Strings pass through; `null` becomes `"None"` and
/// booleans `"True"`/`"False"` to match the CSV boolean spelling.
pub(crate) fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Truthiness: `null`, `false`, zero, and empty strings/arrays/objects are
/// false; everything else is true.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// `edited` is either `false` or an edit timestamp. Only a literal `false`
/// means unedited.
pub(crate) fn collapse_edited(value: &Value) -> bool {
    !matches!(value, Value::Bool(false))
}

/// Integer coercion: floats truncate toward zero, numeric strings parse,
/// booleans map to 0/1.
pub(crate) fn to_integer(value: &Value) -> Result<i64, String> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            if let Some(u) = n.as_u64() {
                return i64::try_from(u).map_err(|_| format!("{u} does not fit in i64"));
            }
            n.as_f64()
                .ok_or_else(|| format!("unrepresentable number {n}"))
                .and_then(truncate_f64)
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(i) = trimmed.parse::<i64>() {
                return Ok(i);
            }
            trimmed
                .parse::<f64>()
                .map_err(|_| format!("expected an integer, got {s:?}"))
                .and_then(truncate_f64)
        }
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Null | Value::Array(_) | Value::Object(_) => {
            Err(format!("expected an integer, got {}", kind(value)))
        }
    }
}

/// Epoch seconds (int, float or numeric string) to a UTC timestamp at
/// second precision.
pub(crate) fn to_timestamp(value: &Value) -> Result<DateTime<Utc>, String> {
    let seconds = match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("unrepresentable number {n}"))?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("expected epoch seconds, got {s:?}"))?,
        _ => return Err(format!("expected epoch seconds, got {}", kind(value))),
    };
    if seconds.is_nan() || seconds < 0.0 {
        return Err(format!("epoch seconds must be non-negative, got {seconds}"));
    }
    let whole = truncate_f64(seconds)?;
    DateTime::from_timestamp(whole, 0).ok_or_else(|| format!("timestamp {whole} out of range"))
}

fn truncate_f64(f: f64) -> Result<i64, String> {
    #[allow(clippy::cast_precision_loss)]
    const BOUND: f64 = i64::MAX as f64;
    if !f.is_finite() || f.trunc() >= BOUND || f.trunc() < -BOUND {
        return Err(format!("{f} is not a representable integer"));
    }
    #[allow(clippy::cast_possible_truncation)]
    Ok(f.trunc() as i64)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
