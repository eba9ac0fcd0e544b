//! Helpers for reading loosely-typed result payloads.

use serde_json::{Map, Number, Value};

use crate::RenderError;

/// Truthiness of a payload value: null, false, zero, and empty
/// strings/arrays/objects are falsy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Numeric view of a value. Booleans are not numbers here.
pub(crate) fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Display text for a value: strings unquoted, everything else as JSON.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A field that must be present and a JSON number, kept as written.
pub(crate) fn require_json_number<'a>(
    map: &'a Map<String, Value>,
    key: &str,
) -> Result<&'a Number, RenderError> {
    match map.get(key) {
        None => Err(RenderError::MissingField(key.to_string())),
        Some(Value::Number(n)) => Ok(n),
        Some(_) => Err(RenderError::invalid(key, "number")),
    }
}

/// A field that must be present and numeric.
pub(crate) fn require_number(map: &Map<String, Value>, key: &str) -> Result<f64, RenderError> {
    require_json_number(map, key)?
        .as_f64()
        .ok_or_else(|| RenderError::invalid(key, "number"))
}
