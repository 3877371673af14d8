//! Helpers for loosely-typed inbound JSON bodies.

use crate::error::ApiError;
use serde_json::{Map, Value};

/// Parse a request body as JSON. An empty body reads as `{}`.
pub fn parse_json_body(body: &[u8]) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(body).map_err(|_| ApiError::InvalidJson)
}

/// Like [`parse_json_body`], but a malformed body reads as `{}`.
pub fn parse_json_body_lenient(body: &[u8]) -> Value {
    parse_json_body(body).unwrap_or_else(|_| Value::Object(Map::new()))
}

/// The `prompt` field when it is a JSON string.
pub fn prompt_field(body: &Value) -> Option<&str> {
    body.get("prompt").and_then(Value::as_str)
}

/// JSON truthiness: `null`, `false`, `0`, `""`, `[]` and `{}` are all falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// The first of `keys` whose value in `body` is truthy.
pub fn first_truthy<'a>(body: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| body.get(*key))
        .find(|value| is_truthy(value))
}
