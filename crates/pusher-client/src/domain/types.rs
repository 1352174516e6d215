//! Shared value types.

use serde_json::{Map, Value};

/// Decoded JSON object returned by the API or carried by a webhook
pub type ResponseMap = Map<String, Value>;

/// Decode a response body into a [`ResponseMap`].
///
/// An empty body (e.g. `200 OK` with no content) decodes to an empty map.
pub fn decode_response(body: &str) -> Result<ResponseMap, String> {
    if body.trim().is_empty() {
        return Ok(ResponseMap::new());
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!("expected JSON object, got {other}")),
        Err(e) => Err(e.to_string()),
    }
}
