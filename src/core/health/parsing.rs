//! Proxy Response Body Parsing
//!
//! The proxy owns its response schema, so parsing stays tolerant: it only needs
//! to tell success from failure and pull out a human-readable error message.

use serde_json::{Map, Value};

/// Longest raw (non-JSON) body echoed back as an error message
const MAX_RAW_ERROR_LEN: usize = 500;

/// Parse a response body as JSON; None for empty or invalid bodies
pub fn parse_json_body(body: &[u8]) -> Option<Value> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return None;
    }
    serde_json::from_slice(body).ok()
}

/// Whether a 2xx response body reports success
///
/// - Must be a JSON object
/// - Must not carry a non-null `error` field
/// - A `status` string, when present, must not be a failure word
///
/// All field names and status values are case-insensitive.
pub fn body_indicates_success(body: &[u8]) -> bool {
    let json_value = match parse_json_body(body) {
        Some(value) => value,
        None => return false, // Empty or invalid JSON
    };

    let obj = match json_value.as_object() {
        Some(obj) => obj,
        None => return false, // Not an object
    };

    if field(obj, "error").is_some_and(|error| !error.is_null()) {
        return false;
    }

    match field(obj, "status").and_then(Value::as_str) {
        Some(status) => !is_failure_status(status),
        None => true,
    }
}

fn is_failure_status(status: &str) -> bool {
    matches!(
        status.to_ascii_lowercase().as_str(),
        "error" | "down" | "fail" | "failed" | "failure" | "critical" | "offline" | "unhealthy"
    )
}

/// Extract a non-empty `token` string from a registration response
pub fn extract_token(body: &[u8]) -> Option<String> {
    let json_value = parse_json_body(body)?;
    let token = field(json_value.as_object()?, "token")?.as_str()?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Best-effort error message from a failure response
///
/// Tried in order:
/// - `{"error": {"message": "..."}}` (OpenAI / Anthropic style)
/// - `{"error": "..."}`
/// - `{"detail": "..."}` or `{"detail": [{"msg": "..."}]}` (FastAPI style)
/// - `{"message": "..."}`
/// - the raw body text, trimmed and truncated
pub fn extract_error_message(body: &[u8]) -> String {
    if let Some(Value::Object(obj)) = parse_json_body(body) {
        if let Some(message) = message_from_object(&obj) {
            return message;
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return "empty response body".to_string();
    }
    truncate_chars(text, MAX_RAW_ERROR_LEN)
}

fn message_from_object(obj: &Map<String, Value>) -> Option<String> {
    if let Some(error) = field(obj, "error") {
        match error {
            Value::String(message) if !message.trim().is_empty() => {
                return Some(message.trim().to_string())
            }
            Value::Object(inner) => {
                if let Some(message) = field(inner, "message").and_then(non_empty_str) {
                    return Some(message);
                }
            }
            _ => {}
        }
    }

    if let Some(detail) = field(obj, "detail") {
        match detail {
            Value::String(message) if !message.trim().is_empty() => {
                return Some(message.trim().to_string())
            }
            Value::Array(items) => {
                let messages: Vec<String> = items
                    .iter()
                    .filter_map(|item| item.as_object())
                    .filter_map(|item| field(item, "msg").and_then(non_empty_str))
                    .collect();
                if !messages.is_empty() {
                    return Some(messages.join("; "));
                }
            }
            _ => {}
        }
    }

    field(obj, "message").and_then(non_empty_str)
}

/// Case-insensitive field lookup
fn field<'a>(obj: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    obj.iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Truncate to at most `max_chars` characters, marking the cut with an ellipsis
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}
