//! Transport errors and backend error-payload normalization.
//!
//! DESIGN
//! ======
//! The account backend reports failures as a bare string, a list of strings,
//! a `{ "detail": ... }` object, or an object of per-field arrays. Everything
//! is folded into `FieldErrors` so forms render one shape.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Object keys that carry a form-wide message rather than a field message.
const TOP_LEVEL_KEYS: [&str; 4] = ["detail", "message", "error", "non_field_errors"];

/// Uniform `{ field -> messages }` error shape plus an optional top-level message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub message: Option<String>,
    pub fields: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    /// Form-wide error with no field detail.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self { message: Some(message.into()), fields: BTreeMap::new() }
    }

    /// Single field error.
    #[must_use]
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.fields.entry(field.to_owned()).or_default().push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.message.is_none() && self.fields.is_empty()
    }

    /// Messages attached to `field`, empty when none.
    #[must_use]
    pub fn messages_for(&self, field: &str) -> &[String] {
        self.fields.get(field).map_or(&[], Vec::as_slice)
    }

    /// One-line description: the top-level message, else the first field message.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        if let Some(message) = &self.message {
            return Some(message.clone());
        }
        self.fields
            .iter()
            .find_map(|(field, messages)| messages.first().map(|m| format!("{field}: {m}")))
    }

    /// Normalize any backend error payload.
    #[must_use]
    pub fn from_payload(value: &Value) -> Self {
        let mut errors = Self::default();
        match value {
            Value::String(_) | Value::Array(_) => {
                let messages = collect_messages(value);
                if !messages.is_empty() {
                    errors.message = Some(messages.join(" "));
                }
            }
            Value::Object(map) => {
                let mut top = Vec::new();
                for (key, inner) in map {
                    if TOP_LEVEL_KEYS.contains(&key.as_str()) {
                        top.extend(collect_messages(inner));
                    } else {
                        errors.push_value(key, inner);
                    }
                }
                if !top.is_empty() {
                    errors.message = Some(top.join(" "));
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
        errors
    }

    /// Normalize a raw response body. Non-JSON text becomes the top-level
    /// message unless it looks like an HTML error page.
    #[must_use]
    pub fn from_body(body: &str) -> Self {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Self::default();
        }
        match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => Self::from_payload(&value),
            Err(_) if trimmed.starts_with('<') => Self::default(),
            Err(_) => Self::message(trimmed),
        }
    }

    fn push_value(&mut self, field: &str, value: &Value) {
        match value {
            Value::Object(map) => {
                for (key, inner) in map {
                    self.push_value(&format!("{field}.{key}"), inner);
                }
            }
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    if item.is_object() {
                        self.push_value(&format!("{field}.{index}"), item);
                    } else {
                        for message in collect_messages(item) {
                            self.push(field, message);
                        }
                    }
                }
            }
            _ => {
                for message in collect_messages(value) {
                    self.push(field, message);
                }
            }
        }
    }
}

/// Flatten a JSON value into display strings.
fn collect_messages(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() { Vec::new() } else { vec![text.to_owned()] }
        }
        Value::Bool(_) | Value::Number(_) => vec![value.to_string()],
        Value::Array(items) => items.iter().flat_map(collect_messages).collect(),
        Value::Object(map) => map.values().flat_map(collect_messages).collect(),
    }
}

/// Failure of a single REST call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out after {0} ms")]
    Timeout(u32),
    #[error("unauthorized")]
    Unauthorized(FieldErrors),
    #[error("forbidden")]
    Forbidden(FieldErrors),
    #[error("request rejected with status {status}")]
    Rejected { status: u16, errors: FieldErrors },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("not available outside the browser")]
    Unavailable,
}

/// Map a completed HTTP exchange onto a typed body or an `ApiError`.
///
/// # Errors
///
/// Returns `Unauthorized`/`Forbidden` for 401/403, `Rejected` for any other
/// non-2xx status, and `Malformed` when a 2xx body does not decode as `T`.
pub fn classify_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    if (200..300).contains(&status) {
        return serde_json::from_str(body).map_err(|e| ApiError::Malformed(e.to_string()));
    }
    let errors = FieldErrors::from_body(body);
    match status {
        401 => Err(ApiError::Unauthorized(errors)),
        403 => Err(ApiError::Forbidden(errors)),
        _ => Err(ApiError::Rejected { status, errors }),
    }
}
