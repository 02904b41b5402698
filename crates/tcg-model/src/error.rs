//! Error types for the wire model
//!
//! Ingestion is deliberately lenient about field names and value types, so
//! the only failures left are structural ones: a payload that is not JSON at
//! all, or JSON whose top-level shape matches none of the known layouts.

/// Errors raised while decoding backend payloads
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Body is not valid JSON
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    /// A record was expected to be a JSON object
    #[error("expected an object for {context}, got {found}")]
    NotAnObject {
        /// What was being decoded
        context: &'static str,
        /// JSON type actually found
        found: &'static str,
    },

    /// Top-level payload shape is not one we know how to flatten
    #[error("unrecognized payload shape: {0}")]
    UnrecognizedPayload(String),
}

impl ModelError {
    /// Create a not-an-object error for a JSON value
    #[must_use]
    pub fn not_an_object(context: &'static str, value: &serde_json::Value) -> Self {
        Self::NotAnObject {
            context,
            found: json_type_name(value),
        }
    }
}

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;

pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
