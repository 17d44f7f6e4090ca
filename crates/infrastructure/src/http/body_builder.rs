//! HTTP request body builder.
//!
//! Encodes a domain [`RequestBody`] into the bytes sent on the wire,
//! according to the request's [`ContentType`].

use restprobe_domain::{ContentType, RequestBody};
use serde_json::Value;

/// Error type for body building operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BodyBuildError {
    /// The body shape cannot be expressed in the content type.
    #[error("Cannot encode body as {content_type}: {message}")]
    Unsupported {
        /// Target content type.
        content_type: String,
        /// What was wrong with the body.
        message: String,
    },

    /// Serialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Underlying cause.
        message: String,
    },
}

/// Build the wire representation of a body.
///
/// - Text bodies are sent as-is.
/// - Structured bodies are serialized as JSON, except for form content
///   where a flat object becomes `key=value` pairs (arrays repeat the key)
///   and for text or XML content where a JSON string is sent unquoted.
///
/// # Errors
///
/// Returns [`BodyBuildError`] if a structured body cannot be represented
/// in the requested content type.
pub fn build_body(body: &RequestBody, content_type: &ContentType) -> Result<String, BodyBuildError> {
    match (body, content_type) {
        (RequestBody::Text(content), _) => Ok(content.clone()),

        (RequestBody::Json(value), ContentType::FormUrlEncoded) => encode_form(value),

        (RequestBody::Json(Value::String(content)), ContentType::Text | ContentType::Xml) => {
            Ok(content.clone())
        }

        (RequestBody::Json(value), _) => {
            serde_json::to_string(value).map_err(|e| BodyBuildError::Serialization {
                message: e.to_string(),
            })
        }
    }
}

fn encode_form(value: &Value) -> Result<String, BodyBuildError> {
    let Value::Object(fields) = value else {
        return Err(unsupported_form("expected an object of fields"));
    };

    let mut pairs: Vec<(&str, String)> = Vec::with_capacity(fields.len());
    for (key, value) in fields {
        match value {
            Value::Array(items) => {
                for item in items {
                    pairs.push((key, form_scalar(key, item)?));
                }
            }
            other => pairs.push((key, form_scalar(key, other)?)),
        }
    }

    serde_urlencoded::to_string(&pairs).map_err(|e| BodyBuildError::Serialization {
        message: e.to_string(),
    })
}

fn form_scalar(key: &str, value: &Value) -> Result<String, BodyBuildError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Null => Ok(String::new()),
        Value::Bool(_) | Value::Number(_) => Ok(value.to_string()),
        Value::Array(_) | Value::Object(_) => Err(unsupported_form(&format!(
            "field '{key}' is nested"
        ))),
    }
}

fn unsupported_form(message: &str) -> BodyBuildError {
    BodyBuildError::Unsupported {
        content_type: ContentType::FormUrlEncoded.to_string(),
        message: message.to_string(),
    }
}
