//! HTTP Request body and content type

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Content type of a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// `application/json`
    #[default]
    Json,
    /// `application/xml`
    Xml,
    /// `text/plain`
    Text,
    /// `application/x-www-form-urlencoded`
    FormUrlEncoded,
    /// Any other media type, sent verbatim.
    Custom(String),
}

impl ContentType {
    /// Returns the media type string sent in the `Content-Type` header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml",
            Self::Text => "text/plain",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
            Self::Custom(value) => value,
        }
    }

    /// Maps a media type string to a known content type.
    ///
    /// Parameters such as `charset` are ignored when matching; unknown or
    /// unparsable values are kept as [`ContentType::Custom`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let Ok(parsed) = value.trim().parse::<mime::Mime>() else {
            return Self::Custom(value.trim().to_string());
        };
        match parsed.essence_str() {
            "application/json" => Self::Json,
            "application/xml" | "text/xml" => Self::Xml,
            "text/plain" => Self::Text,
            "application/x-www-form-urlencoded" => Self::FormUrlEncoded,
            _ => Self::Custom(value.trim().to_string()),
        }
    }

    /// Returns true if the content type carries JSON.
    #[must_use]
    pub fn is_json(&self) -> bool {
        match self {
            Self::Json => true,
            Self::Custom(value) => value.contains("+json"),
            _ => false,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ContentType {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

/// HTTP request body.
///
/// Structured values are held as JSON and encoded according to the
/// request's content type when the request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum RequestBody {
    /// A structured value.
    Json(serde_json::Value),
    /// A raw text payload sent as-is.
    Text(String),
}

impl RequestBody {
    /// Serializes any value into a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidBody`] if the value cannot be represented as JSON.
    pub fn serialize<T: Serialize + ?Sized>(value: &T) -> DomainResult<Self> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|e| DomainError::InvalidBody(e.to_string()))
    }

    /// Creates a plain text body.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// Returns the JSON value if this is a structured body.
    #[must_use]
    pub const fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Renders the body as text, serializing structured values compactly.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Json(value) => value.to_string(),
            Self::Text(content) => content.clone(),
        }
    }
}

impl From<serde_json::Value> for RequestBody {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl From<String> for RequestBody {
    fn from(content: String) -> Self {
        Self::Text(content)
    }
}

impl From<&str> for RequestBody {
    fn from(content: &str) -> Self {
        Self::Text(content.to_string())
    }
}
