//! Raw response type
//!
//! Contains types for representing HTTP responses including
//! status codes, headers, body, and timing information.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ResponseHeaders;

/// HTTP status code with semantic helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// Creates a new `StatusCode`.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric status code.
    #[must_use]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns true if this is a 1xx informational status.
    #[must_use]
    pub const fn is_informational(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Returns true if this is a 2xx success status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Returns true if this is a 3xx redirection status.
    #[must_use]
    pub const fn is_redirection(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }

    /// Returns true if this is a 4xx client error status.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }

    /// Returns true for any status of 500 or above.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.0 >= 500
    }

    /// Returns the canonical reason phrase for common status codes.
    #[must_use]
    pub const fn reason_phrase(&self) -> &'static str {
        match self.0 {
            100 => "Continue",
            101 => "Switching Protocols",
            200 => "OK",
            201 => "Created",
            202 => "Accepted",
            204 => "No Content",
            301 => "Moved Permanently",
            302 => "Found",
            304 => "Not Modified",
            307 => "Temporary Redirect",
            308 => "Permanent Redirect",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            408 => "Request Timeout",
            409 => "Conflict",
            422 => "Unprocessable Entity",
            429 => "Too Many Requests",
            500 => "Internal Server Error",
            501 => "Not Implemented",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            504 => "Gateway Timeout",
            _ => "Unknown",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

/// A response exactly as received from the transport.
///
/// Immutable once built. The body is kept as bytes and decoded on demand
/// using the charset declared in `Content-Type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawResponse {
    status: StatusCode,
    headers: ResponseHeaders,
    #[serde(with = "body_base64")]
    body: Vec<u8>,
    #[serde(with = "duration_millis")]
    elapsed: Duration,
}

impl RawResponse {
    /// Creates a response from its parts.
    #[must_use]
    pub fn new(
        status: impl Into<StatusCode>,
        headers: ResponseHeaders,
        body: impl Into<Vec<u8>>,
        elapsed: Duration,
    ) -> Self {
        Self {
            status: status.into(),
            headers,
            body: body.into(),
            elapsed,
        }
    }

    /// Status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Received headers.
    #[must_use]
    pub const fn headers(&self) -> &ResponseHeaders {
        &self.headers
    }

    /// Body bytes.
    #[must_use]
    pub fn body_bytes(&self) -> &[u8] {
        &self.body
    }

    /// Time from dispatch until the body was fully read.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Body size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.body.len()
    }

    /// The `Content-Type` header value, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type")
    }

    /// The charset declared in `Content-Type`, lowercased.
    #[must_use]
    pub fn charset(&self) -> Option<String> {
        let mime: mime::Mime = self.content_type()?.parse().ok()?;
        mime.get_param(mime::CHARSET)
            .map(|charset| charset.as_str().to_ascii_lowercase())
    }

    /// Decodes the body as text.
    ///
    /// Latin-1 bodies are mapped byte for byte; every other charset is read
    /// as UTF-8 with invalid sequences replaced.
    #[must_use]
    pub fn body_text(&self) -> String {
        match self.charset().as_deref() {
            Some("iso-8859-1" | "latin1" | "latin-1") => {
                self.body.iter().map(|&b| char::from(b)).collect()
            }
            _ => String::from_utf8_lossy(&self.body).into_owned(),
        }
    }

    /// Returns true if the declared content type carries JSON.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.content_type()
            .is_some_and(|ct| ct.contains("application/json") || ct.contains("+json"))
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

mod body_base64 {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn response(content_type: &str, body: &[u8]) -> RawResponse {
        RawResponse::new(
            200,
            ResponseHeaders::new().with("Content-Type", content_type),
            body.to_vec(),
            Duration::from_millis(12),
        )
    }

    #[test]
    fn test_status_code_categories() {
        assert!(StatusCode::new(100).is_informational());
        assert!(StatusCode::new(200).is_success());
        assert!(StatusCode::new(299).is_success());
        assert!(!StatusCode::new(300).is_success());
        assert!(StatusCode::new(301).is_redirection());
        assert!(StatusCode::new(404).is_client_error());
        assert!(StatusCode::new(500).is_server_error());
        assert!(StatusCode::new(600).is_server_error());
    }

    #[test]
    fn test_status_code_display() {
        assert_eq!(StatusCode::new(200).to_string(), "200 OK");
        assert_eq!(StatusCode::new(404).to_string(), "404 Not Found");
    }

    #[test]
    fn test_charset_from_content_type() {
        let raw = response("text/plain; charset=UTF-8", b"hi");
        assert_eq!(raw.charset().as_deref(), Some("utf-8"));
        assert_eq!(response("application/json", b"{}").charset(), None);
    }

    #[test]
    fn test_body_text_latin1() {
        let raw = response("text/plain; charset=ISO-8859-1", &[0x63, 0x61, 0x66, 0xE9]);
        assert_eq!(raw.body_text(), "café");
    }

    #[test]
    fn test_body_text_lossy_utf8() {
        let raw = response("text/plain", &[0x6F, 0x6B, 0xFF]);
        assert_eq!(raw.body_text(), "ok\u{FFFD}");
    }

    #[test]
    fn test_serde_keeps_body_bytes() {
        let raw = response("application/json", br#"{"id":1}"#);
        let json = serde_json::to_string(&raw).unwrap();
        let back: RawResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back, raw);
        assert!(back.is_json());
    }
}
