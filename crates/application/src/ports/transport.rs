//! HTTP transport port
//!
//! The transport sends one fully-resolved request and returns the raw
//! response. Everything above it (header precedence, timeouts, events)
//! is handled by the invoker.

use std::time::Duration;

use async_trait::async_trait;
use restprobe_domain::{ContentType, Headers, HttpMethod, RawResponse, RequestBody};
use thiserror::Error;
use url::Url;

/// A request ready to go on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute URL including the query string.
    pub url: Url,
    /// Final header set.
    pub headers: Headers,
    /// Body, if any.
    pub body: Option<RequestBody>,
    /// How to encode the body.
    pub content_type: ContentType,
    /// Per-call timeout.
    pub timeout: Duration,
}

/// Failures that happen before a response is received.
///
/// An HTTP error status is not a transport error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The server actively refused the connection.
    #[error("connection refused by {host}:{port}: {message}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
        /// Underlying cause.
        message: String,
    },

    /// The host name could not be resolved.
    #[error("DNS lookup failed for {host}: {message}")]
    Dns {
        /// Host that failed to resolve.
        host: String,
        /// Underlying cause.
        message: String,
    },

    /// No response arrived within the timeout.
    #[error("request timed out after {timeout_ms} ms: {message}")]
    Timeout {
        /// The timeout that elapsed.
        timeout_ms: u64,
        /// Underlying cause.
        message: String,
    },

    /// The connection failed or was reset.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The request could not be built (bad URL, header or body).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Any other failure.
    #[error("transport error: {0}")]
    Other(String),
}

/// Port for sending HTTP requests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends the request and reads the whole response body.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if no response could be obtained.
    async fn send(&self, request: TransportRequest) -> Result<RawResponse, TransportError>;
}
