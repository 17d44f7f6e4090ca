//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `HttpTransport` port using the reqwest library.
//! It handles all network communication for the client.

use std::error::Error as _;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, Method};
use restprobe_application::ports::{HttpTransport, TransportError, TransportRequest};
use restprobe_domain::{HttpMethod, RawResponse, ResponseHeaders};
use tracing::{debug, warn};

use crate::http::build_body;

const MAX_REDIRECTS: usize = 10;

/// HTTP transport backed by `reqwest::Client`.
///
/// One client is shared by every request so connections are pooled.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with default settings.
    ///
    /// Default configuration:
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    /// - User-Agent: `Restprobe/<version>`
    ///
    /// Timeouts are applied per request.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(concat!("Restprobe/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self { client })
    }

    /// Creates a transport with a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Options => Method::OPTIONS,
        }
    }

    /// Maps reqwest errors to transport errors.
    ///
    /// reqwest's own message omits the cause, so the whole source chain
    /// is inspected.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> TransportError {
        let message = error_chain(error);
        if error.is_timeout() {
            return TransportError::Timeout {
                timeout_ms,
                message,
            };
        }

        let host = || {
            error
                .url()
                .and_then(|u| u.host_str())
                .unwrap_or("unknown")
                .to_string()
        };

        if error.is_builder() {
            return TransportError::InvalidRequest(message);
        }

        if error.is_connect() {
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") || lower.contains("lookup") {
                return TransportError::Dns {
                    host: host(),
                    message,
                };
            }
            if lower.contains("refused") {
                return TransportError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(reqwest::Url::port_or_known_default)
                        .unwrap_or(80),
                    message,
                };
            }
            return TransportError::Connection(message);
        }

        if error.is_redirect() {
            return TransportError::Other(format!(
                "too many redirects (max {MAX_REDIRECTS}): {message}"
            ));
        }

        TransportError::Other(message)
    }
}

fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<RawResponse, TransportError> {
        let timeout_ms = u64::try_from(request.timeout.as_millis()).unwrap_or(u64::MAX);

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), request.url.clone())
            .timeout(request.timeout);

        for header in request.headers.iter() {
            builder = builder.header(header.name.as_str(), header.value.as_str());
        }

        if let Some(body) = &request.body {
            let encoded = build_body(body, &request.content_type)
                .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
            builder = builder.body(encoded);
        }

        let start = Instant::now();
        let response = builder.send().await.map_err(|e| {
            let mapped = Self::map_error(&e, timeout_ms);
            warn!(url = %request.url, error = %mapped, "Transport failure");
            mapped
        })?;

        let status = response.status().as_u16();
        let headers: ResponseHeaders = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?
            .to_vec();
        let elapsed = start.elapsed();

        debug!(status, bytes = body.len(), "Response received");
        Ok(RawResponse::new(status, headers, body, elapsed))
    }
}
