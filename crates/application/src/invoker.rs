//! HTTP invocation
//!
//! Turns a [`RequestSpec`] into a [`TransportRequest`], sends it and reports
//! the lifecycle to an [`InvocationObserver`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use restprobe_domain::{Headers, RawResponse, RequestSpec};
use tracing::{Span, debug, instrument};
use uuid::Uuid;

use crate::ports::{
    Clock, HttpTransport, InvocationCompleted, InvocationObserver, InvocationOutcome,
    InvocationStarted, NoopObserver, TransportError, TransportRequest,
};

/// Executes request specifications against a transport.
///
/// # Example
///
/// ```ignore
/// let invoker = HttpInvoker::new(Arc::new(ReqwestTransport::new()?), Arc::new(SystemClock));
/// let spec = RequestSpec::get("/posts/1")?;
/// let response = invoker
///     .invoke(&spec, "https://jsonplaceholder.typicode.com", &Headers::new(), Duration::from_secs(30))
///     .await?;
/// ```
pub struct HttpInvoker {
    transport: Arc<dyn HttpTransport>,
    observer: Arc<dyn InvocationObserver>,
    clock: Arc<dyn Clock>,
}

impl HttpInvoker {
    /// Creates an invoker with a no-op observer.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, clock: Arc<dyn Clock>) -> Self {
        Self {
            transport,
            observer: Arc::new(NoopObserver),
            clock,
        }
    }

    /// Replaces the observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn InvocationObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Sends a request.
    ///
    /// `default_headers` are applied first and the request's own headers
    /// override them by name. `timeout` is passed to the transport as is.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidRequest`] if the URL cannot be built
    /// and any error reported by the transport. An HTTP error status is a
    /// successful invocation.
    #[instrument(
        name = "http_invoke",
        skip(self, spec, default_headers),
        fields(
            http.method = %spec.method(),
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
        )
    )]
    pub async fn invoke(
        &self,
        spec: &RequestSpec,
        base_url: &str,
        default_headers: &Headers,
        timeout: Duration,
    ) -> Result<RawResponse, TransportError> {
        let url = spec
            .url(base_url)
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        Span::current().record("http.url", url.as_str());

        let request = TransportRequest {
            method: spec.method(),
            url: url.clone(),
            headers: spec.effective_headers(default_headers),
            body: spec.body().cloned(),
            content_type: spec.content_type(),
            timeout,
        };
        debug!(
            headers = request.headers.len(),
            has_body = request.body.is_some(),
            timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            "Dispatching request"
        );

        let id = Uuid::now_v7();
        self.observer.on_started(&InvocationStarted {
            id,
            method: spec.method(),
            url: url.to_string(),
            timestamp: self.clock.now(),
        });

        let start = Instant::now();
        let result = self.transport.send(request).await;
        let elapsed = start.elapsed();

        let outcome = match &result {
            Ok(response) => {
                Span::current().record("http.status_code", response.status().as_u16());
                InvocationOutcome::Status(response.status().as_u16())
            }
            Err(e) => InvocationOutcome::Failed(e.to_string()),
        };
        self.observer.on_completed(&InvocationCompleted {
            id,
            method: spec.method(),
            url: url.to_string(),
            elapsed,
            outcome,
        });

        result
    }
}

impl std::fmt::Debug for HttpInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpInvoker").finish_non_exhaustive()
    }
}
