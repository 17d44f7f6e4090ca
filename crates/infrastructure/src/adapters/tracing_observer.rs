//! Invocation observer that writes request lifecycle events to `tracing`.

use restprobe_application::ports::{
    InvocationCompleted, InvocationObserver, InvocationOutcome, InvocationStarted,
};
use tracing::{debug, info, warn};

/// Logs every request start and completion.
///
/// Starts are logged at `debug`, responses at `info` and transport
/// failures at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl InvocationObserver for TracingObserver {
    fn on_started(&self, event: &InvocationStarted) {
        debug!(
            request_id = %event.id,
            method = %event.method,
            url = %event.url,
            timestamp = %event.timestamp.to_rfc3339(),
            "Sending request"
        );
    }

    fn on_completed(&self, event: &InvocationCompleted) {
        let elapsed_ms = u64::try_from(event.elapsed.as_millis()).unwrap_or(u64::MAX);
        match &event.outcome {
            InvocationOutcome::Status(status) => info!(
                request_id = %event.id,
                method = %event.method,
                url = %event.url,
                status,
                elapsed_ms,
                "Received response"
            ),
            InvocationOutcome::Failed(reason) => warn!(
                request_id = %event.id,
                method = %event.method,
                url = %event.url,
                elapsed_ms,
                reason = %reason,
                "Request failed"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use restprobe_domain::HttpMethod;
    use std::time::Duration;
    use tracing_test::traced_test;
    use uuid::Uuid;

    fn completed(outcome: InvocationOutcome) -> InvocationCompleted {
        InvocationCompleted {
            id: Uuid::nil(),
            method: HttpMethod::Get,
            url: "http://localhost/posts/1".to_string(),
            elapsed: Duration::from_millis(12),
            outcome,
        }
    }

    #[test]
    #[traced_test]
    fn test_logs_started() {
        TracingObserver.on_started(&InvocationStarted {
            id: Uuid::nil(),
            method: HttpMethod::Post,
            url: "http://localhost/posts".to_string(),
            timestamp: Utc::now(),
        });
        assert!(logs_contain("Sending request"));
        assert!(logs_contain("http://localhost/posts"));
    }

    #[test]
    #[traced_test]
    fn test_logs_response() {
        TracingObserver.on_completed(&completed(InvocationOutcome::Status(200)));
        assert!(logs_contain("Received response"));
        assert!(logs_contain("status=200"));
    }

    #[test]
    #[traced_test]
    fn test_logs_failure() {
        TracingObserver.on_completed(&completed(InvocationOutcome::Failed(
            "connection refused by localhost:1".to_string(),
        )));
        assert!(logs_contain("Request failed"));
        assert!(logs_contain("connection refused"));
    }
}
