//! Invocation observer port

use std::time::Duration;

use chrono::{DateTime, Utc};
use restprobe_domain::HttpMethod;
use uuid::Uuid;

/// Emitted just before a request is handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationStarted {
    /// Correlates the start and completion events.
    pub id: Uuid,
    /// HTTP method.
    pub method: HttpMethod,
    /// Full request URL.
    pub url: String,
    /// When the request was dispatched.
    pub timestamp: DateTime<Utc>,
}

/// How an invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    /// A response arrived with this status.
    Status(u16),
    /// The transport failed.
    Failed(String),
}

/// Emitted once the transport returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationCompleted {
    /// Same id as the matching [`InvocationStarted`].
    pub id: Uuid,
    /// HTTP method.
    pub method: HttpMethod,
    /// Full request URL.
    pub url: String,
    /// Time spent in the transport.
    pub elapsed: Duration,
    /// Response status or failure message.
    pub outcome: InvocationOutcome,
}

/// Receives request lifecycle events.
pub trait InvocationObserver: Send + Sync {
    /// Called before the request is sent.
    fn on_started(&self, event: &InvocationStarted);

    /// Called after the transport returned, successfully or not.
    fn on_completed(&self, event: &InvocationCompleted);
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl InvocationObserver for NoopObserver {
    fn on_started(&self, _event: &InvocationStarted) {}

    fn on_completed(&self, _event: &InvocationCompleted) {}
}
