//! Clock port

use chrono::{DateTime, Utc};

/// Source of wall-clock timestamps for invocation events.
///
/// Tests substitute a fixed clock to get deterministic event timestamps.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;
}
