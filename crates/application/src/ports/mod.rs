//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod clock;
mod config_source;
mod observer;
mod path_evaluator;
mod schema_validator;
mod transport;

pub use clock::Clock;
pub use config_source::{ConfigSource, StaticSource};
pub use observer::{
    InvocationCompleted, InvocationObserver, InvocationOutcome, InvocationStarted, NoopObserver,
};
pub use path_evaluator::{PathError, PathEvaluator};
pub use schema_validator::SchemaValidator;
pub use transport::{HttpTransport, TransportError, TransportRequest};
