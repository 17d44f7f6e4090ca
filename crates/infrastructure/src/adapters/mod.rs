//! Port implementations.

mod json_path_evaluator;
mod reqwest_transport;
mod system_clock;
mod tracing_observer;

pub use json_path_evaluator::JsonPathEvaluator;
pub use reqwest_transport::ReqwestTransport;
pub use system_clock::SystemClock;
pub use tracing_observer::TracingObserver;
