//! Restprobe Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod config;
pub mod http;

pub use adapters::{JsonPathEvaluator, ReqwestTransport, SystemClock, TracingObserver};
pub use config::{
    DEFAULT_CONFIG_DIR, DEFAULT_ENV_PREFIX, FileLocation, ProcessEnvSource, PropertiesFileSource,
    SourceError, YamlFileSource,
};
pub use http::{BodyBuildError, build_body};
