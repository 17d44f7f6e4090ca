//! Restprobe Application - Ports and services
//!
//! This crate defines the application layer with:
//! - Port traits for transport, configuration sources, path evaluation and observation
//! - Layered configuration resolution
//! - The API client facade and response validation
//! - Declarative assertion execution

pub mod client;
pub mod config;
pub mod error;
pub mod invoker;
pub mod ports;
pub mod runner;
pub mod validator;

pub use client::ApiClient;
pub use config::ConfigResolver;
pub use error::{ApplicationError, ApplicationResult, ConfigLoadFailure, ValidationError};
pub use invoker::HttpInvoker;
pub use ports::{
    Clock, ConfigSource, HttpTransport, InvocationObserver, PathError, PathEvaluator,
    SchemaValidator, StaticSource, TransportError, TransportRequest,
};
pub use runner::AssertionRunner;
pub use validator::{AssertionOutcome, ResponseValidator};
