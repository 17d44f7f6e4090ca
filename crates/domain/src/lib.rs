//! Restprobe Domain - Core types
//!
//! This crate defines the domain model for the Restprobe API test client:
//! request specifications, raw responses, configuration layers, path
//! expressions and assertion outcomes.
//! All types here are pure Rust with no I/O dependencies.

pub mod config;
pub mod error;
pub mod json_path;
pub mod request;
pub mod response;
pub mod testing;

pub use config::{ConfigLayer, ResolvedConfig, builtin_defaults, keys, parse_bool};
pub use error::{DomainError, DomainResult};
pub use json_path::{PathExpression, PathSegment};
pub use request::{
    ContentType, Header, Headers, HttpMethod, PathParams, QueryParams, QueryValue, RequestBody,
    RequestOptions, RequestSpec,
};
pub use response::{RawResponse, ResponseHeaders, StatusCode};
pub use testing::{
    Assertion, AssertionFailure, AssertionReport, AssertionResult, AssertionSuite, JsonType,
    StatusExpectation,
};
