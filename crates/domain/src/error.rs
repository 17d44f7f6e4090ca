//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur while assembling a request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The endpoint template references a placeholder with no matching path parameter.
    #[error("missing path parameter '{name}' for endpoint '{template}'")]
    MissingPathParameter {
        /// Placeholder name found in the template.
        name: String,
        /// The endpoint template being expanded.
        template: String,
    },

    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A header name is invalid.
    #[error("invalid header name: {0}")]
    InvalidHeaderName(String),

    /// A header value is invalid.
    #[error("invalid header value: {0}")]
    InvalidHeaderValue(String),

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The request body could not be serialized.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// A path expression could not be parsed.
    #[error("invalid path expression '{expression}': {reason}")]
    InvalidPathExpression {
        /// The offending expression.
        expression: String,
        /// Why parsing failed.
        reason: String,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
