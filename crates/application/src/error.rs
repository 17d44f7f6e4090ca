//! Application error types

use restprobe_domain::{AssertionFailure, DomainError};
use thiserror::Error;

use crate::ports::{PathError, TransportError};

/// A required configuration layer could not be constructed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to load required configuration layer '{layer}': {reason}")]
pub struct ConfigLoadFailure {
    /// Name of the layer.
    pub layer: String,
    /// What went wrong.
    pub reason: String,
}

/// Errors from extracting values out of a response body.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The body is not valid JSON.
    #[error("response body is not valid JSON: {0}")]
    MalformedBody(String),

    /// The path is valid but addresses nothing.
    #[error("no value at path '{0}'")]
    MissingPath(String),

    /// The path expression cannot be parsed.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The expression.
        path: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The value exists but cannot be converted to the requested type.
    #[error("cannot convert value at '{path}': {message}")]
    Deserialize {
        /// Where the value was read from.
        path: String,
        /// Conversion error.
        message: String,
    },
}

impl From<PathError> for ValidationError {
    fn from(error: PathError) -> Self {
        match error {
            PathError::Malformed(message) => Self::MalformedBody(message),
            PathError::Missing(path) => Self::MissingPath(path),
            PathError::Invalid { path, reason } => Self::InvalidPath { path, reason },
        }
    }
}

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigLoadFailure),

    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A value could not be extracted from the response.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An assertion failed.
    #[error("assertion failed: {0}")]
    Assertion(#[from] AssertionFailure),

    /// No base URL is configured for a relative endpoint.
    #[error("no base URL configured (set '{0}')")]
    MissingBaseUrl(&'static str),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
