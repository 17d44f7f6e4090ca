//! Path evaluator port

use serde_json::Value;
use thiserror::Error;

/// Errors from parsing a body or evaluating a path against it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathError {
    /// The body is not valid JSON.
    #[error("body is not valid JSON: {0}")]
    Malformed(String),

    /// The path is well-formed but addresses nothing.
    #[error("no value at path '{0}'")]
    Missing(String),

    /// The path expression cannot be parsed.
    #[error("invalid path '{path}': {reason}")]
    Invalid {
        /// The expression.
        path: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Parses response bodies and evaluates path expressions against them.
pub trait PathEvaluator: Send + Sync {
    /// Parses a body into a document.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Malformed`] if the body cannot be parsed.
    fn parse(&self, body: &str) -> Result<Value, PathError>;

    /// Evaluates a path against a parsed document.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Invalid`] for a bad expression and
    /// [`PathError::Missing`] when nothing matches.
    fn evaluate(&self, document: &Value, path: &str) -> Result<Value, PathError>;
}
