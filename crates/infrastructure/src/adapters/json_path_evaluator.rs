//! JSON path evaluator adapter

use std::collections::HashMap;

use parking_lot::RwLock;
use restprobe_application::ports::{PathError, PathEvaluator};
use restprobe_domain::{DomainError, PathExpression};
use serde_json::Value;
use tracing::debug;

/// Default number of parsed expressions kept in the cache.
const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Evaluates `$.a.b[0]` style expressions against JSON bodies.
///
/// Parsed expressions are cached. The cache holds at most `capacity`
/// entries and is emptied when a new expression would exceed it.
#[derive(Debug)]
pub struct JsonPathEvaluator {
    compiled: RwLock<HashMap<String, PathExpression>>,
    capacity: usize,
}

impl JsonPathEvaluator {
    /// Creates an evaluator with the default cache capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_cache_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Creates an evaluator caching at most `capacity` expressions.
    ///
    /// A capacity of zero disables caching.
    #[must_use]
    pub fn with_cache_capacity(capacity: usize) -> Self {
        Self {
            compiled: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    fn compile(&self, path: &str) -> Result<PathExpression, PathError> {
        if let Some(expression) = self.compiled.read().get(path) {
            return Ok(expression.clone());
        }

        let expression = PathExpression::parse(path).map_err(|e| PathError::Invalid {
            path: path.to_string(),
            reason: match e {
                DomainError::InvalidPathExpression { reason, .. } => reason,
                other => other.to_string(),
            },
        })?;
        if self.capacity > 0 {
            let mut compiled = self.compiled.write();
            if compiled.len() >= self.capacity {
                debug!(capacity = self.capacity, "Path expression cache full, clearing");
                compiled.clear();
            }
            compiled.insert(path.to_string(), expression.clone());
        }
        Ok(expression)
    }
}

impl Default for JsonPathEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl PathEvaluator for JsonPathEvaluator {
    fn parse(&self, body: &str) -> Result<Value, PathError> {
        if body.trim().is_empty() {
            return Err(PathError::Malformed("empty body".to_string()));
        }
        serde_json::from_str(body).map_err(|e| PathError::Malformed(e.to_string()))
    }

    fn evaluate(&self, document: &Value, path: &str) -> Result<Value, PathError> {
        self.compile(path)?
            .evaluate(document)
            .ok_or_else(|| PathError::Missing(path.to_string()))
    }
}
