//! Schema validator port

use serde_json::Value;

/// Validates a JSON document against a schema.
///
/// No engine ships with this crate; callers plug in their own.
pub trait SchemaValidator: Send + Sync {
    /// Checks `document` against `schema`.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violation.
    fn validate(&self, document: &Value, schema: &Value) -> Result<(), String>;
}
