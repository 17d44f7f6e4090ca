//! Configuration layers
//!
//! A [`ConfigLayer`] is one named set of key/value pairs. Layers are merged
//! in order into a [`ResolvedConfig`], later layers overriding earlier ones.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Well-known configuration keys.
pub mod keys {
    /// Selects the environment-specific layer.
    pub const ENV: &str = "env";
    /// Base URL of the service under test.
    pub const BASE_URL: &str = "base.url";
    /// API key credential.
    pub const API_KEY: &str = "api.key";
    /// Per-request timeout in milliseconds.
    pub const TIMEOUT: &str = "timeout";
    /// Whether logging is installed.
    pub const LOGGING_ENABLED: &str = "logging.enabled";
    /// Whether the mock server is requested.
    pub const MOCKING_ENABLED: &str = "mocking.enabled";
}

/// Environment used when nothing selects one.
pub const DEFAULT_ENVIRONMENT: &str = "qa";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_MS: i64 = 30_000;

/// A named mapping of configuration keys to string values.
///
/// # Example
///
/// ```
/// use restprobe_domain::ConfigLayer;
///
/// let layer = ConfigLayer::new("config.properties")
///     .with("base.url", "http://localhost:8080");
///
/// assert_eq!(layer.name(), "config.properties");
/// assert_eq!(layer.get("base.url"), Some("http://localhost:8080"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigLayer {
    name: String,
    properties: BTreeMap<String, String>,
}

impl ConfigLayer {
    /// Creates an empty layer.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Creates a layer from key/value pairs.
    #[must_use]
    pub fn from_pairs<K, V>(name: impl Into<String>, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            properties: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Sets a property.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Sets a property (builder pattern).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Returns the name of this layer.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets a property value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Returns the properties of this layer.
    #[must_use]
    pub const fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// Returns the number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns true if there are no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// The built-in lowest-precedence layer.
#[must_use]
pub fn builtin_defaults() -> ConfigLayer {
    ConfigLayer::new("defaults")
        .with(keys::ENV, DEFAULT_ENVIRONMENT)
        .with(keys::TIMEOUT, DEFAULT_TIMEOUT_MS.to_string())
        .with(keys::LOGGING_ENABLED, "true")
        .with(keys::MOCKING_ENABLED, "false")
}

/// The flattened result of merging layers in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedConfig {
    values: BTreeMap<String, String>,
    layers: Vec<String>,
}

impl ResolvedConfig {
    /// Merges layers, lowest precedence first.
    #[must_use]
    pub fn from_layers<'a>(layers: impl IntoIterator<Item = &'a ConfigLayer>) -> Self {
        let mut resolved = Self::default();
        for layer in layers {
            resolved.merge(layer);
        }
        resolved
    }

    /// Applies a layer on top of the current values.
    pub fn merge(&mut self, layer: &ConfigLayer) {
        for (key, value) in layer.properties() {
            self.values.insert(key.clone(), value.clone());
        }
        self.layers.push(layer.name().to_string());
    }

    /// Gets a merged value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Names of merged layers in merge order.
    #[must_use]
    pub fn layer_names(&self) -> &[String] {
        &self.layers
    }

    /// All merged values.
    #[must_use]
    pub const fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }
}

/// Parses a configuration boolean.
///
/// Accepts `true`/`false`, `yes`/`no` and `1`/`0`, ignoring case and
/// surrounding whitespace.
#[must_use]
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_later_layers_override() {
        let base = ConfigLayer::new("config.properties")
            .with("base.url", "http://a")
            .with("api.key", "k1");
        let env = ConfigLayer::new("config-qa.properties").with("base.url", "http://b");

        let resolved = ResolvedConfig::from_layers([&base, &env]);

        assert_eq!(resolved.get("base.url"), Some("http://b"));
        assert_eq!(resolved.get("api.key"), Some("k1"));
        assert_eq!(
            resolved.layer_names(),
            &["config.properties".to_string(), "config-qa.properties".to_string()]
        );
    }

    #[test]
    fn test_builtin_defaults() {
        let defaults = builtin_defaults();
        assert_eq!(defaults.get(keys::ENV), Some("qa"));
        assert_eq!(defaults.get(keys::TIMEOUT), Some("30000"));
        assert_eq!(defaults.get(keys::LOGGING_ENABLED), Some("true"));
        assert_eq!(defaults.get(keys::MOCKING_ENABLED), Some("false"));
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" no "), Some(false));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_from_pairs() {
        let layer = ConfigLayer::from_pairs("env", [("a", "1"), ("b", "2")]);
        assert_eq!(layer.len(), 2);
        assert!(!layer.is_empty());
    }
}
