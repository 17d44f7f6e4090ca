//! Process environment variables as a configuration layer.

use std::env;

use restprobe_application::ports::ConfigSource;
use restprobe_domain::ConfigLayer;
use tracing::debug;

/// Prefix selecting the variables that belong to the client.
pub const DEFAULT_ENV_PREFIX: &str = "RESTPROBE_";

/// Reads prefixed environment variables.
///
/// The prefix is stripped and the rest is lowercased with `_` mapped to
/// `.`, so `RESTPROBE_BASE_URL` becomes `base.url`. A doubled `__` stands
/// for a literal underscore: `RESTPROBE_CLIENT__ID` becomes `client_id`.
#[derive(Debug, Clone)]
pub struct ProcessEnvSource {
    prefix: String,
    vars: Option<Vec<(String, String)>>,
}

impl ProcessEnvSource {
    /// Reads the process environment with the default prefix.
    #[must_use]
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_ENV_PREFIX)
    }

    /// Reads the process environment with a custom prefix.
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            vars: None,
        }
    }

    /// Reads a fixed set of variables instead of the process environment.
    #[must_use]
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            prefix: DEFAULT_ENV_PREFIX.to_string(),
            vars: Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }

    fn key_for(&self, variable: &str) -> Option<String> {
        let rest = variable.strip_prefix(&self.prefix)?;
        if rest.is_empty() {
            return None;
        }
        let key = rest
            .split("__")
            .map(|part| part.to_lowercase().replace('_', "."))
            .collect::<Vec<_>>()
            .join("_");
        Some(key)
    }
}

impl Default for ProcessEnvSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSource for ProcessEnvSource {
    fn name(&self) -> String {
        format!("environment variables ({}*)", self.prefix)
    }

    fn load(&self, _environment: &str) -> Option<ConfigLayer> {
        let vars: Vec<(String, String)> = match &self.vars {
            Some(vars) => vars.clone(),
            None => env::vars().collect(),
        };

        let mut layer = ConfigLayer::new(self.name());
        for (variable, value) in vars {
            if let Some(key) = self.key_for(&variable) {
                layer.insert(key, value);
            }
        }
        debug!(prefix = %self.prefix, keys = layer.len(), "Loaded environment variables");
        Some(layer)
    }
}
