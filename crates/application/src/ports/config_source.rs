//! Configuration source port
//!
//! Defines the interface for loading one configuration layer.

use restprobe_domain::ConfigLayer;

/// A source of one configuration layer.
///
/// Sources never fail loudly: a missing or unparsable source returns
/// `None` and logs why, and resolution continues without it.
pub trait ConfigSource: Send + Sync {
    /// Name used in diagnostics and [`ConfigLayer::name`].
    fn name(&self) -> String;

    /// Whether this layer depends on the selected environment.
    ///
    /// Environment-specific sources are loaded after the environment name
    /// has been determined from the other layers.
    fn is_environment_specific(&self) -> bool {
        false
    }

    /// Loads the layer for the given environment.
    fn load(&self, environment: &str) -> Option<ConfigLayer>;
}

/// An in-memory layer.
///
/// Used for built-in defaults and for tests.
#[derive(Debug, Clone)]
pub struct StaticSource {
    layer: ConfigLayer,
    environment: Option<String>,
}

impl StaticSource {
    /// A layer that is always loaded.
    #[must_use]
    pub const fn new(layer: ConfigLayer) -> Self {
        Self {
            layer,
            environment: None,
        }
    }

    /// A layer that is loaded only when `environment` is selected.
    #[must_use]
    pub fn for_environment(environment: impl Into<String>, layer: ConfigLayer) -> Self {
        Self {
            layer,
            environment: Some(environment.into()),
        }
    }
}

impl ConfigSource for StaticSource {
    fn name(&self) -> String {
        self.layer.name().to_string()
    }

    fn is_environment_specific(&self) -> bool {
        self.environment.is_some()
    }

    fn load(&self, environment: &str) -> Option<ConfigLayer> {
        match &self.environment {
            Some(wanted) if wanted != environment => None,
            _ => Some(self.layer.clone()),
        }
    }
}
