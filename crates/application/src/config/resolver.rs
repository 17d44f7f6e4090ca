//! Layered configuration resolver
//!
//! Merges configuration layers with a fixed precedence (lowest first):
//!
//! 1. Built-in defaults
//! 2. Registered sources, in registration order
//! 3. In-memory overrides set through [`ConfigResolver::set_override`]
//!
//! Environment-independent sources are loaded first so the `env` key can
//! select which environment-specific sources apply. Layers are loaded once,
//! on first access or on [`ConfigResolver::initialize`].

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use restprobe_domain::config::{DEFAULT_ENVIRONMENT, DEFAULT_TIMEOUT_MS, keys};
use restprobe_domain::{ConfigLayer, ResolvedConfig, builtin_defaults, parse_bool};
use tracing::{debug, error, info, warn};

use crate::error::ConfigLoadFailure;
use crate::ports::{ConfigSource, StaticSource};

/// Resolves configuration values from layered sources.
///
/// Share one resolver through `Arc`; reads and overrides are thread-safe.
pub struct ConfigResolver {
    defaults: Arc<dyn ConfigSource>,
    sources: Vec<Arc<dyn ConfigSource>>,
    resolved: OnceCell<ResolvedConfig>,
    overrides: RwLock<HashMap<String, String>>,
}

impl ConfigResolver {
    /// Creates a resolver over the built-in defaults and `sources`.
    ///
    /// Sources are given lowest precedence first and merged in that order,
    /// whether or not they are environment-specific.
    #[must_use]
    pub fn new(sources: Vec<Arc<dyn ConfigSource>>) -> Self {
        Self::with_defaults(Arc::new(StaticSource::new(builtin_defaults())), sources)
    }

    /// Creates a resolver with a custom required defaults source.
    #[must_use]
    pub fn with_defaults(
        defaults: Arc<dyn ConfigSource>,
        sources: Vec<Arc<dyn ConfigSource>>,
    ) -> Self {
        Self {
            defaults,
            sources,
            resolved: OnceCell::new(),
            overrides: RwLock::new(HashMap::new()),
        }
    }

    /// Loads and merges every layer. Later calls return the cached result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigLoadFailure`] if the defaults layer cannot be loaded.
    /// Other sources that fail are skipped.
    pub fn initialize(&self) -> Result<&ResolvedConfig, ConfigLoadFailure> {
        self.resolved.get_or_try_init(|| self.load_layers())
    }

    fn load_layers(&self) -> Result<ResolvedConfig, ConfigLoadFailure> {
        let bootstrap = self.override_value(keys::ENV);
        let defaults = self
            .defaults
            .load(bootstrap.as_deref().unwrap_or(DEFAULT_ENVIRONMENT))
            .ok_or_else(|| ConfigLoadFailure {
                layer: self.defaults.name(),
                reason: "defaults layer could not be built".to_string(),
            })?;

        // First pass: everything that does not depend on the environment.
        let mut general: Vec<(usize, ConfigLayer)> = Vec::new();
        for (index, source) in self.sources.iter().enumerate() {
            if source.is_environment_specific() {
                continue;
            }
            if let Some(layer) = Self::load_source(source.as_ref(), DEFAULT_ENVIRONMENT) {
                general.push((index, layer));
            }
        }

        let environment = bootstrap.unwrap_or_else(|| {
            let merged = ResolvedConfig::from_layers(
                std::iter::once(&defaults).chain(general.iter().map(|(_, layer)| layer)),
            );
            merged
                .get(keys::ENV)
                .map_or_else(|| DEFAULT_ENVIRONMENT.to_string(), str::to_string)
        });
        info!(environment = %environment, "Loading configuration");

        // Second pass: layers selected by the environment name.
        let mut specific: Vec<(usize, ConfigLayer)> = Vec::new();
        for (index, source) in self.sources.iter().enumerate() {
            if !source.is_environment_specific() {
                continue;
            }
            if let Some(layer) = Self::load_source(source.as_ref(), &environment) {
                specific.push((index, layer));
            }
        }

        let mut loaded: Vec<(usize, ConfigLayer)> = general.into_iter().chain(specific).collect();
        loaded.sort_by_key(|(index, _)| *index);

        let mut resolved = ResolvedConfig::default();
        resolved.merge(&defaults);
        for (_, layer) in &loaded {
            resolved.merge(layer);
        }

        debug!(layers = ?resolved.layer_names(), "Configuration resolved");
        Ok(resolved)
    }

    fn load_source(source: &dyn ConfigSource, environment: &str) -> Option<ConfigLayer> {
        let layer = source.load(environment);
        if layer.is_none() {
            warn!(source = %source.name(), environment, "Configuration source unavailable, skipping");
        }
        layer
    }

    fn override_value(&self, key: &str) -> Option<String> {
        self.overrides.read().get(key).cloned()
    }

    /// Resolves a key. Overrides always win.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<String> {
        if let Some(value) = self.override_value(key) {
            return Some(value);
        }
        match self.initialize() {
            Ok(resolved) => resolved.get(key).map(str::to_string),
            Err(e) => {
                error!(error = %e, key, "Configuration unavailable");
                None
            }
        }
    }

    /// Resolves a key as an integer, falling back to `default` when the key
    /// is missing or not a number.
    #[must_use]
    pub fn resolve_int(&self, key: &str, default: i64) -> i64 {
        let Some(raw) = self.resolve(key) else {
            return default;
        };
        raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, default, "Invalid integer in configuration, using default");
            default
        })
    }

    /// Resolves a key as a boolean, falling back to `default` when the key
    /// is missing or not a boolean.
    #[must_use]
    pub fn resolve_bool(&self, key: &str, default: bool) -> bool {
        let Some(raw) = self.resolve(key) else {
            return default;
        };
        parse_bool(&raw).unwrap_or_else(|| {
            warn!(key, value = %raw, default, "Invalid boolean in configuration, using default");
            default
        })
    }

    /// Sets an in-memory override. Takes effect on the next read.
    pub fn set_override(&self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        debug!(key = %key, "Configuration override set");
        self.overrides.write().insert(key, value);
    }

    /// Removes an in-memory override.
    pub fn clear_override(&self, key: &str) -> Option<String> {
        self.overrides.write().remove(key)
    }

    /// The selected environment name.
    ///
    /// An `env` override set after initialisation changes this value but
    /// does not reload environment-specific layers.
    #[must_use]
    pub fn environment(&self) -> String {
        self.resolve(keys::ENV)
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
    }

    /// The base URL of the service under test.
    #[must_use]
    pub fn base_url(&self) -> Option<String> {
        self.resolve(keys::BASE_URL)
    }

    /// Overrides the base URL.
    pub fn set_base_url(&self, url: impl Into<String>) {
        self.set_override(keys::BASE_URL, url);
    }

    /// The configured API key.
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        self.resolve(keys::API_KEY)
    }

    /// Per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        let millis = self.resolve_int(keys::TIMEOUT, DEFAULT_TIMEOUT_MS);
        let millis = u64::try_from(millis).unwrap_or_else(|_| {
            warn!(millis, "Negative timeout in configuration, using default");
            DEFAULT_TIMEOUT_MS.unsigned_abs()
        });
        Duration::from_millis(millis)
    }

    /// Whether logging should be installed.
    #[must_use]
    pub fn logging_enabled(&self) -> bool {
        self.resolve_bool(keys::LOGGING_ENABLED, true)
    }

    /// Whether a mock server was requested.
    #[must_use]
    pub fn mocking_enabled(&self) -> bool {
        self.resolve_bool(keys::MOCKING_ENABLED, false)
    }

    /// The effective configuration: merged layers plus overrides.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        let mut values = self
            .initialize()
            .map(|resolved| resolved.values().clone())
            .unwrap_or_default();
        for (key, value) in self.overrides.read().iter() {
            values.insert(key.clone(), value.clone());
        }
        values
    }

    /// Names of the layers that were loaded, lowest precedence first.
    #[must_use]
    pub fn layer_names(&self) -> Vec<String> {
        self.initialize()
            .map(|resolved| resolved.layer_names().to_vec())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for ConfigResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigResolver")
            .field("defaults", &self.defaults.name())
            .field(
                "sources",
                &self.sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("initialized", &self.resolved.get().is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct FailingSource;

    impl ConfigSource for FailingSource {
        fn name(&self) -> String {
            "broken".to_string()
        }

        fn load(&self, _environment: &str) -> Option<ConfigLayer> {
            None
        }
    }

    fn general(layer: ConfigLayer) -> Arc<dyn ConfigSource> {
        Arc::new(StaticSource::new(layer))
    }

    fn for_env(env: &str, layer: ConfigLayer) -> Arc<dyn ConfigSource> {
        Arc::new(StaticSource::for_environment(env, layer))
    }

    fn standard_resolver() -> ConfigResolver {
        ConfigResolver::new(vec![
            general(
                ConfigLayer::new("config.properties")
                    .with("base.url", "http://a")
                    .with("api.key", "base-key"),
            ),
            for_env("qa", ConfigLayer::new("config-qa.properties").with("base.url", "http://b")),
            for_env("prod", ConfigLayer::new("config-prod.properties").with("base.url", "http://p")),
        ])
    }

    #[test]
    fn test_environment_layer_overrides_base() {
        let resolver = standard_resolver();
        assert_eq!(resolver.base_url().as_deref(), Some("http://b"));
        assert_eq!(resolver.api_key().as_deref(), Some("base-key"));
        assert_eq!(resolver.environment(), "qa");
    }

    #[test]
    fn test_sources_load_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct CountingSource {
            loads: AtomicUsize,
        }

        impl ConfigSource for CountingSource {
            fn name(&self) -> String {
                "counting".to_string()
            }

            fn load(&self, _environment: &str) -> Option<ConfigLayer> {
                self.loads.fetch_add(1, Ordering::SeqCst);
                Some(ConfigLayer::new("counting").with("base.url", "http://a"))
            }
        }

        let source = Arc::new(CountingSource {
            loads: AtomicUsize::new(0),
        });
        let shared: Arc<dyn ConfigSource> = source.clone();
        let resolver = ConfigResolver::new(vec![shared]);

        for _ in 0..3 {
            assert_eq!(resolver.base_url().as_deref(), Some("http://a"));
            assert_eq!(resolver.resolve("missing.key"), None);
        }
        resolver.initialize().unwrap();
        assert_eq!(resolver.timeout(), Duration::from_millis(30_000));
        assert_eq!(source.loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_override_wins_after_initialisation() {
        let resolver = standard_resolver();
        resolver.initialize().unwrap();
        resolver.set_override("base.url", "http://c");
        assert_eq!(resolver.resolve("base.url").as_deref(), Some("http://c"));
    }

    #[test]
    fn test_override_for_unknown_key() {
        let resolver = ConfigResolver::new(Vec::new());
        resolver.set_override("custom.key", "v");
        assert_eq!(resolver.resolve("custom.key").as_deref(), Some("v"));
        assert_eq!(resolver.clear_override("custom.key").as_deref(), Some("v"));
        assert_eq!(resolver.resolve("custom.key"), None);
    }

    #[test]
    fn test_env_override_selects_layer_before_init() {
        let resolver = standard_resolver();
        resolver.set_override("env", "prod");
        assert_eq!(resolver.base_url().as_deref(), Some("http://p"));
        assert_eq!(resolver.environment(), "prod");
    }

    #[test]
    fn test_env_from_general_layer() {
        let resolver = ConfigResolver::new(vec![
            general(ConfigLayer::new("process").with("env", "prod")),
            for_env("prod", ConfigLayer::new("config-prod.properties").with("base.url", "http://p")),
        ]);
        assert_eq!(resolver.base_url().as_deref(), Some("http://p"));
    }

    #[test]
    fn test_later_general_source_outranks_environment_layer() {
        let resolver = ConfigResolver::new(vec![
            general(ConfigLayer::new("config.properties").with("base.url", "http://a")),
            for_env("qa", ConfigLayer::new("config-qa.properties").with("base.url", "http://b")),
            general(ConfigLayer::new("process").with("base.url", "http://env")),
        ]);
        assert_eq!(resolver.base_url().as_deref(), Some("http://env"));
        assert_eq!(
            resolver.layer_names(),
            vec![
                "defaults".to_string(),
                "config.properties".to_string(),
                "config-qa.properties".to_string(),
                "process".to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_source_is_skipped() {
        let resolver = ConfigResolver::new(vec![
            Arc::new(FailingSource),
            general(ConfigLayer::new("config.properties").with("base.url", "http://a")),
        ]);
        assert_eq!(resolver.base_url().as_deref(), Some("http://a"));
        assert!(!resolver.layer_names().contains(&"broken".to_string()));
    }

    #[test]
    fn test_failing_defaults_is_fatal() {
        let resolver = ConfigResolver::with_defaults(Arc::new(FailingSource), Vec::new());
        let err = resolver.initialize().unwrap_err();
        assert_eq!(err.layer, "broken");
        assert_eq!(resolver.resolve("timeout"), None);

        resolver.set_override("timeout", "10");
        assert_eq!(resolver.resolve("timeout").as_deref(), Some("10"));
    }

    #[test]
    fn test_builtin_defaults() {
        let resolver = ConfigResolver::new(Vec::new());
        assert_eq!(resolver.timeout(), Duration::from_millis(30_000));
        assert!(resolver.logging_enabled());
        assert!(!resolver.mocking_enabled());
        assert_eq!(resolver.environment(), "qa");
        assert_eq!(resolver.base_url(), None);
    }

    #[test]
    fn test_resolve_int_fallback() {
        let resolver = ConfigResolver::new(vec![general(
            ConfigLayer::new("config.properties")
                .with("timeout", "abc")
                .with("retries", " 3 "),
        )]);
        assert_eq!(resolver.resolve_int("timeout", 5000), 5000);
        assert_eq!(resolver.resolve_int("retries", 0), 3);
        assert_eq!(resolver.resolve_int("missing", 7), 7);
    }

    #[test]
    fn test_resolve_bool_variants() {
        let resolver = ConfigResolver::new(Vec::new());
        resolver.set_override("a", "TRUE");
        resolver.set_override("b", "no");
        resolver.set_override("c", "perhaps");
        assert!(resolver.resolve_bool("a", false));
        assert!(!resolver.resolve_bool("b", true));
        assert!(resolver.resolve_bool("c", true));
    }

    #[test]
    fn test_negative_timeout_falls_back() {
        let resolver = ConfigResolver::new(Vec::new());
        resolver.set_override("timeout", "-5");
        assert_eq!(resolver.timeout(), Duration::from_millis(30_000));
    }

    #[test]
    fn test_snapshot_includes_overrides() {
        let resolver = standard_resolver();
        resolver.set_override("api.key", "secret");
        let snapshot = resolver.snapshot();
        assert_eq!(snapshot.get("api.key").map(String::as_str), Some("secret"));
        assert_eq!(snapshot.get("base.url").map(String::as_str), Some("http://b"));
        assert_eq!(snapshot.get("timeout").map(String::as_str), Some("30000"));
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_invalid_int_logs_warning() {
        let resolver = ConfigResolver::new(Vec::new());
        resolver.set_override("timeout", "soon");
        let _ = resolver.resolve_int("timeout", 1);
        assert!(logs_contain("Invalid integer in configuration"));
    }
}
