//! Composition root
//!
//! Wires the default adapters into an [`ApiClient`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use restprobe_application::ports::{ConfigSource, HttpTransport, InvocationObserver};
use restprobe_application::{ApiClient, ApplicationResult, ConfigResolver, HttpInvoker};
use restprobe_domain::{Headers, RequestOptions};
use restprobe_infrastructure::{
    DEFAULT_CONFIG_DIR, DEFAULT_ENV_PREFIX, JsonPathEvaluator, ProcessEnvSource,
    PropertiesFileSource, ReqwestTransport, SystemClock, TracingObserver, YamlFileSource,
};
use tracing::{debug, info};

/// Builds an [`ApiClient`] with the standard configuration layers.
///
/// Layers, lowest precedence first:
///
/// 1. built-in defaults
/// 2. `config.properties`, then `config.yaml`
/// 3. `config-{env}.properties`, then `config-{env}.yaml`
/// 4. `RESTPROBE_*` environment variables
/// 5. sources added with [`ClientBuilder::source`], in order
/// 6. overrides
///
/// When `api.key` is configured and no default `Authorization` header was
/// given, the key is sent as a bearer token on every request.
///
/// # Example
///
/// ```ignore
/// let client = ClientBuilder::new()
///     .config_dir("tests/config")
///     .override_value("env", "staging")
///     .build()?;
///
/// client.get("/posts/{id}", RequestOptions::new().path_param("id", 1))
///     .await?
///     .assert_status(200)?;
/// ```
pub struct ClientBuilder {
    config_dir: PathBuf,
    env_prefix: Option<String>,
    extra_sources: Vec<Arc<dyn ConfigSource>>,
    overrides: Vec<(String, String)>,
    transport: Option<Arc<dyn HttpTransport>>,
    observer: Option<Arc<dyn InvocationObserver>>,
    default_headers: Headers,
    default_options: RequestOptions,
}

impl ClientBuilder {
    /// Starts from the default directory and environment prefix.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            env_prefix: Some(DEFAULT_ENV_PREFIX.to_string()),
            extra_sources: Vec::new(),
            overrides: Vec::new(),
            transport: None,
            observer: None,
            default_headers: Headers::new(),
            default_options: RequestOptions::default(),
        }
    }

    /// Directory holding the configuration files.
    #[must_use]
    pub fn config_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Prefix of the environment variables to read.
    #[must_use]
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Ignores the process environment.
    #[must_use]
    pub fn without_process_env(mut self) -> Self {
        self.env_prefix = None;
        self
    }

    /// Adds a configuration source above the standard ones.
    #[must_use]
    pub fn source(mut self, source: Arc<dyn ConfigSource>) -> Self {
        self.extra_sources.push(source);
        self
    }

    /// Sets an override before configuration is loaded.
    ///
    /// Overriding `env` selects the environment-specific files.
    #[must_use]
    pub fn override_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.push((key.into(), value.into()));
        self
    }

    /// Replaces the reqwest transport.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replaces the tracing observer.
    #[must_use]
    pub fn observer(mut self, observer: Arc<dyn InvocationObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Adds a default header.
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.set(name, value);
        self
    }

    /// Sets options every request starts from.
    #[must_use]
    pub fn default_options(mut self, options: RequestOptions) -> Self {
        self.default_options = options;
        self
    }

    /// The configuration sources in registration order.
    fn sources(&self) -> Vec<Arc<dyn ConfigSource>> {
        let dir = &self.config_dir;
        let mut sources: Vec<Arc<dyn ConfigSource>> = vec![
            Arc::new(PropertiesFileSource::base(dir)),
            Arc::new(YamlFileSource::base(dir)),
            Arc::new(PropertiesFileSource::per_environment(dir)),
            Arc::new(YamlFileSource::per_environment(dir)),
        ];
        if let Some(prefix) = &self.env_prefix {
            sources.push(Arc::new(ProcessEnvSource::with_prefix(prefix.clone())));
        }
        sources.extend(self.extra_sources.iter().cloned());
        sources
    }

    /// Loads the configuration and creates the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in defaults cannot be loaded or the
    /// HTTP client cannot be created.
    pub fn build(self) -> ApplicationResult<ApiClient> {
        let config = ConfigResolver::new(self.sources());
        for (key, value) in &self.overrides {
            config.set_override(key.clone(), value.clone());
        }
        config.initialize()?;
        info!(
            environment = %config.environment(),
            layers = ?config.layer_names(),
            "Configuration loaded"
        );

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?),
        };
        let observer = self
            .observer
            .unwrap_or_else(|| Arc::new(TracingObserver));
        let invoker = HttpInvoker::new(transport, Arc::new(SystemClock)).with_observer(observer);

        let mut default_headers = self.default_headers;
        if !default_headers.contains("Authorization")
            && let Some(key) = config.api_key().filter(|k| !k.is_empty())
        {
            debug!("Using api.key as bearer token");
            default_headers.extend_from(&Headers::bearer(&key));
        }

        let client = ApiClient::new(
            Arc::new(config),
            invoker,
            Arc::new(JsonPathEvaluator::new()),
        )
        .with_default_options(self.default_options);
        client.add_default_headers(&default_headers);
        Ok(client)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("config_dir", &self.config_dir)
            .field("env_prefix", &self.env_prefix)
            .field("extra_sources", &self.extra_sources.len())
            .field("overrides", &self.overrides)
            .finish_non_exhaustive()
    }
}
