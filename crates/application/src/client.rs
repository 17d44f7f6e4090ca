//! API client facade
//!
//! One method per HTTP verb. Each call resolves the base URL and timeout
//! from the [`ConfigResolver`], builds a [`RequestSpec`], invokes it and
//! wraps the response in a [`ResponseValidator`].

use std::sync::Arc;

use parking_lot::RwLock;
use restprobe_domain::{Headers, HttpMethod, RequestOptions, RequestSpec, keys};
use tracing::{error, info};

use crate::config::ConfigResolver;
use crate::error::{ApplicationError, ApplicationResult};
use crate::invoker::HttpInvoker;
use crate::ports::PathEvaluator;
use crate::validator::ResponseValidator;

/// High-level client for the service under test.
///
/// Default headers are shared by every later call on the same client and
/// can be changed concurrently; the last write wins.
pub struct ApiClient {
    config: Arc<ConfigResolver>,
    invoker: HttpInvoker,
    evaluator: Arc<dyn PathEvaluator>,
    default_headers: RwLock<Headers>,
    default_options: RequestOptions,
}

impl ApiClient {
    /// Creates a client.
    #[must_use]
    pub fn new(
        config: Arc<ConfigResolver>,
        invoker: HttpInvoker,
        evaluator: Arc<dyn PathEvaluator>,
    ) -> Self {
        Self {
            config,
            invoker,
            evaluator,
            default_headers: RwLock::new(Headers::new()),
            default_options: RequestOptions::default(),
        }
    }

    /// Sets options every call starts from. Call options override them
    /// field by field.
    #[must_use]
    pub fn with_default_options(mut self, options: RequestOptions) -> Self {
        self.default_options = options;
        self
    }

    /// The configuration this client reads.
    #[must_use]
    pub fn config(&self) -> &ConfigResolver {
        &self.config
    }

    /// Adds or replaces a default header.
    pub fn add_default_header(&self, name: impl Into<String>, value: impl Into<String>) {
        self.default_headers.write().set(name, value);
    }

    /// Adds or replaces several default headers.
    pub fn add_default_headers(&self, headers: &Headers) {
        self.default_headers.write().extend_from(headers);
    }

    /// Current default headers.
    #[must_use]
    pub fn default_headers(&self) -> Headers {
        self.default_headers.read().clone()
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// See [`Self::send`].
    pub async fn get(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApplicationResult<ResponseValidator> {
        self.send(HttpMethod::Get, endpoint, options).await
    }

    /// Sends a POST request.
    ///
    /// # Errors
    ///
    /// See [`Self::send`].
    pub async fn post(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApplicationResult<ResponseValidator> {
        self.send(HttpMethod::Post, endpoint, options).await
    }

    /// Sends a PUT request.
    ///
    /// # Errors
    ///
    /// See [`Self::send`].
    pub async fn put(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApplicationResult<ResponseValidator> {
        self.send(HttpMethod::Put, endpoint, options).await
    }

    /// Sends a PATCH request.
    ///
    /// # Errors
    ///
    /// See [`Self::send`].
    pub async fn patch(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApplicationResult<ResponseValidator> {
        self.send(HttpMethod::Patch, endpoint, options).await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// See [`Self::send`].
    pub async fn delete(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApplicationResult<ResponseValidator> {
        self.send(HttpMethod::Delete, endpoint, options).await
    }

    /// Sends an OPTIONS request.
    ///
    /// # Errors
    ///
    /// See [`Self::send`].
    pub async fn options(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApplicationResult<ResponseValidator> {
        self.send(HttpMethod::Options, endpoint, options).await
    }

    /// Sends a request with any method.
    ///
    /// # Errors
    ///
    /// - [`ApplicationError::Domain`] if the request cannot be built
    /// - [`ApplicationError::MissingBaseUrl`] for a relative endpoint without
    ///   a configured base URL
    /// - [`ApplicationError::Transport`] if no response was received
    pub async fn send(
        &self,
        method: HttpMethod,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApplicationResult<ResponseValidator> {
        let options = options.merged_over(&self.default_options);
        let spec = RequestSpec::build(method, endpoint, options)?;
        let base_url = self.base_url_for(&spec)?;
        let default_headers = self.default_headers();
        let timeout = self.config.timeout();

        let response = self
            .invoker
            .invoke(&spec, &base_url, &default_headers, timeout)
            .await
            .map_err(|e| {
                error!(method = %method, endpoint, error = %e, "Request failed");
                e
            })?;

        info!(
            method = %method,
            path = spec.path(),
            status = response.status().as_u16(),
            elapsed_ms = u64::try_from(response.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Request completed"
        );
        Ok(ResponseValidator::new(response, Arc::clone(&self.evaluator)))
    }

    fn base_url_for(&self, spec: &RequestSpec) -> ApplicationResult<String> {
        let path = spec.path();
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(String::new());
        }
        self.config
            .base_url()
            .ok_or(ApplicationError::MissingBaseUrl(keys::BASE_URL))
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("default_headers", &*self.default_headers.read())
            .finish_non_exhaustive()
    }
}
