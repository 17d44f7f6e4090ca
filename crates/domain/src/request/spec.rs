//! Request specification type
//!
//! A [`RequestSpec`] is the immutable description of one HTTP call. It is
//! assembled from [`RequestOptions`] without performing any I/O.

use serde::{Deserialize, Serialize};
use url::Url;

use super::{ContentType, Headers, HttpMethod, PathParams, QueryParams, QueryValue, RequestBody};
use super::path::expand_template;
use crate::error::{DomainError, DomainResult};

/// Optional per-call request fields.
///
/// Every field defaults to absent. Absent and empty differ only when
/// merging: an absent field leaves the defaults untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOptions {
    /// Call-level headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Headers>,
    /// Query parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_params: Option<QueryParams>,
    /// Values for `{name}` placeholders in the endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_params: Option<PathParams>,
    /// Request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<RequestBody>,
    /// Body content type; JSON when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    /// Value of the `Accept` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept: Option<String>,
}

impl RequestOptions {
    /// Creates options with every field absent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.get_or_insert_with(Headers::new).set(name, value);
        self
    }

    /// Replaces the header map.
    #[must_use]
    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query_params
            .get_or_insert_with(QueryParams::new)
            .set(key, value);
        self
    }

    /// Replaces the query parameter map.
    #[must_use]
    pub fn query_params(mut self, params: QueryParams) -> Self {
        self.query_params = Some(params);
        self
    }

    /// Adds a single path parameter.
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.path_params
            .get_or_insert_with(PathParams::new)
            .set(name, value);
        self
    }

    /// Replaces the path parameter map.
    #[must_use]
    pub fn path_params(mut self, params: PathParams) -> Self {
        self.path_params = Some(params);
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serializes any value as the body.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidBody`] if the value cannot be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> DomainResult<Self> {
        self.body = Some(RequestBody::serialize(value)?);
        Ok(self)
    }

    /// Sets the content type.
    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<ContentType>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Sets the `Accept` header value.
    #[must_use]
    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    /// Layers these options over `defaults`, field by field.
    ///
    /// Map fields merge key by key with these options winning. Scalar
    /// fields are taken from these options when present, otherwise from
    /// the defaults.
    #[must_use]
    pub fn merged_over(self, defaults: &Self) -> Self {
        Self {
            headers: merge_map(defaults.headers.as_ref(), self.headers, Headers::extend_from),
            query_params: merge_map(
                defaults.query_params.as_ref(),
                self.query_params,
                QueryParams::extend_from,
            ),
            path_params: merge_map(
                defaults.path_params.as_ref(),
                self.path_params,
                PathParams::extend_from,
            ),
            body: self.body.or_else(|| defaults.body.clone()),
            content_type: self.content_type.or_else(|| defaults.content_type.clone()),
            accept: self.accept.or_else(|| defaults.accept.clone()),
        }
    }
}

fn merge_map<T: Clone>(
    defaults: Option<&T>,
    overrides: Option<T>,
    extend: impl Fn(&mut T, &T),
) -> Option<T> {
    match (defaults, overrides) {
        (Some(base), Some(top)) => {
            let mut merged = base.clone();
            extend(&mut merged, &top);
            Some(merged)
        }
        (Some(base), None) => Some(base.clone()),
        (None, top) => top,
    }
}

/// Complete, immutable specification for an HTTP request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    method: HttpMethod,
    endpoint: String,
    path: String,
    headers: Headers,
    query_params: QueryParams,
    path_params: PathParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    body: Option<RequestBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content_type: Option<ContentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    accept: Option<String>,
}

impl RequestSpec {
    /// Builds a request from a method, an endpoint template and options.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingPathParameter`] when a `{name}` token in
    /// the endpoint has no matching path parameter.
    pub fn build(
        method: HttpMethod,
        endpoint: impl Into<String>,
        options: RequestOptions,
    ) -> DomainResult<Self> {
        let endpoint = endpoint.into();
        let path_params = options.path_params.unwrap_or_default();
        let path = expand_template(&endpoint, &path_params)?;

        Ok(Self {
            method,
            endpoint,
            path,
            headers: options.headers.unwrap_or_default(),
            query_params: options.query_params.unwrap_or_default(),
            path_params,
            body: options.body,
            content_type: options.content_type,
            accept: options.accept,
        })
    }

    /// Creates a GET request with no options.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint contains placeholders.
    pub fn get(endpoint: impl Into<String>) -> DomainResult<Self> {
        Self::build(HttpMethod::Get, endpoint, RequestOptions::default())
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// The endpoint template as supplied.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The endpoint with path parameters substituted.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Call-level headers.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Query parameters.
    #[must_use]
    pub const fn query_params(&self) -> &QueryParams {
        &self.query_params
    }

    /// Path parameters used for substitution.
    #[must_use]
    pub const fn path_params(&self) -> &PathParams {
        &self.path_params
    }

    /// Request body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    /// Effective content type (JSON unless overridden).
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        self.content_type.clone().unwrap_or_default()
    }

    /// Requested `Accept` value, if any.
    #[must_use]
    pub fn accept(&self) -> Option<&str> {
        self.accept.as_deref()
    }

    /// Computes the headers actually sent.
    ///
    /// Defaults are applied first and call headers override same-named
    /// defaults. `Content-Type` is added when the request has a body or an
    /// explicit content type and no header already sets it; `Accept` is
    /// added when requested.
    #[must_use]
    pub fn effective_headers(&self, defaults: &Headers) -> Headers {
        let mut headers = defaults.clone();
        headers.extend_from(&self.headers);

        if (self.body.is_some() || self.content_type.is_some())
            && !self.headers.contains("Content-Type")
        {
            headers.set("Content-Type", self.content_type().as_str());
        }
        if let Some(accept) = &self.accept {
            headers.set("Accept", accept.clone());
        }
        headers
    }

    /// Resolves the full URL against a base URL.
    ///
    /// Absolute endpoints (`http://` or `https://`) ignore the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidUrl`] if the result is not a valid URL.
    pub fn url(&self, base_url: &str) -> DomainResult<Url> {
        let raw = if self.path.starts_with("http://") || self.path.starts_with("https://") {
            self.path.clone()
        } else if self.path.is_empty() {
            base_url.to_string()
        } else {
            format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                self.path.trim_start_matches('/')
            )
        };

        let mut url = Url::parse(&raw).map_err(|e| DomainError::InvalidUrl(format!("{e}: {raw}")))?;
        if !self.query_params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in self.query_params.pairs() {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_build_substitutes_path_params() {
        let spec = RequestSpec::build(
            HttpMethod::Get,
            "/posts/{id}",
            RequestOptions::new().path_param("id", 1),
        )
        .unwrap();

        assert_eq!(spec.endpoint(), "/posts/{id}");
        assert_eq!(spec.path(), "/posts/1");
    }

    #[test]
    fn test_build_missing_path_param() {
        let result = RequestSpec::build(HttpMethod::Delete, "/posts/{id}", RequestOptions::new());
        assert!(matches!(
            result,
            Err(DomainError::MissingPathParameter { ref name, .. }) if name == "id"
        ));
    }

    #[test]
    fn test_content_type_defaults_to_json() {
        let spec = RequestSpec::build(
            HttpMethod::Post,
            "/posts",
            RequestOptions::new().body(json!({"title": "foo"})),
        )
        .unwrap();

        assert_eq!(spec.content_type(), ContentType::Json);
        let headers = spec.effective_headers(&Headers::new());
        assert_eq!(headers.get("content-type"), Some("application/json"));
    }

    #[test]
    fn test_no_content_type_without_body() {
        let spec = RequestSpec::get("/posts").unwrap();
        assert!(!spec.effective_headers(&Headers::new()).contains("Content-Type"));
    }

    #[test]
    fn test_call_headers_override_defaults() {
        let defaults = Headers::new().with("X", "a").with("X-Client", "restprobe");
        let spec = RequestSpec::build(
            HttpMethod::Get,
            "/posts",
            RequestOptions::new().header("x", "b").accept("application/json"),
        )
        .unwrap();

        let headers = spec.effective_headers(&defaults);
        assert_eq!(headers.get("X"), Some("b"));
        assert_eq!(headers.get("X-Client"), Some("restprobe"));
        assert_eq!(headers.get("Accept"), Some("application/json"));
    }

    #[test]
    fn test_explicit_content_type_header_wins() {
        let spec = RequestSpec::build(
            HttpMethod::Post,
            "/upload",
            RequestOptions::new()
                .body("raw")
                .header("Content-Type", "text/csv"),
        )
        .unwrap();

        assert_eq!(
            spec.effective_headers(&Headers::new()).get("Content-Type"),
            Some("text/csv")
        );
    }

    #[test]
    fn test_url_joins_base_and_query() {
        let spec = RequestSpec::build(
            HttpMethod::Get,
            "/posts",
            RequestOptions::new()
                .query("userId", 1)
                .query("tag", vec!["a", "b"]),
        )
        .unwrap();

        let url = spec.url("https://jsonplaceholder.typicode.com/").unwrap();
        assert_eq!(
            url.as_str(),
            "https://jsonplaceholder.typicode.com/posts?userId=1&tag=a&tag=b"
        );
    }

    #[test]
    fn test_url_keeps_base_path() {
        let spec = RequestSpec::get("users").unwrap();
        assert_eq!(
            spec.url("http://localhost:8080/api/v1").unwrap().as_str(),
            "http://localhost:8080/api/v1/users"
        );
    }

    #[test]
    fn test_url_absolute_endpoint() {
        let spec = RequestSpec::get("https://other.example.com/health").unwrap();
        assert_eq!(
            spec.url("http://ignored").unwrap().as_str(),
            "https://other.example.com/health"
        );
    }

    #[test]
    fn test_url_invalid_base() {
        let spec = RequestSpec::get("/posts").unwrap();
        assert!(matches!(spec.url("not a url"), Err(DomainError::InvalidUrl(_))));
    }

    #[test]
    fn test_merge_is_field_by_field() {
        let defaults = RequestOptions::new()
            .query("_limit", 10)
            .header("X-Env", "qa")
            .accept("application/json");
        let call = RequestOptions::new().header("X-Trace", "1");

        let merged = call.merged_over(&defaults);

        let query = merged.query_params.unwrap();
        assert_eq!(query.get("_limit"), Some(&QueryValue::from("10")));
        let headers = merged.headers.unwrap();
        assert_eq!(headers.get("X-Env"), Some("qa"));
        assert_eq!(headers.get("X-Trace"), Some("1"));
        assert_eq!(merged.accept.as_deref(), Some("application/json"));
    }

    #[test]
    fn test_merge_scalar_override() {
        let defaults = RequestOptions::new().content_type(ContentType::Xml);
        let merged = RequestOptions::new()
            .content_type(ContentType::Text)
            .merged_over(&defaults);
        assert_eq!(merged.content_type, Some(ContentType::Text));
    }
}
