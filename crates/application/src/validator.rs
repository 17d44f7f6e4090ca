//! Response validation
//!
//! [`ResponseValidator`] wraps a [`RawResponse`] and offers typed
//! extraction plus assertions that return `Result<&Self, AssertionFailure>`
//! so they chain with `?`.

use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use regex::Regex;
use restprobe_domain::{
    Assertion, AssertionFailure, JsonType, RawResponse, ResponseHeaders, StatusCode,
    StatusExpectation,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ValidationError;
use crate::ports::{PathError, PathEvaluator, SchemaValidator};

/// Longest body excerpt quoted in a failure.
const BODY_EXCERPT_LEN: usize = 200;

/// Result of a single assertion, chainable with `?`.
pub type AssertionOutcome<'a> = Result<&'a ResponseValidator, AssertionFailure>;

/// Fluent validation surface over one response.
///
/// The body is parsed at most once, on the first path lookup.
pub struct ResponseValidator {
    response: RawResponse,
    evaluator: Arc<dyn PathEvaluator>,
    document: OnceCell<Result<Value, PathError>>,
}

impl ResponseValidator {
    /// Wraps a response.
    #[must_use]
    pub fn new(response: RawResponse, evaluator: Arc<dyn PathEvaluator>) -> Self {
        Self {
            response,
            evaluator,
            document: OnceCell::new(),
        }
    }

    /// The wrapped response.
    #[must_use]
    pub const fn response(&self) -> &RawResponse {
        &self.response
    }

    /// Consumes the validator, returning the response.
    #[must_use]
    pub fn into_response(self) -> RawResponse {
        self.response
    }

    /// Numeric status code.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.response.status().as_u16()
    }

    /// Status code with helpers.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.response.status()
    }

    /// First value of a header, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.response.headers().get(name)
    }

    /// Every value of a header, ignoring case.
    #[must_use]
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.response.headers().get_all(name)
    }

    /// All headers.
    #[must_use]
    pub const fn headers(&self) -> &ResponseHeaders {
        self.response.headers()
    }

    /// Body decoded as text.
    #[must_use]
    pub fn body_text(&self) -> String {
        self.response.body_text()
    }

    /// Raw body bytes.
    #[must_use]
    pub fn body_bytes(&self) -> &[u8] {
        self.response.body_bytes()
    }

    /// Time taken by the request.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.response.elapsed()
    }

    /// True for 200-299.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.response.status().is_success()
    }

    /// True for 400-499.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.response.status().is_client_error()
    }

    /// True for 500 and above.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.response.status().is_server_error()
    }

    fn document(&self) -> Result<&Value, ValidationError> {
        self.document
            .get_or_init(|| self.evaluator.parse(&self.response.body_text()))
            .as_ref()
            .map_err(|e| ValidationError::from(e.clone()))
    }

    /// Evaluates a path expression against the body.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::MalformedBody`] if the body is not JSON
    /// - [`ValidationError::InvalidPath`] if the expression cannot be parsed
    /// - [`ValidationError::MissingPath`] if nothing is found at the path
    pub fn value_at(&self, path: &str) -> Result<Value, ValidationError> {
        let document = self.document()?;
        Ok(self.evaluator.evaluate(document, path)?)
    }

    /// Returns true if [`Self::value_at`] would succeed.
    #[must_use]
    pub fn has_path(&self, path: &str) -> bool {
        self.value_at(path).is_ok()
    }

    /// Deserializes the value at a path.
    ///
    /// # Errors
    ///
    /// Returns the lookup error, or [`ValidationError::Deserialize`] if the
    /// value does not fit `T`.
    pub fn value_as<T: DeserializeOwned>(&self, path: &str) -> Result<T, ValidationError> {
        let value = self.value_at(path)?;
        serde_json::from_value(value).map_err(|e| ValidationError::Deserialize {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Deserializes the whole body.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedBody`] or [`ValidationError::Deserialize`].
    pub fn body_as<T: DeserializeOwned>(&self) -> Result<T, ValidationError> {
        let document = self.document()?;
        T::deserialize(document).map_err(|e| ValidationError::Deserialize {
            path: "$".to_string(),
            message: e.to_string(),
        })
    }

    /// Text of the value at a path. Strings are returned without quotes,
    /// other values in their JSON form.
    ///
    /// # Errors
    ///
    /// Returns the lookup error.
    pub fn string_at(&self, path: &str) -> Result<String, ValidationError> {
        Ok(match self.value_at(path)? {
            Value::String(text) => text,
            other => other.to_string(),
        })
    }

    /// Integer at a path.
    ///
    /// # Errors
    ///
    /// Returns the lookup error or [`ValidationError::Deserialize`].
    pub fn i64_at(&self, path: &str) -> Result<i64, ValidationError> {
        self.value_as(path)
    }

    /// Boolean at a path.
    ///
    /// # Errors
    ///
    /// Returns the lookup error or [`ValidationError::Deserialize`].
    pub fn bool_at(&self, path: &str) -> Result<bool, ValidationError> {
        self.value_as(path)
    }

    /// Array at a path.
    ///
    /// # Errors
    ///
    /// Returns the lookup error or [`ValidationError::Deserialize`].
    pub fn array_at(&self, path: &str) -> Result<Vec<Value>, ValidationError> {
        self.value_as(path)
    }

    /// Asserts the exact status code.
    ///
    /// # Errors
    ///
    /// Returns an [`AssertionFailure`] if the status differs.
    pub fn assert_status(&self, expected: u16) -> AssertionOutcome<'_> {
        let actual = self.status_code();
        if actual == expected {
            Ok(self)
        } else {
            Err(AssertionFailure::mismatch(
                "status code",
                expected.to_string(),
                actual.to_string(),
            ))
        }
    }

    /// Asserts the status code lies in `min..=max`.
    ///
    /// # Errors
    ///
    /// Returns an [`AssertionFailure`] if the status is outside the range.
    pub fn assert_status_in_range(&self, min: u16, max: u16) -> AssertionOutcome<'_> {
        let actual = self.status_code();
        if (min..=max).contains(&actual) {
            Ok(self)
        } else {
            Err(AssertionFailure::mismatch(
                "status code",
                format!("between {min} and {max}"),
                actual.to_string(),
            ))
        }
    }

    /// Asserts the body text contains `text`.
    ///
    /// # Errors
    ///
    /// Returns an [`AssertionFailure`] if the text is absent.
    pub fn assert_body_contains(&self, text: &str) -> AssertionOutcome<'_> {
        let body = self.body_text();
        if body.contains(text) {
            Ok(self)
        } else {
            Err(AssertionFailure::new(
                "body",
                format!("to contain '{text}'"),
                excerpt(&body),
                format!("Response body does not contain expected text: {text}"),
            ))
        }
    }

    /// Asserts the body matches a regular expression.
    ///
    /// # Errors
    ///
    /// Returns an [`AssertionFailure`] if the pattern is invalid or does not match.
    pub fn assert_body_matches(&self, pattern: &str) -> AssertionOutcome<'_> {
        let regex = Regex::new(pattern).map_err(|e| {
            AssertionFailure::new(
                "body",
                format!("to match /{pattern}/"),
                "<invalid pattern>",
                format!("Invalid regex pattern /{pattern}/: {e}"),
            )
        })?;
        let body = self.body_text();
        if regex.is_match(&body) {
            Ok(self)
        } else {
            Err(AssertionFailure::new(
                "body",
                format!("to match /{pattern}/"),
                excerpt(&body),
                format!("Response body does not match pattern: {pattern}"),
            ))
        }
    }

    /// Asserts the value at a path equals `expected`.
    ///
    /// Numbers compare by value, so `1` equals `1.0`.
    ///
    /// # Errors
    ///
    /// Returns an [`AssertionFailure`] if the lookup fails or the values differ.
    pub fn assert_path_equals(&self, path: &str, expected: impl Into<Value>) -> AssertionOutcome<'_> {
        let expected = expected.into();
        let actual = self
            .value_at(path)
            .map_err(|e| lookup_failure(path, &expected.to_string(), &e))?;
        if json_equals(&actual, &expected) {
            Ok(self)
        } else {
            Err(AssertionFailure::mismatch(
                format!("value at {path}"),
                expected.to_string(),
                actual.to_string(),
            ))
        }
    }

    /// Asserts a path addresses a value.
    ///
    /// # Errors
    ///
    /// Returns an [`AssertionFailure`] if the lookup fails.
    pub fn assert_path_exists(&self, path: &str) -> AssertionOutcome<'_> {
        self.value_at(path)
            .map(|_| self)
            .map_err(|e| lookup_failure(path, "to exist", &e))
    }

    /// Asserts the JSON type of the value at a path.
    ///
    /// # Errors
    ///
    /// Returns an [`AssertionFailure`] if the lookup fails or the type differs.
    pub fn assert_path_type(&self, path: &str, expected: JsonType) -> AssertionOutcome<'_> {
        let value = self
            .value_at(path)
            .map_err(|e| lookup_failure(path, expected.as_str(), &e))?;
        let actual = JsonType::of(&value);
        if actual == expected {
            Ok(self)
        } else {
            Err(AssertionFailure::mismatch(
                format!("type of {path}"),
                expected.as_str(),
                actual.as_str(),
            ))
        }
    }

    /// Asserts the JSON type of the whole body.
    ///
    /// # Errors
    ///
    /// Returns an [`AssertionFailure`] if the body is not JSON or has another type.
    pub fn assert_body_type(&self, expected: JsonType) -> AssertionOutcome<'_> {
        self.assert_path_type("$", expected)
    }

    /// Asserts every path addresses a value.
    ///
    /// # Errors
    ///
    /// Returns one [`AssertionFailure`] listing every missing path.
    pub fn assert_required_paths<I, S>(&self, paths: I) -> AssertionOutcome<'_>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let missing: Vec<String> = paths
            .into_iter()
            .filter(|path| !self.has_path(path.as_ref()))
            .map(|path| path.as_ref().to_string())
            .collect();
        if missing.is_empty() {
            Ok(self)
        } else {
            let missing = missing.join(", ");
            Err(AssertionFailure::new(
                "required paths",
                "all present",
                format!("missing {missing}"),
                format!("Missing required fields: {missing}"),
            ))
        }
    }

    /// Asserts the response arrived within `max`.
    ///
    /// # Errors
    ///
    /// Returns an [`AssertionFailure`] if the response was slower.
    pub fn assert_response_time(&self, max: Duration) -> AssertionOutcome<'_> {
        let elapsed = self.elapsed();
        if elapsed <= max {
            Ok(self)
        } else {
            Err(AssertionFailure::mismatch(
                "response time",
                format!("at most {} ms", max.as_millis()),
                format!("{} ms", elapsed.as_millis()),
            ))
        }
    }

    /// Asserts a header value, ignoring the header name's case.
    ///
    /// # Errors
    ///
    /// Returns an [`AssertionFailure`] if the header is absent or differs.
    pub fn assert_header_equals(&self, name: &str, expected: &str) -> AssertionOutcome<'_> {
        match self.header(name) {
            Some(actual) if actual == expected => Ok(self),
            actual => Err(AssertionFailure::mismatch(
                format!("header {name}"),
                expected,
                actual.unwrap_or("<absent>"),
            )),
        }
    }

    /// Asserts the body satisfies a schema.
    ///
    /// # Errors
    ///
    /// Returns an [`AssertionFailure`] if the body is not JSON or the
    /// validator reports a violation.
    pub fn assert_matches_schema(
        &self,
        validator: &dyn SchemaValidator,
        schema: &Value,
    ) -> AssertionOutcome<'_> {
        let document = self
            .document()
            .map_err(|e| lookup_failure("$", "to match schema", &e))?;
        validator.validate(document, schema).map(|()| self).map_err(|violation| {
            AssertionFailure::new(
                "body",
                "to match schema",
                violation.clone(),
                format!("Response body does not match schema: {violation}"),
            )
        })
    }

    /// Evaluates one declarative assertion.
    ///
    /// # Errors
    ///
    /// Returns the [`AssertionFailure`] of the underlying assertion.
    pub fn check(&self, assertion: &Assertion) -> Result<(), AssertionFailure> {
        match assertion {
            Assertion::Status { expected } => self.check_status(expected),
            Assertion::ResponseTime { max_ms } => self
                .assert_response_time(Duration::from_millis(*max_ms))
                .map(drop),
            Assertion::HeaderEquals { name, expected } => {
                self.assert_header_equals(name, expected).map(drop)
            }
            Assertion::BodyContains { text } => self.assert_body_contains(text).map(drop),
            Assertion::BodyMatches { pattern } => self.assert_body_matches(pattern).map(drop),
            Assertion::PathEquals { path, expected } => {
                self.assert_path_equals(path, expected.clone()).map(drop)
            }
            Assertion::PathExists { path } => self.assert_path_exists(path).map(drop),
            Assertion::PathType { path, expected } => {
                self.assert_path_type(path, *expected).map(drop)
            }
            Assertion::BodyType { expected } => self.assert_body_type(*expected).map(drop),
            Assertion::RequiredPaths { paths } => self.assert_required_paths(paths.iter()).map(drop),
        }
    }

    fn check_status(&self, expected: &StatusExpectation) -> Result<(), AssertionFailure> {
        match expected {
            StatusExpectation::Exact(code) => self.assert_status(*code).map(drop),
            StatusExpectation::Range { min, max } => {
                self.assert_status_in_range(*min, *max).map(drop)
            }
            StatusExpectation::OneOf(_) => {
                let actual = self.status_code();
                if expected.matches(actual) {
                    Ok(())
                } else {
                    Err(AssertionFailure::mismatch(
                        "status code",
                        expected.description(),
                        actual.to_string(),
                    ))
                }
            }
        }
    }
}

impl std::fmt::Debug for ResponseValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseValidator")
            .field("response", &self.response)
            .finish_non_exhaustive()
    }
}

fn lookup_failure(path: &str, expected: &str, error: &ValidationError) -> AssertionFailure {
    let actual = match error {
        ValidationError::MissingPath(_) => "<missing>".to_string(),
        ValidationError::MalformedBody(_) => "<malformed body>".to_string(),
        ValidationError::InvalidPath { .. } => "<invalid path>".to_string(),
        ValidationError::Deserialize { message, .. } => message.clone(),
    };
    AssertionFailure::new(
        path,
        expected,
        actual,
        format!("Expected value at {path} {expected} but lookup failed: {error}"),
    )
}

fn json_equals(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) if a.is_f64() || b.is_f64() => {
            match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => (a - b).abs() < f64::EPSILON,
                _ => false,
            }
        }
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a == b,
            _ => a.as_u64().is_some() && a.as_u64() == b.as_u64(),
        },
        _ => actual == expected,
    }
}

fn excerpt(body: &str) -> String {
    if body.chars().count() <= BODY_EXCERPT_LEN {
        body.to_string()
    } else {
        let cut: String = body.chars().take(BODY_EXCERPT_LEN).collect();
        format!("{cut}...")
    }
}
