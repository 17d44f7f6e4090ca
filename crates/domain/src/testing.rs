//! Response assertions.
//!
//! Declarative assertion types, their outcomes and suites of assertions
//! evaluated together against one response.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A declarative assertion to check against a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// Check response status code.
    Status {
        /// Expected status code or range.
        expected: StatusExpectation,
    },
    /// Check response time.
    ResponseTime {
        /// Maximum allowed time in milliseconds.
        max_ms: u64,
    },
    /// Check a header value.
    HeaderEquals {
        /// Header name (case-insensitive).
        name: String,
        /// Expected value.
        expected: String,
    },
    /// Check body contains text.
    BodyContains {
        /// Text to search for.
        text: String,
    },
    /// Check body matches regex pattern.
    BodyMatches {
        /// Regex pattern.
        pattern: String,
    },
    /// Check the value at a path.
    PathEquals {
        /// Path expression (e.g., "$.data.id").
        path: String,
        /// Expected value.
        expected: Value,
    },
    /// Check a path addresses a value.
    PathExists {
        /// Path expression.
        path: String,
    },
    /// Check the JSON type of the value at a path.
    PathType {
        /// Path expression.
        path: String,
        /// Expected type.
        expected: JsonType,
    },
    /// Check the JSON type of the whole body.
    BodyType {
        /// Expected type.
        expected: JsonType,
    },
    /// Check every path addresses a value.
    RequiredPaths {
        /// Path expressions.
        paths: Vec<String>,
    },
}

impl Assertion {
    /// Get a human-readable description of this assertion.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Status { expected } => format!("Status code {}", expected.description()),
            Self::ResponseTime { max_ms } => format!("Response time <= {max_ms}ms"),
            Self::HeaderEquals { name, expected } => {
                format!("Header '{name}' equals '{expected}'")
            }
            Self::BodyContains { text } => format!("Body contains '{text}'"),
            Self::BodyMatches { pattern } => format!("Body matches /{pattern}/"),
            Self::PathEquals { path, expected } => format!("JSON {path} equals {expected}"),
            Self::PathExists { path } => format!("JSON {path} exists"),
            Self::PathType { path, expected } => format!("JSON {path} is {expected}"),
            Self::BodyType { expected } => format!("Body is a JSON {expected}"),
            Self::RequiredPaths { paths } => format!("Body has {}", paths.join(", ")),
        }
    }
}

/// Expected status code value or range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StatusExpectation {
    /// Exact status code.
    Exact(u16),
    /// Range of status codes (e.g., 200-299).
    Range {
        /// Minimum status code (inclusive).
        min: u16,
        /// Maximum status code (inclusive).
        max: u16,
    },
    /// One of multiple status codes.
    OneOf(Vec<u16>),
}

impl StatusExpectation {
    /// Check if a status code matches this expectation.
    #[must_use]
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(expected) => status == *expected,
            Self::Range { min, max } => status >= *min && status <= *max,
            Self::OneOf(codes) => codes.contains(&status),
        }
    }

    /// Get description of the expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exact(code) => format!("= {code}"),
            Self::Range { min, max } => format!("in {min}-{max}"),
            Self::OneOf(codes) => {
                let codes_str: Vec<_> = codes.iter().map(ToString::to_string).collect();
                format!("in [{}]", codes_str.join(", "))
            }
        }
    }

    /// Create a "success" expectation (200-299).
    #[must_use]
    pub const fn success() -> Self {
        Self::Range { min: 200, max: 299 }
    }

    /// Create an exact status expectation.
    #[must_use]
    pub const fn exact(code: u16) -> Self {
        Self::Exact(code)
    }
}

impl Default for StatusExpectation {
    fn default() -> Self {
        Self::success()
    }
}

/// The JSON type of a value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JsonType {
    /// `{...}`
    Object,
    /// `[...]`
    Array,
    /// `"..."`
    String,
    /// Integer or floating point number.
    Number,
    /// `true` or `false`.
    Boolean,
    /// `null`
    Null,
}

impl JsonType {
    /// Returns the type of a value.
    #[must_use]
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::Object,
            Value::Array(_) => Self::Array,
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Boolean,
            Value::Null => Self::Null,
        }
    }

    /// Lowercase type name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed assertion.
///
/// Carries what was checked, what was expected, what was found and a
/// message combining them.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[error("{message}")]
pub struct AssertionFailure {
    /// What was checked (e.g. "status code", "$.id", "header Content-Type").
    pub field: String,
    /// The expected value.
    pub expected: String,
    /// The value found.
    pub actual: String,
    /// Human-readable description of the failure.
    pub message: String,
}

impl AssertionFailure {
    /// Creates a failure with an explicit message.
    #[must_use]
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
            message: message.into(),
        }
    }

    /// Creates a failure with the standard "Expected ... but got ..." message.
    #[must_use]
    pub fn mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        let (field, expected, actual) = (field.into(), expected.into(), actual.into());
        let message = format!("Expected {field} {expected} but got {actual}");
        Self::new(field, expected, actual, message)
    }
}

/// Result of running a single assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssertionResult {
    /// The assertion that was run.
    pub assertion: Assertion,
    /// Failure details, absent when the assertion passed.
    pub failure: Option<AssertionFailure>,
}

impl AssertionResult {
    /// Create a passed result.
    #[must_use]
    pub const fn pass(assertion: Assertion) -> Self {
        Self {
            assertion,
            failure: None,
        }
    }

    /// Create a failed result.
    #[must_use]
    pub const fn fail(assertion: Assertion, failure: AssertionFailure) -> Self {
        Self {
            assertion,
            failure: Some(failure),
        }
    }

    /// Whether the assertion passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Assertions evaluated together against one response.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AssertionSuite {
    /// Suite name.
    pub name: String,
    /// Assertions to run.
    #[serde(default)]
    pub assertions: Vec<Assertion>,
    /// Whether to stop on first failure.
    #[serde(default)]
    pub stop_on_failure: bool,
}

impl AssertionSuite {
    /// Create a new empty suite that collects every failure.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            assertions: Vec::new(),
            stop_on_failure: false,
        }
    }

    /// Add an assertion to the suite.
    pub fn add(&mut self, assertion: Assertion) {
        self.assertions.push(assertion);
    }

    /// Add an assertion (builder pattern).
    #[must_use]
    pub fn with_assertion(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }

    /// Stop at the first failing assertion.
    #[must_use]
    pub const fn stop_on_failure(mut self) -> Self {
        self.stop_on_failure = true;
        self
    }

    /// Check if the suite is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assertions.is_empty()
    }

    /// Get the number of assertions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assertions.len()
    }
}

/// Results from running an assertion suite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssertionReport {
    /// Suite that was run.
    pub suite_name: String,
    /// Individual assertion results, in suite order.
    pub results: Vec<AssertionResult>,
    /// Number of assertions evaluated.
    pub total: usize,
    /// Number of passed assertions.
    pub passed: usize,
    /// Number of failed assertions.
    pub failed: usize,
    /// Evaluation time in milliseconds.
    pub duration_ms: u64,
}

impl AssertionReport {
    /// Create a report from results.
    #[must_use]
    pub fn new(
        suite_name: impl Into<String>,
        results: Vec<AssertionResult>,
        duration_ms: u64,
    ) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed()).count();

        Self {
            suite_name: suite_name.into(),
            results,
            total,
            passed,
            failed: total - passed,
            duration_ms,
        }
    }

    /// Check if all assertions passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Get pass rate as percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    /// Iterates over the failures.
    pub fn failures(&self) -> impl Iterator<Item = &AssertionFailure> {
        self.results.iter().filter_map(|r| r.failure.as_ref())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_status_expectation_range_is_inclusive() {
        let exp = StatusExpectation::success();
        assert!(exp.matches(200));
        assert!(exp.matches(299));
        assert!(!exp.matches(300));
        assert!(!exp.matches(199));
    }

    #[test]
    fn test_status_expectation_one_of() {
        let exp = StatusExpectation::OneOf(vec![200, 201, 204]);
        assert!(exp.matches(204));
        assert!(!exp.matches(202));
    }

    #[test]
    fn test_json_type_of() {
        assert_eq!(JsonType::of(&json!({"a": 1})), JsonType::Object);
        assert_eq!(JsonType::of(&json!([1])), JsonType::Array);
        assert_eq!(JsonType::of(&json!(1.5)), JsonType::Number);
        assert_eq!(JsonType::of(&json!(false)), JsonType::Boolean);
        assert_eq!(JsonType::of(&json!(null)).to_string(), "null");
    }

    #[test]
    fn test_mismatch_message() {
        let failure = AssertionFailure::mismatch("status code", "200", "404");
        assert_eq!(failure.to_string(), "Expected status code 200 but got 404");
        assert_eq!(failure.field, "status code");
    }

    #[test]
    fn test_assertion_description() {
        let assertion = Assertion::Status {
            expected: StatusExpectation::exact(200),
        };
        assert_eq!(assertion.description(), "Status code = 200");

        let assertion = Assertion::PathType {
            path: "$.id".to_string(),
            expected: JsonType::Number,
        };
        assert_eq!(assertion.description(), "JSON $.id is number");
    }

    #[test]
    fn test_assertion_serde_tagged() {
        let assertion: Assertion =
            serde_json::from_value(json!({"type": "path_exists", "path": "$.id"})).unwrap();
        assert_eq!(
            assertion,
            Assertion::PathExists {
                path: "$.id".to_string()
            }
        );
    }

    #[test]
    fn test_report_counts() {
        let results = vec![
            AssertionResult::pass(Assertion::Status {
                expected: StatusExpectation::exact(200),
            }),
            AssertionResult::fail(
                Assertion::BodyContains {
                    text: "ok".to_string(),
                },
                AssertionFailure::mismatch("body", "to contain 'ok'", "''"),
            ),
        ];

        let report = AssertionReport::new("Suite", results, 3);
        assert_eq!(report.total, 2);
        assert_eq!(report.passed, 1);
        assert_eq!(report.failed, 1);
        assert!(!report.all_passed());
        assert_eq!(report.pass_rate(), 50.0);
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn test_suite_builder() {
        let suite = AssertionSuite::new("posts")
            .with_assertion(Assertion::PathExists {
                path: "$.id".to_string(),
            })
            .stop_on_failure();
        assert_eq!(suite.len(), 1);
        assert!(suite.stop_on_failure);
    }
}
