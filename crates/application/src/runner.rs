//! Assertion runner.
//!
//! Evaluates an [`AssertionSuite`] against a validated response and
//! collects the outcome of every assertion into an [`AssertionReport`].

use std::time::Instant;

use restprobe_domain::{Assertion, AssertionReport, AssertionResult, AssertionSuite};
use tracing::debug;

use crate::validator::ResponseValidator;

/// Runs declarative assertions against responses.
#[derive(Debug, Default)]
pub struct AssertionRunner {
    /// Whether to stop on first failure.
    stop_on_failure: bool,
}

impl AssertionRunner {
    /// Create a runner that collects every failure.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stop_on_failure: false,
        }
    }

    /// Set whether to stop on first failure, regardless of the suite setting.
    #[must_use]
    pub const fn with_stop_on_failure(mut self, stop: bool) -> Self {
        self.stop_on_failure = stop;
        self
    }

    /// Run a suite against a response.
    #[must_use]
    pub fn run(&self, suite: &AssertionSuite, validator: &ResponseValidator) -> AssertionReport {
        let start = Instant::now();
        let mut results = Vec::with_capacity(suite.assertions.len());

        for assertion in &suite.assertions {
            let result = Self::run_assertion(assertion, validator);
            let failed = !result.passed();
            results.push(result);

            if failed && (self.stop_on_failure || suite.stop_on_failure) {
                debug!(suite = %suite.name, "Stopping suite at first failure");
                break;
            }
        }

        #[allow(clippy::cast_possible_truncation)]
        let duration_ms = start.elapsed().as_millis() as u64;
        let report = AssertionReport::new(&suite.name, results, duration_ms);
        debug!(
            suite = %report.suite_name,
            passed = report.passed,
            failed = report.failed,
            "Assertion suite finished"
        );
        report
    }

    /// Run a single assertion against a response.
    #[must_use]
    pub fn run_assertion(assertion: &Assertion, validator: &ResponseValidator) -> AssertionResult {
        match validator.check(assertion) {
            Ok(()) => AssertionResult::pass(assertion.clone()),
            Err(failure) => AssertionResult::fail(assertion.clone(), failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::tests::validator;
    use pretty_assertions::assert_eq;
    use restprobe_domain::{JsonType, StatusExpectation};

    fn suite() -> AssertionSuite {
        AssertionSuite::new("user")
            .with_assertion(Assertion::Status {
                expected: StatusExpectation::exact(200),
            })
            .with_assertion(Assertion::PathExists {
                path: "$.email".to_string(),
            })
            .with_assertion(Assertion::PathType {
                path: "$.id".to_string(),
                expected: JsonType::Number,
            })
            .with_assertion(Assertion::BodyContains {
                text: "Leanne".to_string(),
            })
    }

    #[test]
    fn test_collects_every_failure() {
        let v = validator(404, r#"{"id":1,"name":"Leanne Graham"}"#);
        let report = AssertionRunner::new().run(&suite(), &v);

        assert_eq!(report.total, 4);
        assert_eq!(report.passed, 2);
        assert_eq!(report.failed, 2);
        let fields: Vec<&str> = report.failures().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["status code", "$.email"]);
    }

    #[test]
    fn test_stop_on_failure() {
        let v = validator(404, r#"{"id":1}"#);
        let report = AssertionRunner::new()
            .with_stop_on_failure(true)
            .run(&suite(), &v);
        assert_eq!(report.total, 1);
        assert_eq!(report.failed, 1);
    }

    #[test]
    fn test_suite_stop_flag() {
        let v = validator(404, r#"{"id":1}"#);
        let report = AssertionRunner::new().run(&suite().stop_on_failure(), &v);
        assert_eq!(report.total, 1);
    }

    #[test]
    fn test_all_pass() {
        let v = validator(200, r#"{"id":1,"name":"Leanne Graham","email":"s@april.biz"}"#);
        let report = AssertionRunner::new().run(&suite(), &v);
        assert!(report.all_passed());
        assert_eq!(report.results.len(), 4);
    }
}
