//! JSON path expressions
//!
//! A small subset of JSONPath sufficient for response assertions:
//!
//! - `$` is the document root
//! - `.field` and `['field']` select an object member
//! - `[n]` selects an array element, negative `n` counts from the end
//! - `[*]` and `.*` select every element, turning the result into a list
//!
//! A leading `$` is optional, so `data.id` means `$.data.id`.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{DomainError, DomainResult};

/// One step of a path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object member by name.
    Field(String),
    /// Array element by position.
    Index(i64),
    /// Every array element or object member.
    Wildcard,
}

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpression {
    source: String,
    segments: Vec<PathSegment>,
}

impl PathExpression {
    /// Parses an expression.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidPathExpression`] for empty expressions,
    /// empty member names, unterminated brackets and non-numeric indexes.
    ///
    /// # Examples
    ///
    /// ```
    /// use restprobe_domain::PathExpression;
    /// use serde_json::json;
    ///
    /// let path = PathExpression::parse("$.items[1].name").unwrap();
    /// let body = json!({"items": [{"name": "a"}, {"name": "b"}]});
    /// assert_eq!(path.evaluate(&body), Some(json!("b")));
    /// ```
    pub fn parse(expression: &str) -> DomainResult<Self> {
        let source = expression.trim();
        if source.is_empty() {
            return Err(invalid(expression, "expression is empty"));
        }

        let rest = match source.strip_prefix('$') {
            Some(rest) => rest.to_string(),
            None if source.starts_with('[') => source.to_string(),
            None => format!(".{source}"),
        };

        let chars: Vec<char> = rest.chars().collect();
        let mut segments = Vec::new();
        let mut pos = 0;

        while pos < chars.len() {
            match chars[pos] {
                '.' => {
                    pos += 1;
                    if chars.get(pos) == Some(&'*') {
                        segments.push(PathSegment::Wildcard);
                        pos += 1;
                        continue;
                    }
                    let start = pos;
                    while pos < chars.len() && chars[pos] != '.' && chars[pos] != '[' {
                        pos += 1;
                    }
                    let name: String = chars[start..pos].iter().collect();
                    if name.is_empty() {
                        return Err(invalid(source, "empty member name"));
                    }
                    segments.push(PathSegment::Field(name));
                }
                '[' => {
                    let start = pos + 1;
                    let Some(offset) = chars[start..].iter().position(|&c| c == ']') else {
                        return Err(invalid(source, "unterminated '['"));
                    };
                    let inner: String = chars[start..start + offset].iter().collect();
                    segments.push(parse_bracket(source, inner.trim())?);
                    pos = start + offset + 1;
                }
                other => {
                    return Err(invalid(source, &format!("unexpected character '{other}'")));
                }
            }
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The expression as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns true if the expression addresses at most one value.
    #[must_use]
    pub fn is_definite(&self) -> bool {
        !self.segments.contains(&PathSegment::Wildcard)
    }

    /// Evaluates the expression against a document.
    ///
    /// Returns `None` when a definite path addresses nothing. Once a
    /// wildcard has been applied the result is a list of every match and
    /// members missing from some elements are skipped.
    #[must_use]
    pub fn evaluate(&self, root: &Value) -> Option<Value> {
        let mut current: Vec<&Value> = vec![root];
        let mut projected = false;

        for segment in &self.segments {
            let mut next = Vec::with_capacity(current.len());
            for value in current {
                match (segment, value) {
                    (PathSegment::Field(name), Value::Object(map)) => {
                        if let Some(child) = map.get(name) {
                            next.push(child);
                        } else if !projected {
                            return None;
                        }
                    }
                    (PathSegment::Index(index), Value::Array(items)) => {
                        if let Some(child) = resolve_index(items, *index) {
                            next.push(child);
                        } else if !projected {
                            return None;
                        }
                    }
                    (PathSegment::Wildcard, Value::Array(items)) => next.extend(items.iter()),
                    (PathSegment::Wildcard, Value::Object(map)) => next.extend(map.values()),
                    _ if projected => {}
                    _ => return None,
                }
            }
            if matches!(segment, PathSegment::Wildcard) {
                projected = true;
            }
            current = next;
        }

        if projected {
            Some(Value::Array(current.into_iter().cloned().collect()))
        } else {
            current.first().map(|value| (*value).clone())
        }
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for PathExpression {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_bracket(source: &str, inner: &str) -> DomainResult<PathSegment> {
    if inner == "*" {
        return Ok(PathSegment::Wildcard);
    }
    for quote in ['\'', '"'] {
        if let Some(name) = inner
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return Ok(PathSegment::Field(name.to_string()));
        }
    }
    inner
        .parse::<i64>()
        .map(PathSegment::Index)
        .map_err(|_| invalid(source, &format!("invalid array index '{inner}'")))
}

fn resolve_index(items: &[Value], index: i64) -> Option<&Value> {
    let len = i64::try_from(items.len()).ok()?;
    let position = if index < 0 { len + index } else { index };
    usize::try_from(position).ok().and_then(|i| items.get(i))
}

fn invalid(expression: &str, reason: &str) -> DomainError {
    DomainError::InvalidPathExpression {
        expression: expression.to_string(),
        reason: reason.to_string(),
    }
}
