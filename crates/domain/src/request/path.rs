//! Endpoint templates with `{name}` placeholders
//!
//! Parses endpoint strings such as `/users/{id}/posts` and substitutes
//! path parameters into them.

use std::collections::BTreeMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A `{name}` placeholder found in an endpoint template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// The placeholder name (without braces).
    pub name: String,
    /// Byte range of `{name}` in the template.
    pub span: Range<usize>,
}

/// Extracts all `{name}` placeholders from an endpoint template.
///
/// Empty braces and unterminated braces are left as literal text.
///
/// # Examples
///
/// ```
/// use restprobe_domain::request::parse_placeholders;
///
/// let found = parse_placeholders("/users/{userId}/posts/{id}");
/// assert_eq!(found.len(), 2);
/// assert_eq!(found[0].name, "userId");
/// assert_eq!(found[1].name, "id");
/// ```
#[must_use]
pub fn parse_placeholders(template: &str) -> Vec<Placeholder> {
    let mut placeholders = Vec::new();
    let mut chars = template.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        if ch != '{' {
            continue;
        }
        let mut name = String::new();
        let mut end = None;
        while let Some(&(i, next)) = chars.peek() {
            if next == '{' {
                // restart scanning from the inner brace
                break;
            }
            chars.next();
            if next == '}' {
                end = Some(i + 1);
                break;
            }
            name.push(next);
        }
        if let Some(end) = end {
            let trimmed = name.trim();
            if !trimmed.is_empty() {
                placeholders.push(Placeholder {
                    name: trimmed.to_string(),
                    span: start..end,
                });
            }
        }
    }

    placeholders
}

/// Named values substituted into an endpoint template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathParams {
    values: BTreeMap<String, String>,
}

impl PathParams {
    /// Creates an empty set of path parameters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Sets a parameter value.
    pub fn set(&mut self, name: impl Into<String>, value: impl ToString) {
        self.values.insert(name.into(), value.to_string());
    }

    /// Sets a parameter value (builder pattern).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.set(name, value);
        self
    }

    /// Returns a parameter value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Applies every parameter of `other` on top of this set.
    pub fn extend_from(&mut self, other: &Self) {
        for (name, value) in &other.values {
            self.values.insert(name.clone(), value.clone());
        }
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for PathParams {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.set(name, value);
        }
        params
    }
}

/// Substitutes every placeholder in `template` with its percent-encoded value.
///
/// Unused parameters are ignored.
///
/// # Errors
///
/// Returns [`DomainError::MissingPathParameter`] for the first placeholder
/// without a matching parameter.
pub fn expand_template(template: &str, params: &PathParams) -> DomainResult<String> {
    let mut expanded = String::with_capacity(template.len());
    let mut cursor = 0;

    for placeholder in parse_placeholders(template) {
        let value = params
            .get(&placeholder.name)
            .ok_or_else(|| DomainError::MissingPathParameter {
                name: placeholder.name.clone(),
                template: template.to_string(),
            })?;
        expanded.push_str(&template[cursor..placeholder.span.start]);
        expanded.push_str(&urlencoding::encode(value));
        cursor = placeholder.span.end;
    }
    expanded.push_str(&template[cursor..]);

    Ok(expanded)
}
