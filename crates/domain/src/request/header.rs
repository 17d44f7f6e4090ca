//! HTTP Header types

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// A single HTTP header with name and value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// The header name as supplied by the caller (e.g., "Content-Type")
    pub name: String,
    /// The header value (e.g., "application/json")
    pub value: String,
}

impl Header {
    /// Creates a new header.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns true if this header has the given name, ignoring ASCII case.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// An ordered set of request headers with case-insensitive names.
///
/// Setting a header replaces any existing header with the same name
/// regardless of case, so the last write wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers {
    items: Vec<Header>,
}

impl Headers {
    /// Creates an empty header collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Sets a header, replacing a same-named one in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let header = Header::new(name, value);
        if let Some(existing) = self.items.iter_mut().find(|h| h.is_named(&header.name)) {
            *existing = header;
        } else {
            self.items.push(header);
        }
    }

    /// Sets a header (builder pattern).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Returns the value of a header (case-insensitive).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|h| h.is_named(name))
            .map(|h| h.value.as_str())
    }

    /// Returns true if a header with the given name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|h| h.is_named(name))
    }

    /// Removes a header by name, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.items.iter().position(|h| h.is_named(name))?;
        Some(self.items.remove(index).value)
    }

    /// Applies every header of `other` on top of this set.
    pub fn extend_from(&mut self, other: &Self) {
        for header in &other.items {
            self.set(header.name.clone(), header.value.clone());
        }
    }

    /// Returns an iterator over the headers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.items.iter()
    }

    /// Returns the number of headers.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::len is not const in stable
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::is_empty is not const in stable
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Creates a header set carrying a bearer token `Authorization` header.
    #[must_use]
    pub fn bearer(token: &str) -> Self {
        Self::new().with("Authorization", format!("Bearer {token}"))
    }

    /// Creates a header set carrying a basic `Authorization` header.
    #[must_use]
    pub fn basic_auth(user: &str, password: &str) -> Self {
        let encoded = STANDARD.encode(format!("{user}:{password}"));
        Self::new().with("Authorization", format!("Basic {encoded}"))
    }
}

impl FromIterator<Header> for Headers {
    fn from_iter<T: IntoIterator<Item = Header>>(iter: T) -> Self {
        let mut headers = Self::new();
        for header in iter {
            headers.set(header.name, header.value);
        }
        headers
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.set(name, value);
        }
        headers
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = &'a Header;
    type IntoIter = std::slice::Iter<'a, Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_creation() {
        let header = Header::new("Content-Type", "application/json");
        assert_eq!(header.name, "Content-Type");
        assert_eq!(header.value, "application/json");
        assert!(header.is_named("content-type"));
    }

    #[test]
    fn test_set_replaces_case_insensitively() {
        let mut headers = Headers::new();
        headers.set("X-Trace", "a");
        headers.set("x-trace", "b");

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("X-TRACE"), Some("b"));
    }

    #[test]
    fn test_extend_from_overrides() {
        let mut defaults = Headers::new().with("X", "a").with("Accept", "text/plain");
        let call = Headers::new().with("x", "b");

        defaults.extend_from(&call);

        assert_eq!(defaults.get("X"), Some("b"));
        assert_eq!(defaults.get("Accept"), Some("text/plain"));
        assert_eq!(defaults.len(), 2);
    }

    #[test]
    fn test_remove() {
        let mut headers = Headers::new().with("A", "1").with("B", "2");
        assert_eq!(headers.remove("a"), Some("1".to_string()));
        assert!(!headers.contains("A"));
        assert_eq!(headers.remove("missing"), None);
    }

    #[test]
    fn test_auth_helpers() {
        assert_eq!(
            Headers::bearer("abc").get("authorization"),
            Some("Bearer abc")
        );
        assert_eq!(
            Headers::basic_auth("user", "pass").get("Authorization"),
            Some("Basic dXNlcjpwYXNz")
        );
    }

    #[test]
    fn test_from_pairs() {
        let headers: Headers = [("Accept", "application/json"), ("accept", "text/xml")]
            .into_iter()
            .collect();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("Accept"), Some("text/xml"));
    }
}
