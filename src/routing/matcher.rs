//! Remap matching logic.
//!
//! # Responsibilities
//! - Match host header (exact match, case-insensitive)
//! - Match path prefix (case-sensitive)
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - Matchers see only the request head, so headers can be mutated right after
//! - Empty condition = always matches (wildcard)
//! - No regex to guarantee O(n) matching

use axum::http::request::Parts;
use axum::http::header::HOST;

/// Trait for matching request heads against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request head matches this condition.
    fn matches(&self, head: &Parts) -> bool;
}

/// Matches the Host header, ignoring any port.
#[derive(Debug, Clone)]
pub struct HostMatcher {
    expected_host: String,
}

impl HostMatcher {
    /// The host is normalized to lowercase for case-insensitive matching.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            expected_host: host.into().to_lowercase(),
        }
    }
}

impl Matcher for HostMatcher {
    fn matches(&self, head: &Parts) -> bool {
        let host = head
            .headers
            .get(HOST)
            .and_then(|h| h.to_str().ok())
            .or_else(|| head.uri.host());

        match host {
            Some(h) => strip_port(h).eq_ignore_ascii_case(&self.expected_host),
            None => false,
        }
    }
}

/// Drop a trailing `:port`, leaving bracketed IPv6 literals intact.
fn strip_port(host: &str) -> &str {
    match host.rsplit_once(':') {
        Some((name, port))
            if !port.is_empty()
                && port.bytes().all(|b| b.is_ascii_digit())
                && (!name.starts_with('[') || name.ends_with(']')) =>
        {
            name
        }
        _ => host,
    }
}

/// Matches the request path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, head: &Parts) -> bool {
        head.uri.path().starts_with(&self.prefix)
    }
}

/// Combines multiple matchers with AND semantics. No matchers matches everything.
#[derive(Debug, Default)]
pub struct AndMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AndMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }
}

impl Matcher for AndMatcher {
    fn matches(&self, head: &Parts) -> bool {
        self.matchers.iter().all(|m| m.matches(head))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn head(uri: &str, host: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri(uri);
        if let Some(host) = host {
            builder = builder.header("Host", host);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_host_matcher() {
        let matcher = HostMatcher::new("Example.com");

        assert!(matcher.matches(&head("/", Some("example.com"))));
        assert!(matcher.matches(&head("/", Some("EXAMPLE.COM:8080"))));
        assert!(!matcher.matches(&head("/", Some("other.com"))));
        assert!(!matcher.matches(&head("/", None)));
        assert!(matcher.matches(&head("http://example.com/x", None)));
    }

    #[test]
    fn test_host_matcher_ipv6() {
        let matcher = HostMatcher::new("[::1]");

        assert!(matcher.matches(&head("/", Some("[::1]"))));
        assert!(matcher.matches(&head("/", Some("[::1]:8080"))));
        assert!(!matcher.matches(&head("/", Some("[::2]"))));
        assert_eq!(strip_port("[::1]"), "[::1]");
        assert_eq!(strip_port("host:"), "host:");
    }

    #[test]
    fn test_path_matcher() {
        let matcher = PathPrefixMatcher::new("/api");

        assert!(matcher.matches(&head("http://example.com/api/v1", None)));
        assert!(!matcher.matches(&head("http://example.com/images", None)));
        assert!(!matcher.matches(&head("/API", None)));
    }

    #[test]
    fn test_and_matcher() {
        let matcher = AndMatcher::new(vec![
            Box::new(HostMatcher::new("example.com")),
            Box::new(PathPrefixMatcher::new("/api")),
        ]);
        assert!(matcher.matches(&head("/api/x", Some("example.com"))));
        assert!(!matcher.matches(&head("/web", Some("example.com"))));
        assert!(!matcher.matches(&head("/api/x", Some("other.com"))));

        assert!(AndMatcher::default().matches(&head("/anything", None)));
    }
}
