//! Route pattern matching.
//!
//! # Responsibilities
//! - Decide whether a pattern accepts a canonical path
//! - Extract named parameters from the accepted path
//! - Derive body and query mappings for the request object
//!
//! # Design Decisions
//! - Pattern syntax lives behind `PatternMatcher`; the router never parses patterns
//! - Implementations must be pure and deterministic
//! - `None` from `parse` means "this row does not match", never an error
//! - No regex: the default matcher compares segment by segment

use std::collections::BTreeMap;
use std::fmt::Debug;

/// String-to-string mapping used for params, query and body.
pub type Params = BTreeMap<String, String>;

/// Trait for matching canonical paths against registered patterns.
pub trait PatternMatcher: Send + Sync + Debug {
    /// Returns the parameter mapping if `pattern` accepts `path`.
    fn parse(&self, pattern: &str, path: &str) -> Option<Params>;

    /// Derive the body mapping for a non-GET navigation.
    fn body(&self, parsed: &Params) -> Params {
        parsed.clone()
    }

    /// Derive the query mapping from a route's query-string component.
    fn query(&self, route: &str) -> Params {
        parse_query(route)
    }
}

/// Decode the query-string component of `route` (`+` and `%XX` aware).
///
/// Repeated keys keep their last value.
pub fn parse_query(route: &str) -> Params {
    let Some((_, query)) = route.split_once('?') else {
        return Params::new();
    };

    url::form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

/// Express-style segment matcher.
///
/// - `/users/:id` binds `id` to one segment
/// - a trailing `*` segment accepts the remainder, bound to `*`
/// - a single trailing `/` on either side is ignored
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentMatcher;

impl SegmentMatcher {
    pub fn new() -> Self {
        Self
    }
}

fn segments(path: &str) -> Vec<&str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

impl PatternMatcher for SegmentMatcher {
    fn parse(&self, pattern: &str, path: &str) -> Option<Params> {
        let expected = segments(pattern);
        let actual = segments(path);
        let mut params = Params::new();

        for (index, segment) in expected.iter().enumerate() {
            if *segment == "*" && index + 1 == expected.len() {
                params.insert("*".to_string(), actual.get(index..)?.join("/"));
                return Some(params);
            }

            let value = actual.get(index)?;
            match segment.strip_prefix(':') {
                Some(name) if !name.is_empty() => {
                    if value.is_empty() {
                        return None;
                    }
                    params.insert(name.to_string(), value.to_string());
                }
                _ if segment == value => {}
                _ => return None,
            }
        }

        (expected.len() == actual.len()).then_some(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_match() {
        let m = SegmentMatcher::new();
        assert_eq!(m.parse("/home", "/home"), Some(Params::new()));
        assert_eq!(m.parse("/home", "/home/"), Some(Params::new()));
        assert_eq!(m.parse("/", "/"), Some(Params::new()));
        assert!(m.parse("/home", "/about").is_none());
        assert!(m.parse("/home", "/home/extra").is_none());
        assert!(m.parse("/home/extra", "/home").is_none());
    }

    #[test]
    fn test_named_params() {
        let m = SegmentMatcher::new();
        let params = m.parse("/users/:id/posts/:post", "/users/42/posts/7").unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("42"));
        assert_eq!(params.get("post").map(String::as_str), Some("7"));
        assert!(m.parse("/users/:id", "/users//").is_none());
    }

    #[test]
    fn test_wildcard_tail() {
        let m = SegmentMatcher::new();
        let params = m.parse("/files/*", "/files/a/b/c.txt").unwrap();
        assert_eq!(params.get("*").map(String::as_str), Some("a/b/c.txt"));
        let params = m.parse("/files/*", "/files").unwrap();
        assert_eq!(params.get("*").map(String::as_str), Some(""));
        assert!(m.parse("/files/*", "/other/a").is_none());
    }

    #[test]
    fn test_parse_query() {
        let q = parse_query("/search?q=hello+world&tag=a%26b&empty=");
        assert_eq!(q.get("q").map(String::as_str), Some("hello world"));
        assert_eq!(q.get("tag").map(String::as_str), Some("a&b"));
        assert_eq!(q.get("empty").map(String::as_str), Some(""));
        assert!(parse_query("/search").is_empty());
    }

    #[test]
    fn test_default_body_copies_params() {
        let m = SegmentMatcher::new();
        let parsed = m.parse("/users/:id", "/users/9").unwrap();
        assert_eq!(m.body(&parsed), parsed);
    }
}
