//! Canonical ⇄ wire route conversion.
//!
//! # Responsibilities
//! - Add/remove the virtual root on the way out/in
//! - Encode/decode the `/#` fragment marker in hash mode
//! - Reduce the ambient browser location to a canonical path
//!
//! # Design Decisions
//! - Stateless: every operation reads one `RouterConfig` snapshot
//! - The virtual root is only recognised on a segment boundary, so
//!   `/application` is never mistaken for `/app` + `lication`
//! - `hashify` is idempotent and `de_hashify` inverts it for canonical routes

use crate::config::RouterConfig;
use crate::location::reader::LocationReader;

const HASH_MARKER: &str = "/#";

/// Path codec bound to a configuration snapshot.
#[derive(Debug, Clone, Copy)]
pub struct PathCodec<'a> {
    config: &'a RouterConfig,
}

impl<'a> PathCodec<'a> {
    pub fn new(config: &'a RouterConfig) -> Self {
        Self { config }
    }

    /// Convert a canonical route to its on-the-wire form.
    pub fn hashify(&self, route: &str) -> String {
        let root = self.config.virtual_root.as_str();
        let virtual_root = self.config.is_virtual();

        if self.config.hash_mode && virtual_root {
            let route = self.with_root(route);
            let index = root.len();
            if route.as_bytes().get(index + 1) == Some(&b'#') {
                route
            } else {
                format!("{}{}{}", &route[..index], HASH_MARKER, &route[index..])
            }
        } else if self.config.hash_mode {
            if route.as_bytes().get(1) == Some(&b'#') {
                route.to_string()
            } else {
                format!("{}{}", HASH_MARKER, route)
            }
        } else if virtual_root {
            self.with_root(route)
        } else {
            route.to_string()
        }
    }

    /// Convert a wire route back to its canonical form.
    ///
    /// The virtual root is stripped before the hash marker.
    pub fn de_hashify(&self, route: &str) -> String {
        let mut route = route;
        if self.config.is_virtual() && self.has_root(route) {
            route = &route[self.config.virtual_root.len()..];
        }
        if self.config.hash_mode && route.as_bytes().get(1) == Some(&b'#') {
            route = &route[2..];
        }
        if route.is_empty() {
            "/".to_string()
        } else {
            route.to_string()
        }
    }

    /// Avoid an empty fragment: `/#` becomes `/#/` in hash mode.
    pub fn hash_root(&self, route: &str) -> String {
        if self.config.hash_mode && route.ends_with('#') {
            format!("{}/", route)
        } else {
            route.to_string()
        }
    }

    /// Reduce the active location to a canonical path.
    ///
    /// Hash mode reads the fragment, otherwise the pathname.
    pub fn current_path(&self, location: &dyn LocationReader) -> String {
        if self.config.hash_mode {
            let hash = location.hash();
            let path = hash.strip_prefix('#').unwrap_or(hash.as_str());
            if path.is_empty() {
                "/".to_string()
            } else {
                to_path(path).to_string()
            }
        } else {
            let pathname = location.pathname();
            let mut path = pathname.as_str();
            if self.config.is_virtual() && self.has_root(path) {
                path = &path[self.config.virtual_root.len()..];
            }
            if path.is_empty() {
                "/".to_string()
            } else {
                path.to_string()
            }
        }
    }

    fn has_root(&self, route: &str) -> bool {
        let root = &self.config.virtual_root;
        match route.strip_prefix(root.as_str()) {
            Some(rest) => matches!(rest.chars().next(), None | Some('/' | '#' | '?')),
            None => false,
        }
    }

    fn with_root(&self, route: &str) -> String {
        if self.has_root(route) {
            route.to_string()
        } else {
            format!("{}{}", self.config.virtual_root, route)
        }
    }
}

/// Drop everything from the first `?` onwards.
pub fn to_path(route: &str) -> &str {
    match route.find('?') {
        Some(index) => &route[..index],
        None => route,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::reader::StaticLocation;

    fn config(virtual_root: &str, hash_mode: bool) -> RouterConfig {
        RouterConfig {
            virtual_root: virtual_root.to_string(),
            hash_mode,
            ..RouterConfig::default()
        }
    }

    #[test]
    fn test_hashify_virtual_root_hash_mode() {
        let cfg = config("/app", true);
        let codec = PathCodec::new(&cfg);
        assert_eq!(codec.hashify("/home"), "/app/#/home");
        assert_eq!(codec.de_hashify("/app/#/home"), "/home");
        assert_eq!(codec.hashify("/"), "/app/#/");
        assert_eq!(codec.de_hashify("/app/#/"), "/");
    }

    #[test]
    fn test_hashify_each_mode() {
        let cfg = config("/", true);
        assert_eq!(PathCodec::new(&cfg).hashify("/home"), "/#/home");

        let cfg = config("/app", false);
        assert_eq!(PathCodec::new(&cfg).hashify("/home"), "/app/home");
        assert_eq!(PathCodec::new(&cfg).hashify("/app/home"), "/app/home");

        let cfg = config("/", false);
        assert_eq!(PathCodec::new(&cfg).hashify("/home"), "/home");
    }

    #[test]
    fn test_round_trip_and_idempotence() {
        let routes = ["/", "/home", "/users/5", "/application/settings"];
        for hash_mode in [true, false] {
            for root in ["/", "/app"] {
                let cfg = config(root, hash_mode);
                let codec = PathCodec::new(&cfg);
                for route in routes {
                    let wire = codec.hashify(route);
                    assert_eq!(codec.de_hashify(&wire), route, "{root} hash={hash_mode}");
                    assert_eq!(codec.hashify(&wire), wire, "{root} hash={hash_mode}");
                }
            }
        }
    }

    #[test]
    fn test_virtual_root_requires_segment_boundary() {
        let cfg = config("/app", false);
        let codec = PathCodec::new(&cfg);
        assert_eq!(codec.hashify("/apple"), "/app/apple");
        assert_eq!(codec.de_hashify("/apple"), "/apple");
    }

    #[test]
    fn test_hash_root() {
        let cfg = config("/", true);
        let codec = PathCodec::new(&cfg);
        assert_eq!(codec.hash_root("/#"), "/#/");
        assert_eq!(codec.hash_root("/home"), "/home");

        let cfg = config("/", false);
        assert_eq!(PathCodec::new(&cfg).hash_root("/#"), "/#");
    }

    #[test]
    fn test_to_path() {
        assert_eq!(to_path("/users?page=2"), "/users");
        assert_eq!(to_path("/users"), "/users");
        assert_eq!(to_path("?x=1"), "");
    }

    #[test]
    fn test_current_path() {
        let location = StaticLocation {
            pathname: "/app/users/7".into(),
            hash: "#/orders?page=3".into(),
            search: String::new(),
        };

        let cfg = config("/app", false);
        assert_eq!(PathCodec::new(&cfg).current_path(&location), "/users/7");

        let cfg = config("/app", true);
        assert_eq!(PathCodec::new(&cfg).current_path(&location), "/orders");

        let empty = StaticLocation::default();
        assert_eq!(PathCodec::new(&cfg).current_path(&empty), "/");
        let cfg = config("/", false);
        assert_eq!(PathCodec::new(&cfg).current_path(&empty), "/");
    }
}
