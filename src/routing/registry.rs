//! Route registration and lookup table.
//!
//! # Responsibilities
//! - Store registered routes in insertion order
//! - Reject exact `(verb, pattern)` duplicates
//! - Hand out immutable snapshots for dispatch
//!
//! # Design Decisions
//! - Copy-on-write behind `ArcSwap`: a dispatch scans a snapshot, so a
//!   registration made from inside a sink or handler never shows up mid-scan
//! - Storage is case-preserving; case folding happens at dispatch time
//! - Removal of an absent route is a no-op, not an error

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::routing::handler::Handler;
use crate::routing::verb::Verb;

/// A registered route.
#[derive(Clone)]
pub struct Route {
    pub verb: Verb,
    pub pattern: String,
    pub handlers: Vec<Handler>,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("verb", &self.verb)
            .field("pattern", &self.pattern)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl Route {
    fn is(&self, verb: Verb, pattern: &str) -> bool {
        self.verb == verb && self.pattern == pattern
    }
}

/// Ordered route table; order is match priority.
#[derive(Default)]
pub struct RouteRegistry {
    routes: ArcSwap<Vec<Route>>,
}

impl fmt::Debug for RouteRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.routes.load().iter()).finish()
    }
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route unless `(verb, pattern)` is already registered.
    ///
    /// Returns whether the route was added.
    pub fn add(&self, verb: Verb, pattern: impl Into<String>, handlers: Vec<Handler>) -> bool {
        let pattern = pattern.into();
        let mut added = false;

        self.routes.rcu(|current| {
            if current.iter().any(|r| r.is(verb, &pattern)) {
                added = false;
                return Arc::clone(current);
            }
            added = true;
            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend(current.iter().cloned());
            next.push(Route {
                verb,
                pattern: pattern.clone(),
                handlers: handlers.clone(),
            });
            Arc::new(next)
        });

        added
    }

    /// Remove the first route registered under exactly `(verb, pattern)`.
    ///
    /// Returns whether a route was removed.
    pub fn remove(&self, verb: Verb, pattern: &str) -> bool {
        let mut removed = false;

        self.routes.rcu(|current| match current.iter().position(|r| r.is(verb, pattern)) {
            Some(index) => {
                removed = true;
                let mut next = Vec::clone(current);
                next.remove(index);
                Arc::new(next)
            }
            None => {
                removed = false;
                Arc::clone(current)
            }
        });

        removed
    }

    /// Remove every route. Returns how many were dropped.
    pub fn remove_all(&self) -> usize {
        self.routes.swap(Arc::new(Vec::new())).len()
    }

    /// Whether `(verb, pattern)` is registered (exact, case-sensitive).
    pub fn contains(&self, verb: Verb, pattern: &str) -> bool {
        self.routes.load().iter().any(|r| r.is(verb, pattern))
    }

    /// Immutable view of the table at this instant.
    pub fn snapshot(&self) -> Arc<Vec<Route>> {
        self.routes.load_full()
    }

    pub fn len(&self) -> usize {
        self.routes.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::handler::handler;

    fn noop() -> Vec<Handler> {
        vec![handler(|req, res, next| next.run(req, res))]
    }

    #[test]
    fn test_add_rejects_exact_duplicate() {
        let registry = RouteRegistry::new();
        assert!(registry.add(Verb::Get, "/users", noop()));
        assert!(!registry.add(Verb::Get, "/users", noop()));
        assert!(registry.add(Verb::Post, "/users", noop()));
        assert!(registry.add(Verb::Get, "/Users", noop()));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let registry = RouteRegistry::new();
        registry.add(Verb::Get, "/b", noop());
        registry.add(Verb::Get, "/a", noop());
        registry.add(Verb::Put, "/c", noop());

        let patterns: Vec<_> = registry.snapshot().iter().map(|r| r.pattern.clone()).collect();
        assert_eq!(patterns, vec!["/b", "/a", "/c"]);
    }

    #[test]
    fn test_remove() {
        let registry = RouteRegistry::new();
        registry.add(Verb::Get, "/a", noop());
        registry.add(Verb::Post, "/a", noop());

        assert!(registry.remove(Verb::Get, "/a"));
        assert!(!registry.contains(Verb::Get, "/a"));
        assert!(registry.contains(Verb::Post, "/a"));

        // Absent routes are a silent no-op.
        assert!(!registry.remove(Verb::Get, "/a"));
        assert!(!registry.remove(Verb::Delete, "/nothing"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_all() {
        let registry = RouteRegistry::new();
        registry.add(Verb::Get, "/a", noop());
        registry.add(Verb::Get, "/b", noop());
        registry.add(Verb::Get, "/c", noop());

        assert_eq!(registry.remove_all(), 3);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_snapshot_is_isolated_from_mutation() {
        let registry = RouteRegistry::new();
        registry.add(Verb::Get, "/a", noop());

        let snapshot = registry.snapshot();
        registry.add(Verb::Get, "/b", noop());
        registry.remove(Verb::Get, "/a");

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].pattern, "/a");
        assert_eq!(registry.snapshot()[0].pattern, "/b");
    }
}
