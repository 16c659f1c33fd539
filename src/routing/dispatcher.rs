//! Navigation dispatch.
//!
//! # Responsibilities
//! - Canonicalize the navigated route
//! - Scan a registry snapshot for the first matching `(verb, pattern)`
//! - Build the handler chain (bootstrap + registered, or not-found)
//! - Emit exactly one `MatchResult` per attempt to the sink
//!
//! # Design Decisions
//! - Case-insensitive: path and pattern are lower-cased for comparison only
//! - First match wins even if a later row also accepts the path
//! - No-match is a result, not an error: it travels through the same sink
//! - The sink is swappable at runtime; emission never holds a lock

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::config::RouterConfig;
use crate::location::{to_path, PathCodec};
use crate::observability::metrics;
use crate::routing::handler::{bootstrap, not_found, Handler, Next, Request, Response};
use crate::routing::matcher::{Params, PatternMatcher};
use crate::routing::registry::Route;
use crate::routing::verb::Verb;

/// Outcome of one dispatch attempt.
#[derive(Clone)]
pub struct MatchResult {
    /// Canonical path (virtual root, hash marker and query removed).
    pub route: String,
    pub verb: Verb,
    pub handlers: Vec<Handler>,
    pub matched: bool,
}

impl MatchResult {
    /// Run the handler chain against fresh request/response objects.
    pub fn run(&self) -> (Request, Response) {
        let mut req = Request::default();
        let mut res = Response::default();
        Next::chain(&self.handlers).run(&mut req, &mut res);
        (req, res)
    }
}

impl fmt::Debug for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchResult")
            .field("route", &self.route)
            .field("verb", &self.verb)
            .field("handlers", &self.handlers.len())
            .field("matched", &self.matched)
            .finish()
    }
}

impl Serialize for MatchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("MatchResult", 4)?;
        state.serialize_field("route", &self.route)?;
        state.serialize_field("verb", &self.verb)?;
        state.serialize_field("handlers", &self.handlers.len())?;
        state.serialize_field("matched", &self.matched)?;
        state.end()
    }
}

/// Receiver of dispatch outcomes.
pub trait DispatchSink: Send + Sync {
    fn emit(&self, event: &str, result: MatchResult);
}

impl<F> DispatchSink for F
where
    F: Fn(&str, MatchResult) + Send + Sync,
{
    fn emit(&self, event: &str, result: MatchResult) {
        self(event, result)
    }
}

/// Sink that drops every result.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DispatchSink for NullSink {
    fn emit(&self, event: &str, result: MatchResult) {
        tracing::trace!(event, route = %result.route, "Dispatch result discarded");
    }
}

struct SinkBinding {
    sink: Arc<dyn DispatchSink>,
    event: String,
}

/// Matches navigations against route snapshots and emits the outcome.
pub struct Dispatcher {
    matcher: Arc<dyn PatternMatcher>,
    binding: ArcSwap<SinkBinding>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("matcher", &self.matcher)
            .field("event", &self.binding.load().event)
            .finish()
    }
}

impl Dispatcher {
    pub fn new(
        matcher: Arc<dyn PatternMatcher>,
        sink: Arc<dyn DispatchSink>,
        event: impl Into<String>,
    ) -> Self {
        Self {
            matcher,
            binding: ArcSwap::from_pointee(SinkBinding {
                sink,
                event: event.into(),
            }),
        }
    }

    /// Replace the sink, keeping the current event name unless one is given.
    pub fn set_sink(&self, sink: Arc<dyn DispatchSink>, event: Option<String>) {
        let event = event.unwrap_or_else(|| self.binding.load().event.clone());
        self.binding.store(Arc::new(SinkBinding { sink, event }));
    }

    /// Rename the event handed to the sink.
    pub fn set_event(&self, event: impl Into<String>) {
        let sink = Arc::clone(&self.binding.load().sink);
        self.binding.store(Arc::new(SinkBinding {
            sink,
            event: event.into(),
        }));
    }

    pub fn event(&self) -> String {
        self.binding.load().event.clone()
    }

    /// Dispatch one navigation against `routes`. Returns whether a route matched.
    pub fn dispatch(&self, routes: &[Route], config: &RouterConfig, route: &str, verb: Verb) -> bool {
        let canonical = PathCodec::new(config).de_hashify(route);
        let result = self.resolve(routes, &canonical, verb);
        let matched = result.matched;

        if matched {
            tracing::debug!(route = %result.route, verb = %verb, handlers = result.handlers.len(), "Route matched");
        } else {
            tracing::warn!(route = %result.route, verb = %verb, "No route matched");
        }
        metrics::record_dispatch(matched);

        let binding = self.binding.load_full();
        binding.sink.emit(&binding.event, result);
        matched
    }

    /// Build the result for an already canonical route without emitting it.
    pub fn resolve(&self, routes: &[Route], canonical: &str, verb: Verb) -> MatchResult {
        let path = to_path(canonical).to_string();
        let lowered = path.to_lowercase();

        let found = routes
            .iter()
            .filter(|r| r.verb == verb)
            .find_map(|r| {
                self.matcher
                    .parse(&r.pattern.to_lowercase(), &lowered)
                    .map(|params| (r, params))
            });

        match found {
            Some((entry, params)) => {
                let body = if verb == Verb::Get {
                    Params::new()
                } else {
                    self.matcher.body(&params)
                };
                let query = self.matcher.query(canonical);

                let mut handlers = Vec::with_capacity(entry.handlers.len() + 1);
                handlers.push(bootstrap(params, query, body, path.clone()));
                handlers.extend(entry.handlers.iter().cloned());

                MatchResult {
                    route: path,
                    verb,
                    handlers,
                    matched: true,
                }
            }
            None => MatchResult {
                handlers: vec![not_found(path.clone())],
                route: path,
                verb,
                matched: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::handler::{handler, STATUS_NOT_FOUND, STATUS_OK};
    use crate::routing::matcher::SegmentMatcher;
    use crate::routing::registry::RouteRegistry;
    use std::sync::Mutex;

    type Captured = Arc<Mutex<Vec<(String, MatchResult)>>>;

    fn dispatcher() -> (Dispatcher, Captured) {
        let captured: Captured = Arc::new(Mutex::new(Vec::new()));
        let sink = captured.clone();
        let dispatcher = Dispatcher::new(
            Arc::new(SegmentMatcher::new()),
            Arc::new(move |event: &str, result: MatchResult| {
                sink.lock().unwrap().push((event.to_string(), result));
            }),
            "test.dispatch",
        );
        (dispatcher, captured)
    }

    fn tagged(tag: u16) -> Vec<Handler> {
        vec![handler(move |req, res, next| {
            res.status_code = tag;
            next.run(req, res);
        })]
    }

    #[test]
    fn test_match_prepends_bootstrap() {
        let (dispatcher, captured) = dispatcher();
        let registry = RouteRegistry::new();
        registry.add(Verb::Get, "/users/:id", tagged(201));

        let config = RouterConfig::default();
        assert!(dispatcher.dispatch(&registry.snapshot(), &config, "/users/42", Verb::Get));

        let captured = captured.lock().unwrap();
        assert_eq!(captured.len(), 1);
        let (event, result) = &captured[0];
        assert_eq!(event, "test.dispatch");
        assert!(result.matched);
        assert_eq!(result.route, "/users/42");
        assert_eq!(result.handlers.len(), 2);

        let (req, res) = result.run();
        assert_eq!(req.params.get("id").map(String::as_str), Some("42"));
        assert_eq!(req.route, "/users/42");
        assert_eq!(res.status_code, 201);
    }

    #[test]
    fn test_case_insensitive_match() {
        let (dispatcher, _) = dispatcher();
        let registry = RouteRegistry::new();
        registry.add(Verb::Get, "/Users/:id", tagged(STATUS_OK));

        let result = dispatcher.resolve(&registry.snapshot(), "/USERS/5", Verb::Get);
        assert!(result.matched);
        // Stored pattern keeps its case.
        assert_eq!(registry.snapshot()[0].pattern, "/Users/:id");
    }

    #[test]
    fn test_first_match_wins() {
        let (dispatcher, _) = dispatcher();
        let registry = RouteRegistry::new();
        registry.add(Verb::Get, "/files/*", tagged(1));
        registry.add(Verb::Get, "/files/:name", tagged(2));

        let result = dispatcher.resolve(&registry.snapshot(), "/files/readme", Verb::Get);
        let (_, res) = result.run();
        assert_eq!(res.status_code, 1);
    }

    #[test]
    fn test_verb_must_match() {
        let (dispatcher, _) = dispatcher();
        let registry = RouteRegistry::new();
        registry.add(Verb::Post, "/users", tagged(STATUS_OK));

        let result = dispatcher.resolve(&registry.snapshot(), "/users", Verb::Get);
        assert!(!result.matched);
    }

    #[test]
    fn test_not_found_result() {
        let (dispatcher, captured) = dispatcher();
        let config = RouterConfig::default();
        assert!(!dispatcher.dispatch(&[], &config, "/nowhere?x=1", Verb::Delete));

        let captured = captured.lock().unwrap();
        assert_eq!(captured.len(), 1);
        let result = &captured[0].1;
        assert!(!result.matched);
        assert_eq!(result.route, "/nowhere");
        assert_eq!(result.handlers.len(), 1);
        assert_eq!(result.run().1.status_code, STATUS_NOT_FOUND);
    }

    #[test]
    fn test_query_and_body() {
        let (dispatcher, _) = dispatcher();
        let registry = RouteRegistry::new();
        registry.add(Verb::Get, "/search", tagged(STATUS_OK));
        registry.add(Verb::Put, "/users/:id", tagged(STATUS_OK));

        let (req, _) = dispatcher
            .resolve(&registry.snapshot(), "/search?q=rust+router", Verb::Get)
            .run();
        assert_eq!(req.route, "/search");
        assert_eq!(req.query.get("q").map(String::as_str), Some("rust router"));
        assert!(req.body.is_empty());

        let (req, _) = dispatcher
            .resolve(&registry.snapshot(), "/users/3", Verb::Put)
            .run();
        assert_eq!(req.body.get("id").map(String::as_str), Some("3"));
    }

    #[test]
    fn test_dispatch_strips_wire_form() {
        let (dispatcher, captured) = dispatcher();
        let registry = RouteRegistry::new();
        registry.add(Verb::Get, "/home", tagged(STATUS_OK));

        let config = RouterConfig {
            virtual_root: "/app".into(),
            hash_mode: true,
            ..RouterConfig::default()
        };
        assert!(dispatcher.dispatch(&registry.snapshot(), &config, "/app/#/home", Verb::Get));
        assert_eq!(captured.lock().unwrap()[0].1.route, "/home");
    }

    #[test]
    fn test_set_sink_and_event() {
        let (dispatcher, first) = dispatcher();
        dispatcher.set_event("renamed");
        dispatcher.dispatch(&[], &RouterConfig::default(), "/", Verb::Get);
        assert_eq!(first.lock().unwrap()[0].0, "renamed");

        let second: Captured = Arc::new(Mutex::new(Vec::new()));
        let sink = second.clone();
        dispatcher.set_sink(
            Arc::new(move |event: &str, result: MatchResult| {
                sink.lock().unwrap().push((event.to_string(), result));
            }),
            None,
        );
        dispatcher.dispatch(&[], &RouterConfig::default(), "/", Verb::Get);
        assert_eq!(first.lock().unwrap().len(), 1);
        assert_eq!(second.lock().unwrap()[0].0, "renamed");
    }
}
