//! Router facade.
//!
//! # Data Flow
//! ```text
//! register(verb, pattern, handlers)
//!     → verb check (unsupported = silently dropped)
//!     → RouteRegistry add (duplicate = rejected, journaled in debug mode)
//!
//! navigate(route, verb, params, delay)
//!     → sanitize → hash_root
//!     → HistoryReconciler stage
//!     → [timer delay]
//!     → commit pending history entry → Dispatcher → sink
//!
//! dispatch(route, verb)
//!     → Dispatcher → sink (session history untouched)
//!
//! start / pause / resume / end
//!     → lifecycle transitions (history, input listener, debug journal)
//! ```
//!
//! # Design Decisions
//! - An explicit `Router` value owns all state; clones share it
//! - Collaborators (history store, location, listener, timer, sink,
//!   matcher) are injected through `RouterBuilder`
//! - Nothing here returns an error for runtime conditions; the worst
//!   outcome is a dropped registration or a not-found dispatch
//! - No lock is held while calling a collaborator, so handlers and sinks
//!   may call back into the router

pub mod listener;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use arc_swap::ArcSwap;
use uuid::Uuid;

use crate::config::validation::{validate_router, ValidationError};
use crate::config::{ListenerBindings, ListenerOptions, RouterConfig, Settings};
use crate::history::{HistoryReconciler, MemoryHistory, NavigationState, SessionHistory};
use crate::lifecycle::{Lifecycle, Timer, TokioTimer};
use crate::location::{sanitize, LocationReader, PathCodec};
use crate::observability::{metrics, DebugJournal};
use crate::routing::{
    parse_query, DispatchSink, Dispatcher, Handler, NullSink, Params, PatternMatcher, Route,
    RouteRegistry, SegmentMatcher, Verb,
};

pub use listener::{InputListener, NoopListener, Trigger, TriggerListener};

struct Inner {
    config: Arc<ArcSwap<RouterConfig>>,
    bindings: Mutex<ListenerBindings>,
    lifecycle: Mutex<Lifecycle>,
    registry: RouteRegistry,
    dispatcher: Dispatcher,
    history: Arc<HistoryReconciler>,
    store: Arc<dyn SessionHistory>,
    location: Arc<dyn LocationReader>,
    listener: Arc<dyn InputListener>,
    timer: Arc<dyn Timer>,
    journal: DebugJournal,
}

/// Client-side request router.
#[derive(Clone)]
pub struct Router {
    inner: Arc<Inner>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("config", &self.config())
            .field("lifecycle", &self.lifecycle())
            .field("routes", &self.inner.registry)
            .finish()
    }
}

/// Navigation entry point handed to input listeners.
///
/// Holds the router weakly so a bound listener does not keep it alive.
#[derive(Clone)]
pub struct NavigationEntry {
    router: Weak<Inner>,
}

impl fmt::Debug for NavigationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationEntry")
            .field("alive", &(self.router.strong_count() > 0))
            .finish()
    }
}

impl NavigationEntry {
    fn upgrade(&self) -> Option<Router> {
        self.router.upgrade().map(|inner| Router { inner })
    }

    /// Navigate immediately. Returns false if the router is gone or disabled.
    pub fn navigate(&self, route: &str, verb: Verb) -> bool {
        self.upgrade()
            .map(|router| router.navigate(route, verb, None, None))
            .unwrap_or(false)
    }

    /// Step one entry back in session history.
    pub fn back(&self) -> bool {
        match self.upgrade() {
            Some(router) => {
                router.go_history(None, None);
                true
            }
            None => false,
        }
    }
}

/// Builder wiring a [`Router`] to its collaborators.
pub struct RouterBuilder {
    config: RouterConfig,
    bindings: ListenerBindings,
    matcher: Arc<dyn PatternMatcher>,
    sink: Arc<dyn DispatchSink>,
    store: Option<Arc<dyn SessionHistory>>,
    location: Option<Arc<dyn LocationReader>>,
    listener: Arc<dyn InputListener>,
    timer: Arc<dyn Timer>,
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self {
            config: RouterConfig::default(),
            bindings: ListenerBindings::default(),
            matcher: Arc::new(SegmentMatcher::new()),
            sink: Arc::new(NullSink),
            store: None,
            location: None,
            listener: Arc::new(NoopListener),
            timer: Arc::new(TokioTimer),
        }
    }
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take router and listener sections from loaded settings.
    pub fn settings(mut self, settings: &Settings) -> Self {
        self.config = settings.router.clone();
        self.bindings = settings.listener.clone();
        self
    }

    pub fn config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn bindings(mut self, bindings: ListenerBindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn matcher(mut self, matcher: Arc<dyn PatternMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn sink(mut self, sink: Arc<dyn DispatchSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn history(mut self, store: Arc<dyn SessionHistory>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn location(mut self, location: Arc<dyn LocationReader>) -> Self {
        self.location = Some(location);
        self
    }

    /// Use one in-memory stack as both session history and location.
    pub fn memory_history(self, history: Arc<MemoryHistory>) -> Self {
        self.history(history.clone()).location(history)
    }

    pub fn listener(mut self, listener: Arc<dyn InputListener>) -> Self {
        self.listener = listener;
        self
    }

    pub fn timer(mut self, timer: Arc<dyn Timer>) -> Self {
        self.timer = timer;
        self
    }

    pub fn build(self) -> Router {
        let memory = Arc::new(MemoryHistory::new("/"));
        let store: Arc<dyn SessionHistory> = match self.store {
            Some(store) => store,
            None => memory.clone(),
        };
        let location: Arc<dyn LocationReader> = match self.location {
            Some(location) => location,
            None => memory,
        };

        let mut config = self.config;
        config.enabled = false;
        let config = Arc::new(ArcSwap::from_pointee(config));

        let history = Arc::new(HistoryReconciler::new(
            Arc::clone(&store),
            Arc::clone(&config),
            Arc::clone(&self.timer),
        ));
        let dispatcher = Dispatcher::new(self.matcher, self.sink, self.bindings.dispatch_event.clone());

        Router {
            inner: Arc::new(Inner {
                config,
                bindings: Mutex::new(self.bindings),
                lifecycle: Mutex::new(Lifecycle::Stopped),
                registry: RouteRegistry::new(),
                dispatcher,
                history,
                store,
                location,
                listener: self.listener,
                timer: self.timer,
                journal: DebugJournal::new(),
            }),
        }
    }
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    // ---- registration -------------------------------------------------

    /// Register `handlers` under `(verb, pattern)`.
    ///
    /// Unsupported verbs are dropped silently; a missing pattern means `/`.
    /// Returns whether a route was added.
    pub fn register(&self, verb: &str, pattern: Option<&str>, handlers: Vec<Handler>) -> bool {
        let Ok(verb) = verb.parse::<Verb>() else {
            return false;
        };
        self.add_route(verb, pattern.unwrap_or("/"), handlers)
    }

    pub fn get(&self, pattern: &str, handlers: Vec<Handler>) -> bool {
        self.add_route(Verb::Get, pattern, handlers)
    }

    pub fn post(&self, pattern: &str, handlers: Vec<Handler>) -> bool {
        self.add_route(Verb::Post, pattern, handlers)
    }

    pub fn put(&self, pattern: &str, handlers: Vec<Handler>) -> bool {
        self.add_route(Verb::Put, pattern, handlers)
    }

    pub fn delete(&self, pattern: &str, handlers: Vec<Handler>) -> bool {
        self.add_route(Verb::Delete, pattern, handlers)
    }

    fn add_route(&self, verb: Verb, pattern: &str, handlers: Vec<Handler>) -> bool {
        let added = self.inner.registry.add(verb, pattern, handlers);
        let message = if added {
            format!("route: {} has been added. Method: {}", pattern, verb)
        } else {
            format!("route: {} is already registered. Method: {}", pattern, verb)
        };
        self.journal(message);
        metrics::record_routes(self.inner.registry.len());
        added
    }

    /// Remove `(verb, pattern)`. No-op unless the router is enabled.
    pub fn unregister(&self, pattern: &str, verb: &str) -> bool {
        if !self.is_enabled() {
            return false;
        }
        let Ok(verb) = verb.parse::<Verb>() else {
            return false;
        };
        let removed = self.inner.registry.remove(verb, pattern);
        if removed {
            self.journal(format!("route: {} has been removed", pattern));
            metrics::record_routes(self.inner.registry.len());
        }
        removed
    }

    /// Remove every route. No-op unless the router is enabled.
    pub fn unregister_all(&self) -> usize {
        if !self.is_enabled() {
            return 0;
        }
        let removed = self.inner.registry.remove_all();
        self.journal(format!("{} routes have been removed", removed));
        metrics::record_routes(0);
        removed
    }

    /// Snapshot of the route table in priority order.
    pub fn routes(&self) -> Arc<Vec<Route>> {
        self.inner.registry.snapshot()
    }

    // ---- navigation ---------------------------------------------------

    /// Navigate to `route`.
    ///
    /// Stages the navigation in history, then commits and dispatches now or
    /// after `delay`. Delayed navigations are never cancelled. Returns false
    /// if the router is not enabled.
    pub fn navigate(&self, route: &str, verb: Verb, params: Option<Params>, delay: Option<Duration>) -> bool {
        if !self.is_enabled() {
            return false;
        }

        let config = self.config();
        let route = PathCodec::new(&config).hash_root(&sanitize(route));
        let params = params.unwrap_or_default();
        self.inner
            .history
            .stage(NavigationState::new(route.clone(), verb, params));

        match delay {
            Some(delay) => {
                tracing::debug!(route = %route, verb = %verb, delay_ms = delay.as_millis() as u64, "Navigation deferred");
                let router = self.clone();
                self.inner.timer.schedule(
                    delay,
                    Box::new(move || {
                        router.commit_and_dispatch(&route, verb);
                    }),
                );
            }
            None => {
                self.commit_and_dispatch(&route, verb);
            }
        }
        true
    }

    /// Match `route` and emit the result to the sink.
    ///
    /// Session history is left untouched. Returns whether a registered route
    /// matched. Exactly one result is emitted to the sink either way.
    pub fn dispatch(&self, route: &str, verb: Verb) -> bool {
        let span = tracing::info_span!("navigation", navigation_id = %Uuid::new_v4(), route = %route, verb = %verb);
        let _guard = span.enter();
        self.emit(route, verb)
    }

    /// Push the pending history entry, if any, then dispatch.
    ///
    /// Used by programmatic navigation and by history re-dispatch.
    pub(crate) fn commit_and_dispatch(&self, route: &str, verb: Verb) -> bool {
        let span = tracing::info_span!("navigation", navigation_id = %Uuid::new_v4(), route = %route, verb = %verb);
        let _guard = span.enter();
        self.inner.history.commit();
        self.emit(route, verb)
    }

    fn emit(&self, route: &str, verb: Verb) -> bool {
        let config = self.config();
        let routes = self.inner.registry.snapshot();
        self.inner.dispatcher.dispatch(&routes, &config, route, verb)
    }

    /// Step through session history: back one entry, or `steps` entries.
    pub fn go_history(&self, steps: Option<i64>, delay: Option<Duration>) {
        let store = Arc::clone(&self.inner.store);
        let step = move || match steps {
            Some(n) => store.go(n),
            None => store.back(),
        };

        match delay {
            Some(delay) => self.inner.timer.schedule(delay, Box::new(step)),
            None => step(),
        }
    }

    // ---- lifecycle ----------------------------------------------------

    /// Start routing: dispatch the current location and bind listeners.
    ///
    /// No-op while running. A paused router is resumed instead of started
    /// again: history is not restarted and the current location is not
    /// dispatched a second time. Only a stopped router (new or after `end`)
    /// runs the full start sequence.
    pub fn start(&self) -> bool {
        match self.lifecycle() {
            Lifecycle::Running => return false,
            Lifecycle::Paused => {
                self.resume();
                return true;
            }
            Lifecycle::Stopped => {}
        }

        self.set_lifecycle(Lifecycle::Running);
        self.set_enabled(true);

        let config = self.config();
        let route = PathCodec::new(&config).current_path(self.inner.location.as_ref());
        let params = parse_query(&self.inner.location.search());
        tracing::info!(route = %route, hash_mode = config.hash_mode, virtual_root = %config.virtual_root, "Router starting");

        let weak = Arc::downgrade(&self.inner);
        self.inner.history.start(
            NavigationState::new(route, Verb::Get, params),
            Arc::new(move |state: NavigationState| {
                if let Some(inner) = weak.upgrade() {
                    Router { inner }.commit_and_dispatch(&state.route, state.verb);
                }
            }),
        );

        self.bind_listener();

        if config.debug {
            tracing::info!(target: "hashroute::debug", "Router has started in debug mode");
            self.inner.journal.flush();
        }
        true
    }

    /// Stop reacting to input; routes and history are kept.
    pub fn pause(&self) {
        if self.lifecycle() != Lifecycle::Running {
            return;
        }
        self.set_lifecycle(Lifecycle::Paused);
        self.set_enabled(false);
        self.inner.listener.off();
        tracing::info!("Router paused");
    }

    /// Re-enable a paused router.
    pub fn resume(&self) {
        if self.lifecycle() != Lifecycle::Paused {
            return;
        }
        self.set_lifecycle(Lifecycle::Running);
        self.set_enabled(true);
        self.bind_listener();
        if self.config().debug {
            self.inner.journal.flush();
        }
        tracing::info!("Router resumed");
    }

    /// Hard reset: disable, clear routes, end history, unbind listeners.
    pub fn end(&self) {
        self.set_lifecycle(Lifecycle::Stopped);
        self.set_enabled(false);
        let removed = self.inner.registry.remove_all();
        self.inner.history.end();
        self.inner.listener.off();
        metrics::record_routes(0);
        tracing::info!(routes_removed = removed, "Router ended");
    }

    pub fn lifecycle(&self) -> Lifecycle {
        *lock(&self.inner.lifecycle)
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.config.load().enabled
    }

    // ---- configuration ------------------------------------------------

    /// Snapshot of the runtime configuration.
    pub fn config(&self) -> RouterConfig {
        RouterConfig::clone(&self.inner.config.load())
    }

    /// Replace the runtime configuration; `enabled` is left as is.
    pub fn set_config(&self, config: RouterConfig) -> Result<(), Vec<ValidationError>> {
        validate_router(&config)?;
        self.inner.config.rcu(|current| {
            let mut next = config.clone();
            next.enabled = current.enabled;
            next
        });
        tracing::info!(virtual_root = %config.virtual_root, hash_mode = config.hash_mode, "Router configuration updated");
        Ok(())
    }

    pub fn bindings(&self) -> ListenerBindings {
        lock(&self.inner.bindings).clone()
    }

    /// Rebind listener events/selectors and the dispatch event name.
    pub fn configure(&self, opts: ListenerOptions) {
        let event = opts.dispatch_event.clone();
        lock(&self.inner.bindings).apply(opts);
        if let Some(event) = event {
            self.inner.dispatcher.set_event(event);
        }

        if self.lifecycle() == Lifecycle::Running {
            let bindings = self.bindings();
            self.inner.listener.reset(&bindings, self.entry());
        }
    }

    /// Replace the dispatch sink and optionally the dispatch event name.
    pub fn set_sink(&self, sink: Arc<dyn DispatchSink>, event: Option<String>) {
        if let Some(event) = &event {
            lock(&self.inner.bindings).dispatch_event = event.clone();
        }
        self.inner.dispatcher.set_sink(sink, event);
    }

    /// Entry point for input listeners.
    pub fn entry(&self) -> NavigationEntry {
        NavigationEntry {
            router: Arc::downgrade(&self.inner),
        }
    }

    /// The history reconciler (exposed for hosts wiring their own pop source).
    pub fn history(&self) -> &Arc<HistoryReconciler> {
        &self.inner.history
    }

    /// Debug messages waiting for `start` to flush them.
    pub fn debug_backlog(&self) -> usize {
        self.inner.journal.pending()
    }

    fn bind_listener(&self) {
        let bindings = self.bindings();
        self.inner.listener.on(&bindings, self.entry());
    }

    fn journal(&self, message: String) {
        let config = self.inner.config.load();
        self.inner.journal.record(config.debug, config.enabled, message);
    }

    fn set_enabled(&self, enabled: bool) {
        self.inner.config.rcu(|current| {
            let mut next = RouterConfig::clone(current);
            next.enabled = enabled;
            next
        });
    }

    fn set_lifecycle(&self, lifecycle: Lifecycle) {
        *lock(&self.inner.lifecycle) = lifecycle;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
