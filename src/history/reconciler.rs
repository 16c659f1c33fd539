//! History state reconciliation.
//!
//! # States
//! - Idle: nothing staged, no pending push
//! - Staged: a programmatic navigation is staged, `pending_push` set
//! - Popped: the browser moved through history, `pending_push` cleared
//!
//! # Transitions
//! ```text
//! stage(state)      → Staged   (every programmatic navigation)
//! commit()          → push hashified staged route if pending_push
//! on_pop(Some(s))   → Popped   (flag cleared, s re-dispatched)
//! on_pop(None)      → no-op    (entry the router did not create)
//! end()             → Idle
//! ```
//!
//! # Design Decisions
//! - The flag is what stops back/forward from growing the stack: a popped
//!   navigation re-enters dispatch with the flag already cleared
//! - History reflects intent: commit runs before the dispatch result
//! - Touch clients re-dispatch after `pop_delay_ms` so the platform's
//!   native back gesture finishes first

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use arc_swap::ArcSwap;

use crate::config::RouterConfig;
use crate::history::state::{NavigationState, PopEvent};
use crate::history::store::{SessionHistory, SubscriptionId};
use crate::lifecycle::Timer;
use crate::location::PathCodec;
use crate::observability::metrics;

/// Re-entry point into dispatch for a reconciled state.
pub type Redispatch = Arc<dyn Fn(NavigationState) + Send + Sync>;

#[derive(Default)]
struct ReconcilerState {
    staged: Option<NavigationState>,
    pending_push: bool,
    subscription: Option<SubscriptionId>,
    redispatch: Option<Redispatch>,
}

/// Keeps session history and the current route consistent.
pub struct HistoryReconciler {
    store: Arc<dyn SessionHistory>,
    config: Arc<ArcSwap<RouterConfig>>,
    timer: Arc<dyn Timer>,
    state: Mutex<ReconcilerState>,
}

impl HistoryReconciler {
    pub fn new(
        store: Arc<dyn SessionHistory>,
        config: Arc<ArcSwap<RouterConfig>>,
        timer: Arc<dyn Timer>,
    ) -> Self {
        Self {
            store,
            config,
            timer,
            state: Mutex::new(ReconcilerState::default()),
        }
    }

    /// Record `state` as the pending history entry.
    pub fn stage(&self, state: NavigationState) {
        let mut inner = self.lock();
        inner.staged = Some(state);
        inner.pending_push = true;
    }

    /// Push the staged state if a push is pending. Returns whether it pushed.
    ///
    /// The staged route is replaced by its wire form, which is also the
    /// entry's URL.
    pub fn commit(&self) -> bool {
        let config = self.config.load();
        let entry = {
            let mut inner = self.lock();
            if !inner.pending_push {
                return false;
            }
            let Some(staged) = inner.staged.as_mut() else {
                return false;
            };
            staged.route = PathCodec::new(&config).hashify(&staged.route);
            staged.clone()
        };

        let url = entry.route.clone();
        tracing::debug!(url = %url, verb = %entry.verb, "Pushing history entry");
        self.store.push_entry(entry, "", &url);
        metrics::record_history_push();
        true
    }

    /// Handle a back/forward notification.
    pub fn on_pop(&self, event: PopEvent) {
        let Some(state) = event.state else {
            tracing::trace!("Pop without state payload ignored");
            return;
        };

        let redispatch = {
            let mut inner = self.lock();
            inner.pending_push = false;
            inner.redispatch.clone()
        };
        let Some(redispatch) = redispatch else {
            return;
        };

        metrics::record_history_pop();
        let config = self.config.load();
        tracing::debug!(route = %state.route, verb = %state.verb, touch = config.touch, "History pop");

        if config.touch {
            let delay = Duration::from_millis(config.pop_delay_ms);
            self.timer.schedule(delay, Box::new(move || redispatch(state)));
        } else {
            redispatch(state);
        }
    }

    /// Stage and dispatch the initial state, then follow pop notifications.
    pub fn start(self: &Arc<Self>, initial: NavigationState, redispatch: Redispatch) {
        {
            let mut inner = self.lock();
            inner.staged = Some(initial.clone());
            inner.pending_push = true;
            inner.redispatch = Some(Arc::clone(&redispatch));
        }

        redispatch(initial);

        let weak: Weak<Self> = Arc::downgrade(self);
        let id = self.store.subscribe(Arc::new(move |event| {
            if let Some(reconciler) = weak.upgrade() {
                reconciler.on_pop(event);
            }
        }));

        let previous = self.lock().subscription.replace(id);
        if let Some(previous) = previous {
            self.store.unsubscribe(previous);
        }
    }

    /// Clear all state and stop following pop notifications.
    pub fn end(&self) {
        let subscription = {
            let mut inner = self.lock();
            inner.staged = None;
            inner.pending_push = false;
            inner.redispatch = None;
            inner.subscription.take()
        };
        if let Some(id) = subscription {
            self.store.unsubscribe(id);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.lock().pending_push
    }

    pub fn staged(&self) -> Option<NavigationState> {
        self.lock().staged.clone()
    }

    fn lock(&self) -> MutexGuard<'_, ReconcilerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
