//! Session-history store.
//!
//! # Responsibilities
//! - Push entries carrying a `NavigationState` payload
//! - Step back/forward through the stack
//! - Notify subscribers with the payload of the entry stepped onto
//!
//! # Design Decisions
//! - Browser bindings wrap `window.history` + `popstate`; `MemoryHistory`
//!   reproduces the same stack semantics in-process
//! - Pushing truncates any forward entries, as browsers do
//! - Subscribers are called after the store lock is released

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::history::state::{NavigationState, PopEvent};
use crate::location::{LocationReader, StaticLocation};

/// Callback invoked for every pop notification.
pub type PopListener = Arc<dyn Fn(PopEvent) + Send + Sync>;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The browser's session-history stack.
pub trait SessionHistory: Send + Sync {
    /// Push a new entry; `url` is the wire form of the route.
    fn push_entry(&self, state: NavigationState, title: &str, url: &str);

    /// Step one entry back.
    fn back(&self);

    /// Step `steps` entries (negative = back).
    fn go(&self, steps: i64);

    fn subscribe(&self, listener: PopListener) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId);
}

/// A single session-history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub state: Option<NavigationState>,
    pub title: String,
    pub url: String,
}

struct Inner {
    entries: Vec<HistoryEntry>,
    index: usize,
    listeners: Vec<(SubscriptionId, PopListener)>,
    next_id: u64,
}

/// In-memory session history; also serves as the ambient location.
pub struct MemoryHistory {
    inner: Mutex<Inner>,
}

impl fmt::Debug for MemoryHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("MemoryHistory")
            .field("entries", &inner.entries)
            .field("index", &inner.index)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl MemoryHistory {
    /// Create a stack holding one landing entry without state.
    pub fn new(initial_url: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: vec![HistoryEntry {
                    state: None,
                    title: String::new(),
                    url: initial_url.into(),
                }],
                index: 0,
                listeners: Vec::new(),
                next_id: 0,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Position of the current entry.
    pub fn index(&self) -> usize {
        self.lock().index
    }

    pub fn current(&self) -> Option<HistoryEntry> {
        let inner = self.lock();
        inner.entries.get(inner.index).cloned()
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.lock().entries.clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn current_location(&self) -> StaticLocation {
        let url = self.current().map(|e| e.url).unwrap_or_else(|| "/".to_string());
        StaticLocation::from_href(&url)
    }
}

impl SessionHistory for MemoryHistory {
    fn push_entry(&self, state: NavigationState, title: &str, url: &str) {
        let mut inner = self.lock();
        let keep = inner.index + 1;
        inner.entries.truncate(keep);
        inner.entries.push(HistoryEntry {
            state: Some(state),
            title: title.to_string(),
            url: url.to_string(),
        });
        inner.index = inner.entries.len() - 1;
        tracing::trace!(url, depth = inner.entries.len(), "History entry pushed");
    }

    fn back(&self) {
        self.go(-1);
    }

    fn go(&self, steps: i64) {
        let (event, listeners) = {
            let mut inner = self.lock();
            let target = inner.index as i64 + steps;
            if steps == 0 || target < 0 || target >= inner.entries.len() as i64 {
                tracing::trace!(steps, index = inner.index, "History step out of range, ignored");
                return;
            }
            inner.index = target as usize;
            let event = PopEvent {
                state: inner.entries[inner.index].state.clone(),
            };
            let listeners: Vec<_> = inner.listeners.iter().map(|(_, l)| Arc::clone(l)).collect();
            (event, listeners)
        };

        for listener in listeners {
            listener(event.clone());
        }
    }

    fn subscribe(&self, listener: PopListener) -> SubscriptionId {
        let mut inner = self.lock();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.lock().listeners.retain(|(sid, _)| *sid != id);
    }
}

impl LocationReader for MemoryHistory {
    fn pathname(&self) -> String {
        self.current_location().pathname
    }

    fn hash(&self) -> String {
        self.current_location().hash
    }

    fn search(&self) -> String {
        self.current_location().search
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{Params, Verb};

    fn state(route: &str) -> NavigationState {
        NavigationState::new(route, Verb::Get, Params::new())
    }

    #[test]
    fn test_push_and_step() {
        let history = MemoryHistory::new("/");
        history.push_entry(state("/a"), "", "/a");
        history.push_entry(state("/b"), "", "/b");
        assert_eq!(history.len(), 3);
        assert_eq!(history.index(), 2);

        history.back();
        assert_eq!(history.index(), 1);
        assert_eq!(history.pathname(), "/a");

        history.go(1);
        assert_eq!(history.index(), 2);

        // Out of range is ignored.
        history.go(5);
        assert_eq!(history.index(), 2);
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let history = MemoryHistory::new("/");
        history.push_entry(state("/a"), "", "/a");
        history.push_entry(state("/b"), "", "/b");
        history.go(-2);
        history.push_entry(state("/c"), "", "/c");

        let urls: Vec<_> = history.entries().into_iter().map(|e| e.url).collect();
        assert_eq!(urls, vec!["/", "/c"]);
    }

    #[test]
    fn test_pop_notifies_subscribers() {
        let history = MemoryHistory::new("/");
        history.push_entry(state("/a"), "", "/a");

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let id = history.subscribe(Arc::new(move |event: PopEvent| sink.lock().unwrap().push(event)));

        history.back();
        history.go(1);
        history.unsubscribe(id);
        history.back();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].state, None);
        assert_eq!(seen[1].state, Some(state("/a")));
    }

    #[test]
    fn test_location_follows_current_entry() {
        let history = MemoryHistory::new("/app/#/inbox?unread=1");
        assert_eq!(history.pathname(), "/app/");
        assert_eq!(history.hash(), "#/inbox?unread=1");

        history.push_entry(state("/app/users?page=2"), "", "/app/users?page=2");
        assert_eq!(history.pathname(), "/app/users");
        assert_eq!(history.search(), "?page=2");
    }
}
