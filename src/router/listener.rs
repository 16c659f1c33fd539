//! Input listener seam.
//!
//! # Responsibilities
//! - Bind the three logical triggers (request, back-button activation,
//!   orientation change) to the router's navigation entry point
//! - Unbind on pause/end, rebind when bindings change
//!
//! # Design Decisions
//! - DOM wiring lives outside the core; `TriggerListener` accepts trigger
//!   values from any host (browser glue, scripts, tests)
//! - Triggers whose event name or selector is not bound are ignored

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::ListenerBindings;
use crate::router::NavigationEntry;
use crate::routing::Verb;

/// Binds UI triggers to the router.
pub trait InputListener: Send + Sync {
    fn on(&self, bindings: &ListenerBindings, entry: NavigationEntry);

    fn off(&self);

    /// Rebind after the bindings changed.
    fn reset(&self, bindings: &ListenerBindings, entry: NavigationEntry) {
        self.off();
        self.on(bindings, entry);
    }
}

/// Listener that binds nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl InputListener for NoopListener {
    fn on(&self, _bindings: &ListenerBindings, _entry: NavigationEntry) {}

    fn off(&self) {}
}

/// A UI trigger delivered to a [`TriggerListener`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Generic navigation request, e.g. a link click.
    Request {
        event: String,
        route: String,
        verb: String,
    },
    /// Activation of an element matching `selector`.
    Activate { event: String, selector: String },
    /// Device orientation change; re-navigates with GET.
    Orientation { event: String, route: String },
}

/// Listener fed with [`Trigger`] values.
#[derive(Default)]
pub struct TriggerListener {
    bound: Mutex<Option<(ListenerBindings, NavigationEntry)>>,
}

impl TriggerListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_bound(&self) -> bool {
        self.lock().is_some()
    }

    /// Deliver a trigger. Returns whether it reached the router.
    pub fn deliver(&self, trigger: Trigger) -> bool {
        let Some((bindings, entry)) = self.lock().clone() else {
            tracing::trace!(?trigger, "Listener unbound, trigger dropped");
            return false;
        };

        match trigger {
            Trigger::Request { event, route, verb } if event == bindings.request => {
                match verb.parse::<Verb>() {
                    Ok(verb) => entry.navigate(&route, verb),
                    Err(e) => {
                        tracing::warn!(route = %route, error = %e, "Navigation request dropped");
                        false
                    }
                }
            }
            Trigger::Orientation { event, route } if event == bindings.orientation => {
                entry.navigate(&route, Verb::Get)
            }
            Trigger::Activate { event, selector }
                if event == bindings.click && selector == bindings.back_button_selector =>
            {
                entry.back()
            }
            other => {
                tracing::trace!(trigger = ?other, "Trigger not bound");
                false
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<(ListenerBindings, NavigationEntry)>> {
        self.bound.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl InputListener for TriggerListener {
    fn on(&self, bindings: &ListenerBindings, entry: NavigationEntry) {
        tracing::debug!(
            request = %bindings.request,
            click = %bindings.click,
            orientation = %bindings.orientation,
            "Input listener bound"
        );
        *self.lock() = Some((bindings.clone(), entry));
    }

    fn off(&self) {
        *self.lock() = None;
    }
}
