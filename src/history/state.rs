//! Navigation timeline payloads.

use serde::{Deserialize, Serialize};

use crate::routing::{Params, Verb};

/// One point in the navigation timeline.
///
/// Staged by every programmatic navigation and stored as the payload of
/// the session-history entry it produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub route: String,
    #[serde(default)]
    pub params: Params,
    pub verb: Verb,
}

impl NavigationState {
    pub fn new(route: impl Into<String>, verb: Verb, params: Params) -> Self {
        Self {
            route: route.into(),
            params,
            verb,
        }
    }
}

/// Back/forward notification from the session-history store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopEvent {
    /// `None` for entries the router did not create (e.g. the landing page).
    pub state: Option<NavigationState>,
}
