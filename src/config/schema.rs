//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from settings files.

use serde::{Deserialize, Serialize};

/// Root settings for a router deployment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Path codec and dispatch behaviour.
    pub router: RouterConfig,

    /// Event names and selectors consumed by the input listener.
    pub listener: ListenerBindings,

    /// Routes registered at startup by the simulator.
    pub routes: Vec<RouteConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Runtime router configuration.
///
/// Read by the path codec, the dispatcher and the history reconciler.
/// Can be swapped at runtime without restarting the router.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Mount-point prefix added to and removed from wire routes.
    pub virtual_root: String,

    /// Navigate via the URL fragment instead of the native history API.
    pub hash_mode: bool,

    /// Whether the router is currently accepting navigation.
    #[serde(skip)]
    pub enabled: bool,

    /// Emit route-table diagnostics.
    pub debug: bool,

    /// The client supports touch input (pop dispatch is delayed).
    pub touch: bool,

    /// Delay applied to pop dispatch on touch clients, in milliseconds.
    pub pop_delay_ms: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            virtual_root: "/".to_string(),
            hash_mode: false,
            enabled: false,
            debug: true,
            touch: false,
            pop_delay_ms: 700,
        }
    }
}

impl RouterConfig {
    /// Returns true when a non-root virtual root is configured.
    pub fn is_virtual(&self) -> bool {
        self.virtual_root != "/"
    }
}

/// Named events and selectors the input listener binds to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerBindings {
    /// Generic navigation request event.
    pub request: String,

    /// Activation (click/tap) event.
    pub click: String,

    /// Device orientation change event.
    pub orientation: String,

    /// Elements matching this selector step back in history when activated.
    pub back_button_selector: String,

    /// Event name handed to the dispatch sink with every result.
    pub dispatch_event: String,
}

impl Default for ListenerBindings {
    fn default() -> Self {
        Self {
            request: "hashroute.onDocumentRequest".to_string(),
            click: "touchclick".to_string(),
            orientation: "onOrientationChange".to_string(),
            back_button_selector: "[data-role=\"back\"]".to_string(),
            dispatch_event: "hashroute.onRouteDispatch".to_string(),
        }
    }
}

/// Partial listener rebinding applied by `Router::configure`.
///
/// Only the fields that are set replace the current bindings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerOptions {
    pub request: Option<String>,
    pub click: Option<String>,
    pub orientation: Option<String>,
    pub back_button_selector: Option<String>,
    pub dispatch_event: Option<String>,
}

impl ListenerBindings {
    /// Merge the set fields of `opts` into these bindings.
    pub fn apply(&mut self, opts: ListenerOptions) {
        if let Some(request) = opts.request {
            self.request = request;
        }
        if let Some(orientation) = opts.orientation {
            self.orientation = orientation;
        }
        if let Some(click) = opts.click {
            self.click = click;
        }
        if let Some(selector) = opts.back_button_selector {
            self.back_button_selector = selector;
        }
        if let Some(event) = opts.dispatch_event {
            self.dispatch_event = event;
        }
    }
}

/// A route declared in the settings file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Verb name (get, post, put, delete).
    #[serde(default = "default_verb")]
    pub verb: String,

    /// Pattern handed to the pattern matcher.
    pub pattern: String,

    /// Label used when the simulator logs handler execution.
    #[serde(default)]
    pub name: Option<String>,
}

fn default_verb() -> String {
    "get".to_string()
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Install the Prometheus recorder and print a snapshot on exit.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
        }
    }
}
