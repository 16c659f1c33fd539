//! Metrics collection.
//!
//! # Metrics
//! - `router_dispatch_total` (counter): dispatch outcomes by `outcome` (matched, not_found)
//! - `router_history_push_total` (counter): entries pushed onto session history
//! - `router_history_pop_total` (counter): back/forward notifications re-dispatched
//! - `router_routes_registered` (gauge): current route table size
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; without an installed recorder
//!   every call is a no-op
//! - The simulator can install the Prometheus recorder and render a snapshot

use metrics::{counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder as the global metrics recorder.
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install metrics recorder");
            None
        }
    }
}

pub fn record_dispatch(matched: bool) {
    let outcome = if matched { "matched" } else { "not_found" };
    counter!("router_dispatch_total", "outcome" => outcome).increment(1);
}

pub fn record_history_push() {
    counter!("router_history_push_total").increment(1);
}

pub fn record_history_pop() {
    counter!("router_history_pop_total").increment(1);
}

pub fn record_routes(count: usize) {
    gauge!("router_routes_registered").set(count as f64);
}
