//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for binaries
//! - Configure log level from settings, overridable by `RUST_LOG`
//!
//! # Design Decisions
//! - The library only emits events; installing a subscriber is the host's call
//! - `try_init` so tests and embedders that already set one are unaffected

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a formatted subscriber filtered at `level`.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("hashroute={level},hashroute_sim={level}").into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
