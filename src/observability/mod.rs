//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Router subsystems produce:
//!     → tracing events (one span per navigation, keyed by navigation_id)
//!     → journal.rs (debug-mode route table messages)
//!     → metrics.rs (dispatch / history counters)
//!
//! Consumers:
//!     → logging.rs subscriber (binaries only)
//!     → Prometheus snapshot (simulator, optional)
//! ```
//!
//! # Design Decisions
//! - Navigation ID flows through codec, dispatch and history logs
//! - Debug-mode messages are buffered until the router starts
//! - Metrics are cheap (no-op without a recorder)

pub mod journal;
pub mod logging;
pub mod metrics;

pub use journal::DebugJournal;
