//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! start():
//!     Stopped → Running
//!     enable → history start (initial dispatch + pop subscription)
//!     → bind input listener → flush buffered debug messages
//!
//! pause() / resume():
//!     Running ⇄ Paused (listener unbound/rebound, table + history kept)
//!
//! end():
//!     * → Stopped (disable, clear routes, end history, unbind listener)
//!
//! Deferred work (timer.rs):
//!     navigate(delay) / go_history(delay) / touch pop delay
//! ```
//!
//! # Design Decisions
//! - start() is idempotent while running
//! - end() is a hard reset; a later start() begins from an empty table
//! - Deferred tasks are fire-and-forget

pub mod timer;

pub use timer::{Task, Timer, TokioTimer};

/// Router run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Stopped,
    Running,
    Paused,
}
