//! Debug-mode message journal.
//!
//! # Responsibilities
//! - Emit route-table diagnostics while the router runs in debug mode
//! - Buffer diagnostics produced before the router starts
//! - Flush the buffer, in order, when the router starts
//!
//! # Design Decisions
//! - Messages are only recorded when debug mode is on
//! - Emitted at `info` so debug mode is visible under the default filter

use std::sync::{Mutex, PoisonError};

/// Diagnostics sink with pre-start buffering.
#[derive(Debug, Default)]
pub struct DebugJournal {
    queue: Mutex<Vec<String>>,
}

impl DebugJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a debug-mode message.
    ///
    /// Logged immediately when `running`, queued otherwise.
    pub fn record(&self, debug: bool, running: bool, message: String) {
        if !debug {
            return;
        }
        if running {
            tracing::info!(target: "hashroute::debug", "{}", message);
        } else {
            self.lock().push(message);
        }
    }

    /// Log and drain every queued message. Returns how many were flushed.
    pub fn flush(&self) -> usize {
        let queued = std::mem::take(&mut *self.lock());
        for message in &queued {
            tracing::info!(target: "hashroute::debug", "{}", message);
        }
        queued.len()
    }

    /// Number of messages waiting for `flush`.
    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
