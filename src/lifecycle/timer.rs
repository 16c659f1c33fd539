//! One-shot deferred execution.
//!
//! Scheduled tasks cannot be cancelled: a later navigation never cancels
//! an earlier pending one, and tasks fire in timer order.

use std::time::Duration;

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Schedules tasks to run once after a delay.
pub trait Timer: Send + Sync {
    fn schedule(&self, delay: Duration, task: Task);
}

/// Timer backed by the Tokio runtime.
///
/// Outside a runtime the task is run on a sleeping helper thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioTimer;

impl Timer for TokioTimer {
    fn schedule(&self, delay: Duration, task: Task) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    task();
                });
            }
            Err(_) => {
                tracing::debug!(delay_ms = delay.as_millis() as u64, "No runtime, deferring on a thread");
                std::thread::spawn(move || {
                    std::thread::sleep(delay);
                    task();
                });
            }
        }
    }
}
