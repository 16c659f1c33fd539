//! History subsystem.
//!
//! # Data Flow
//! ```text
//! Programmatic navigation:
//!     router stage(state) → reconciler.rs (pending_push = true)
//!     → commit() → codec hashify → store.rs push_entry(state, "", wire)
//!     → dispatch
//!
//! Browser back/forward:
//!     store.rs pop notification (PopEvent)
//!     → reconciler.rs on_pop (pending_push = false)
//!     → [touch: timer delay] → re-dispatch (commit is a no-op)
//! ```
//!
//! # Design Decisions
//! - NavigationState is the only payload stored in session history
//! - The store is a trait so browser and in-memory stacks are interchangeable

pub mod reconciler;
pub mod state;
pub mod store;

pub use reconciler::{HistoryReconciler, Redispatch};
pub use state::{NavigationState, PopEvent};
pub use store::{HistoryEntry, MemoryHistory, PopListener, SessionHistory, SubscriptionId};
