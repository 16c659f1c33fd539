//! Client-side request router.
//!
//! Maps `(verb, path)` navigations onto registered handler chains, keeps
//! session history consistent with programmatic navigation and back/forward
//! movement, and translates between canonical paths and the wire form used
//! in the address bar (virtual root, optional hash mode).
//!
//! # Architecture Overview
//!
//! ```text
//!   navigate(route, verb)          back / forward
//!          │                             │
//!          ▼                             ▼
//!   ┌─────────────┐  stage/commit  ┌─────────────┐   push / pop   ┌──────────────┐
//!   │   router    │───────────────▶│   history   │◀──────────────▶│ SessionHistory│
//!   │   facade    │◀───────────────│ reconciler  │                └──────────────┘
//!   └──────┬──────┘   re-dispatch  └─────────────┘
//!          │ dispatch
//!          ▼
//!   ┌─────────────┐  match   ┌─────────────┐   MatchResult   ┌──────────────┐
//!   │  location   │─────────▶│   routing   │────────────────▶│ DispatchSink │
//!   │  codec      │          │  registry   │                 └──────────────┘
//!   └─────────────┘          └─────────────┘
//!
//!   Cross-cutting: config (TOML + watcher), lifecycle (state, timers),
//!   observability (tracing, metrics, debug journal)
//! ```

pub mod config;
pub mod history;
pub mod lifecycle;
pub mod location;
pub mod observability;
pub mod router;
pub mod routing;

pub use config::{ListenerBindings, ListenerOptions, RouterConfig, Settings};
pub use history::{MemoryHistory, NavigationState, SessionHistory};
pub use lifecycle::Lifecycle;
pub use router::{NavigationEntry, Router, RouterBuilder};
pub use routing::{handler, DispatchSink, Handler, MatchResult, Next, Params, Request, Response, Verb};
