//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Navigation (route, verb)
//!     → dispatcher.rs (canonicalize via location codec)
//!     → registry.rs snapshot (insertion-ordered routes)
//!     → matcher.rs (pattern accepts path? extract params)
//!     → handler.rs (bootstrap + registered handlers, or not-found)
//!     → MatchResult emitted to the DispatchSink
//!
//! Registration:
//!     (verb, pattern, handlers)
//!     → registry.rs (exact duplicate rejected, appended otherwise)
//! ```
//!
//! # Design Decisions
//! - Deterministic: same table and input always produce the same result
//! - First match wins (ordered by registration)
//! - Matching is case-insensitive, storage is case-preserving
//! - Handler chains are built here but executed by the consumer

pub mod dispatcher;
pub mod handler;
pub mod matcher;
pub mod registry;
pub mod verb;

pub use dispatcher::{DispatchSink, Dispatcher, MatchResult, NullSink};
pub use handler::{handler, Handler, Next, Request, Response, STATUS_NOT_FOUND, STATUS_OK};
pub use matcher::{parse_query, Params, PatternMatcher, SegmentMatcher};
pub use registry::{Route, RouteRegistry};
pub use verb::{Verb, VerbError};
