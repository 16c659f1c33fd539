//! Location subsystem.
//!
//! # Data Flow
//! ```text
//! navigate(route)
//!     → sanitize.rs (trim, absolute URL → path)
//!     → codec.rs hash_root (no empty fragment)
//!     → codec.rs de_hashify (wire → canonical, the dispatch key)
//!
//! history commit
//!     → codec.rs hashify (canonical → wire, pushed to session history)
//!
//! router start
//!     → reader.rs (pathname / hash / search)
//!     → codec.rs current_path (canonical initial route)
//! ```
//!
//! # Design Decisions
//! - The codec never owns configuration; it borrows a snapshot
//! - Virtual root handling is identical in both directions
//! - Browser access is behind `LocationReader` so the core runs headless

pub mod codec;
pub mod reader;
pub mod sanitize;

pub use codec::{to_path, PathCodec};
pub use reader::{LocationReader, StaticLocation};
pub use sanitize::sanitize;
