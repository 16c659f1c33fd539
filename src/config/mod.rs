//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → Settings (validated)
//!     → RouterConfig swapped into the live router
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new settings
//!     → validation.rs validates
//!     → sent over channel to the owner of the Router
//!     → Router::set_config / Router::configure
//! ```
//!
//! # Design Decisions
//! - RouterConfig may change at runtime; readers always see a full snapshot
//! - All fields have defaults to allow minimal settings files
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_settings, parse_settings, ConfigError};
pub use schema::{
    ListenerBindings, ListenerOptions, ObservabilityConfig, RouteConfig, RouterConfig, Settings,
};
pub use validation::ValidationError;
