//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the virtual root is a well-formed mount prefix
//! - Check listener bindings are usable
//! - Check declared routes name a supported verb
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: Settings → Result<(), Vec<ValidationError>>
//! - Runs before settings are accepted into the system

use thiserror::Error;

use crate::config::schema::{ListenerBindings, RouterConfig, Settings};
use crate::routing::Verb;

/// A single semantic problem found in the settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("virtual_root '{0}' must start with '/'")]
    VirtualRootNotAbsolute(String),

    #[error("virtual_root '{0}' must not end with '/'")]
    VirtualRootTrailingSlash(String),

    #[error("virtual_root '{0}' must not contain '#' or '?'")]
    VirtualRootReserved(String),

    #[error("listener.{0} must not be empty")]
    EmptyBinding(&'static str),

    #[error("route '{pattern}' uses unsupported verb '{verb}'")]
    UnsupportedVerb { verb: String, pattern: String },
}

/// Validate a complete settings document.
pub fn validate_settings(settings: &Settings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(mut e) = validate_router(&settings.router) {
        errors.append(&mut e);
    }
    if let Err(mut e) = validate_bindings(&settings.listener) {
        errors.append(&mut e);
    }

    for route in &settings.routes {
        if route.verb.parse::<Verb>().is_err() {
            errors.push(ValidationError::UnsupportedVerb {
                verb: route.verb.clone(),
                pattern: route.pattern.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate the runtime router section on its own.
pub fn validate_router(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let root = &config.virtual_root;

    if !root.starts_with('/') {
        errors.push(ValidationError::VirtualRootNotAbsolute(root.clone()));
    }
    if root.len() > 1 && root.ends_with('/') {
        errors.push(ValidationError::VirtualRootTrailingSlash(root.clone()));
    }
    if root.contains('#') || root.contains('?') {
        errors.push(ValidationError::VirtualRootReserved(root.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_bindings(bindings: &ListenerBindings) -> Result<(), Vec<ValidationError>> {
    let fields = [
        ("request", &bindings.request),
        ("click", &bindings.click),
        ("orientation", &bindings.orientation),
        ("back_button_selector", &bindings.back_button_selector),
        ("dispatch_event", &bindings.dispatch_event),
    ];

    let errors: Vec<_> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| ValidationError::EmptyBinding(name))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
