//! Sandbox actions: the only way input reaches the render loop.
//!
//! # Invariants
//! - Keyboard shortcuts, menu entries and CLI scripts all map to the same actions.

pub mod action;

pub use action::{ActionParseError, SandboxAction, parse_script};

pub fn crate_info() -> &'static str {
    "scenebox-input v0.1.0"
}
