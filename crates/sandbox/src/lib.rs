//! Sandbox render loop.
//!
//! Owns the scene and the renderer set, keeps track of the active mode and
//! drives it through visitors. This is the one place where render failures
//! are acted on: engine errors are retried, skipped or answered with a mode
//! fallback; contract violations halt the operation and are reported.
//!
//! # Invariants
//! - At most one handle exists at a time; mode switches happen between dispatches.
//! - Failures reach the caller with their class and message intact.

mod config;
mod error;
mod policy;
mod sandbox;
mod visitors;

pub use config::{ConfigError, SandboxConfig};
pub use error::SandboxError;
pub use policy::{FailurePolicy, FailureResponse};
pub use sandbox::{ActionOutcome, FrameOutcome, Sandbox};
pub use visitors::{FrameReport, FrameVisitor, InitializeVisitor, ResizeVisitor, ShutdownVisitor};

pub fn crate_info() -> &'static str {
    "scenebox-sandbox v0.1.0"
}
