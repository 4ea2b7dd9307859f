//! Renderer-mode dispatch core.
//!
//! The sandbox can draw the same scene with a debug, a deferred or a forward
//! renderer. [`RendererHandle`] wraps whichever one is active and routes a
//! [`RendererVisitor`] to the method for that kind, so callers never downcast.
//!
//! # Invariants
//! - A handle's kind always matches the renderer it holds (one variant per kind).
//! - A handle borrows its renderer; dropping the handle leaves the renderer alive.
//! - `dispatch` returns the visitor's failure unchanged.

pub mod backends;
mod error;
mod handle;
mod kind;
mod view;
mod visitor;

pub use backends::{
    DebugRenderer, DebugSettings, DebugStats, DeferredFrame, DeferredRenderer,
    DeferredSettings, DeferredStats, ForwardFrame, ForwardRenderer, ForwardSettings,
    ForwardStats, RendererSet, RendererSettings,
};
pub use error::{FailureClass, RenderFailure, RenderResult};
pub use handle::{RendererHandle, RendererRef};
pub use kind::{RendererKind, UnknownRendererKind};
pub use view::RenderView;
pub use visitor::RendererVisitor;

pub fn crate_info() -> &'static str {
    "scenebox-render v0.1.0"
}
