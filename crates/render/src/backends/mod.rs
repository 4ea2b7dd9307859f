//! CPU-side renderer implementations, one per mode, and the set that owns them.
//!
//! Each renderer has its own capability contract. They share no base trait;
//! code that must work across modes goes through a [`RendererVisitor`](crate::RendererVisitor).

mod debug;
mod deferred;
mod forward;
mod set;

pub use debug::{DebugRenderer, DebugSettings, DebugStats};
pub use deferred::{DeferredFrame, DeferredRenderer, DeferredSettings, DeferredStats};
pub use forward::{ForwardFrame, ForwardRenderer, ForwardSettings, ForwardStats};
pub use set::{RendererSet, RendererSettings};

use crate::{RenderFailure, RendererKind};

fn require_initialized(initialized: bool, kind: RendererKind) -> Result<(), RenderFailure> {
    if initialized {
        Ok(())
    } else {
        Err(RenderFailure::contract(format!("{kind} renderer not initialized")))
    }
}
