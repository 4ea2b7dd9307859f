use crate::{
    DebugRenderer, DeferredRenderer, ForwardRenderer, RenderFailure, RendererKind,
    RendererVisitor,
};

/// The active renderer, whichever mode it is.
///
/// A handle is bound to one renderer when it is built and never rebinds. It
/// holds the renderer by exclusive borrow, so it cannot outlive it and
/// dropping the handle does not tear the renderer down.
///
/// Only the typed constructors can build a handle, so a kind/renderer
/// mismatch cannot be expressed:
///
/// ```compile_fail
/// use scenebox_render::{DeferredRenderer, DeferredSettings, RendererHandle};
///
/// let mut deferred = DeferredRenderer::new(DeferredSettings::default());
/// let _handle = RendererHandle::debug(&mut deferred);
/// ```
#[derive(Debug)]
pub struct RendererHandle<'r> {
    slot: Slot<'r>,
}

#[derive(Debug)]
enum Slot<'r> {
    Debug(&'r mut DebugRenderer),
    Deferred(&'r mut DeferredRenderer),
    Forward(&'r mut ForwardRenderer),
}

/// Shared view of the renderer inside a handle.
///
/// For settings panels and labels only. Rendering needs `&mut` and therefore
/// goes through [`RendererHandle::dispatch`].
#[derive(Debug, Clone, Copy)]
pub enum RendererRef<'a> {
    Debug(&'a DebugRenderer),
    Deferred(&'a DeferredRenderer),
    Forward(&'a ForwardRenderer),
}

impl RendererRef<'_> {
    pub fn kind(&self) -> RendererKind {
        match self {
            Self::Debug(_) => RendererKind::Debug,
            Self::Deferred(_) => RendererKind::Deferred,
            Self::Forward(_) => RendererKind::Forward,
        }
    }

    pub fn is_initialized(&self) -> bool {
        match self {
            Self::Debug(r) => r.is_initialized(),
            Self::Deferred(r) => r.is_initialized(),
            Self::Forward(r) => r.is_initialized(),
        }
    }
}

impl<'r> RendererHandle<'r> {
    pub fn debug(renderer: &'r mut DebugRenderer) -> Self {
        Self {
            slot: Slot::Debug(renderer),
        }
    }

    pub fn deferred(renderer: &'r mut DeferredRenderer) -> Self {
        Self {
            slot: Slot::Deferred(renderer),
        }
    }

    pub fn forward(renderer: &'r mut ForwardRenderer) -> Self {
        Self {
            slot: Slot::Forward(renderer),
        }
    }

    /// Which mode this handle wraps. For labels and logs; route work through
    /// [`dispatch`](Self::dispatch) instead of branching on this.
    pub fn kind(&self) -> RendererKind {
        match self.slot {
            Slot::Debug(_) => RendererKind::Debug,
            Slot::Deferred(_) => RendererKind::Deferred,
            Slot::Forward(_) => RendererKind::Forward,
        }
    }

    /// Call the one visitor method matching this handle's renderer.
    ///
    /// The visitor's result, success or failure, is returned as is.
    pub fn dispatch<V>(&mut self, visitor: &mut V) -> Result<V::Output, RenderFailure>
    where
        V: RendererVisitor + ?Sized,
    {
        tracing::trace!(kind = %self.kind(), "dispatch");
        match &mut self.slot {
            Slot::Debug(renderer) => visitor.visit_debug(renderer),
            Slot::Deferred(renderer) => visitor.visit_deferred(renderer),
            Slot::Forward(renderer) => visitor.visit_forward(renderer),
        }
    }

    /// Read-only access to the wrapped renderer, e.g. to show its settings.
    pub fn inspect(&self) -> RendererRef<'_> {
        match &self.slot {
            Slot::Debug(renderer) => RendererRef::Debug(renderer),
            Slot::Deferred(renderer) => RendererRef::Deferred(renderer),
            Slot::Forward(renderer) => RendererRef::Forward(renderer),
        }
    }
}

impl<'r> From<&'r mut DebugRenderer> for RendererHandle<'r> {
    fn from(renderer: &'r mut DebugRenderer) -> Self {
        Self::debug(renderer)
    }
}

impl<'r> From<&'r mut DeferredRenderer> for RendererHandle<'r> {
    fn from(renderer: &'r mut DeferredRenderer) -> Self {
        Self::deferred(renderer)
    }
}

impl<'r> From<&'r mut ForwardRenderer> for RendererHandle<'r> {
    fn from(renderer: &'r mut ForwardRenderer) -> Self {
        Self::forward(renderer)
    }
}
