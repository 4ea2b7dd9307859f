use crate::{DebugRenderer, DeferredRenderer, ForwardRenderer, RenderFailure};

/// An operation that can run against any renderer mode.
///
/// There is one method per renderer kind and none has a default body: adding
/// a kind is a compile error in every implementor until it handles the new
/// kind. All three methods produce the same `Output`, `()` for a frame
/// visitor or a report type for an inspection visitor.
///
/// Visitors receive the renderer by exclusive reference for the duration of
/// the call only and never take ownership of it.
pub trait RendererVisitor {
    type Output;

    fn visit_debug(&mut self, renderer: &mut DebugRenderer) -> Result<Self::Output, RenderFailure>;

    fn visit_deferred(
        &mut self,
        renderer: &mut DeferredRenderer,
    ) -> Result<Self::Output, RenderFailure>;

    fn visit_forward(
        &mut self,
        renderer: &mut ForwardRenderer,
    ) -> Result<Self::Output, RenderFailure>;
}
