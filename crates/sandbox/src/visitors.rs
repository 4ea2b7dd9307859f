//! Visitors the render loop dispatches to the active renderer.

use scenebox_render::{
    DebugRenderer, DeferredRenderer, ForwardRenderer, RenderFailure, RenderView, RendererKind,
    RendererVisitor,
};
use scenebox_scene::Scene;

/// Uniform summary of one rendered frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub kind: RendererKind,
    pub frame_index: u64,
    pub draw_calls: usize,
    pub triangles: u64,
    pub lights: usize,
    /// Mode-specific output: the text dump for debug, pass counters otherwise.
    pub detail: String,
}

/// Renders one frame of `scene` with whichever renderer it is dispatched to.
pub struct FrameVisitor<'a> {
    scene: &'a Scene,
    view: &'a RenderView,
    frame_index: u64,
}

impl<'a> FrameVisitor<'a> {
    pub fn new(scene: &'a Scene, view: &'a RenderView, frame_index: u64) -> Self {
        Self {
            scene,
            view,
            frame_index,
        }
    }

    fn report(&self, kind: RendererKind) -> FrameReport {
        FrameReport {
            kind,
            frame_index: self.frame_index,
            draw_calls: 0,
            triangles: 0,
            lights: 0,
            detail: String::new(),
        }
    }
}

impl RendererVisitor for FrameVisitor<'_> {
    type Output = FrameReport;

    fn visit_debug(&mut self, r: &mut DebugRenderer) -> Result<FrameReport, RenderFailure> {
        let text = r.render(self.scene, self.view)?;
        Ok(FrameReport {
            lights: self.scene.lights().count(),
            detail: text,
            ..self.report(RendererKind::Debug)
        })
    }

    fn visit_deferred(&mut self, r: &mut DeferredRenderer) -> Result<FrameReport, RenderFailure> {
        let frame = r.render(self.scene, self.view)?;
        Ok(FrameReport {
            draw_calls: frame.geometry_draws + frame.light_volumes,
            triangles: frame.triangles,
            lights: frame.light_volumes,
            detail: format!(
                "geometry_draws={} light_volumes={} gbuffer_bytes={}",
                frame.geometry_draws, frame.light_volumes, frame.gbuffer_bytes
            ),
            ..self.report(RendererKind::Deferred)
        })
    }

    fn visit_forward(&mut self, r: &mut ForwardRenderer) -> Result<FrameReport, RenderFailure> {
        let frame = r.render(self.scene, self.view)?;
        Ok(FrameReport {
            draw_calls: frame.draws,
            triangles: frame.triangles,
            lights: self.scene.lights().count(),
            detail: format!(
                "light_evaluations={} shader_variants={}",
                frame.light_evaluations, frame.variants_compiled
            ),
            ..self.report(RendererKind::Forward)
        })
    }
}

/// Brings a renderer into its initialized state. Already initialized
/// renderers are left alone.
#[derive(Debug, Default)]
pub struct InitializeVisitor;

impl RendererVisitor for InitializeVisitor {
    type Output = ();

    fn visit_debug(&mut self, r: &mut DebugRenderer) -> Result<(), RenderFailure> {
        if r.is_initialized() {
            Ok(())
        } else {
            r.initialize()
        }
    }

    fn visit_deferred(&mut self, r: &mut DeferredRenderer) -> Result<(), RenderFailure> {
        if r.is_initialized() {
            Ok(())
        } else {
            r.initialize()
        }
    }

    fn visit_forward(&mut self, r: &mut ForwardRenderer) -> Result<(), RenderFailure> {
        if r.is_initialized() {
            Ok(())
        } else {
            r.initialize()
        }
    }
}

/// Releases a renderer's resources. Safe on renderers that never started.
#[derive(Debug, Default)]
pub struct ShutdownVisitor;

impl RendererVisitor for ShutdownVisitor {
    type Output = ();

    fn visit_debug(&mut self, r: &mut DebugRenderer) -> Result<(), RenderFailure> {
        r.shutdown();
        Ok(())
    }

    fn visit_deferred(&mut self, r: &mut DeferredRenderer) -> Result<(), RenderFailure> {
        r.shutdown();
        Ok(())
    }

    fn visit_forward(&mut self, r: &mut ForwardRenderer) -> Result<(), RenderFailure> {
        r.shutdown();
        Ok(())
    }
}

/// Propagates a new target size. Only the deferred renderer keeps
/// size-dependent resources.
#[derive(Debug, Clone, Copy)]
pub struct ResizeVisitor {
    pub width: u32,
    pub height: u32,
}

impl RendererVisitor for ResizeVisitor {
    type Output = ();

    fn visit_debug(&mut self, _: &mut DebugRenderer) -> Result<(), RenderFailure> {
        Ok(())
    }

    fn visit_deferred(&mut self, r: &mut DeferredRenderer) -> Result<(), RenderFailure> {
        r.resize(self.width, self.height)
    }

    fn visit_forward(&mut self, _: &mut ForwardRenderer) -> Result<(), RenderFailure> {
        Ok(())
    }
}
