use scenebox_scene::{NodeKind, Scene};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::require_initialized;
use crate::{RenderFailure, RenderView, RendererKind};

const SUPPORTED_MSAA: [u32; 4] = [1, 2, 4, 8];

/// Settings for the forward renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwardSettings {
    /// Lights evaluated per draw; the nearest in-range lights win.
    pub max_lights_per_draw: u32,
    /// Capacity of the shader variant cache (one variant per light count).
    pub max_shader_variants: usize,
    pub msaa_samples: u32,
}

impl Default for ForwardSettings {
    fn default() -> Self {
        Self {
            max_lights_per_draw: 4,
            max_shader_variants: 8,
            msaa_samples: 4,
        }
    }
}

/// Work done by one forward frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForwardFrame {
    pub draws: usize,
    pub triangles: u64,
    /// Sum over all draws of the lights shading that draw.
    pub light_evaluations: u64,
    pub variants_compiled: usize,
}

/// Counters reported by the forward renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForwardStats {
    pub frames_rendered: u64,
    pub compiled_variants: Vec<u32>,
    pub msaa_samples: u32,
}

/// Forward renderer: every mesh is shaded in a single pass by the lights in
/// range of it, capped at `max_lights_per_draw`.
///
/// Each distinct per-draw light count needs its own shader variant. Variants
/// are compiled on first use and kept until shutdown.
#[derive(Debug)]
pub struct ForwardRenderer {
    settings: ForwardSettings,
    initialized: bool,
    variants: BTreeSet<u32>,
    frames_rendered: u64,
}

impl ForwardRenderer {
    pub fn new(settings: ForwardSettings) -> Self {
        Self {
            settings,
            initialized: false,
            variants: BTreeSet::new(),
            frames_rendered: 0,
        }
    }

    pub fn settings(&self) -> &ForwardSettings {
        &self.settings
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn stats(&self) -> ForwardStats {
        ForwardStats {
            frames_rendered: self.frames_rendered,
            compiled_variants: self.variants.iter().copied().collect(),
            msaa_samples: self.settings.msaa_samples,
        }
    }

    pub fn initialize(&mut self) -> Result<(), RenderFailure> {
        if !SUPPORTED_MSAA.contains(&self.settings.msaa_samples) {
            return Err(RenderFailure::contract(format!(
                "unsupported MSAA sample count {}",
                self.settings.msaa_samples
            )));
        }
        if self.settings.max_lights_per_draw == 0 {
            return Err(RenderFailure::contract(
                "forward max_lights_per_draw must be at least 1",
            ));
        }
        self.initialized = true;
        tracing::debug!(
            msaa = self.settings.msaa_samples,
            max_lights = self.settings.max_lights_per_draw,
            "forward renderer initialized"
        );
        Ok(())
    }

    pub fn shutdown(&mut self) {
        if !self.variants.is_empty() {
            tracing::debug!(variants = self.variants.len(), "released shader variants");
        }
        self.variants.clear();
        self.initialized = false;
    }

    pub fn render(
        &mut self,
        scene: &Scene,
        view: &RenderView,
    ) -> Result<ForwardFrame, RenderFailure> {
        require_initialized(self.initialized, RendererKind::Forward)?;
        view.validate()?;

        let lights: Vec<_> = scene
            .lights()
            .filter_map(|(_, node)| match node.kind {
                NodeKind::Light { range, .. } => Some((node.transform.position, range)),
                _ => None,
            })
            .collect();

        let mut frame = ForwardFrame::default();
        for (_, node) in scene.meshes() {
            let NodeKind::Mesh { triangles } = node.kind else {
                continue;
            };
            let in_range = lights
                .iter()
                .filter(|(pos, range)| node.transform.distance_to(*pos) <= *range)
                .count();
            let count = (in_range as u32).min(self.settings.max_lights_per_draw);
            self.ensure_variant(count)?;

            frame.draws += 1;
            frame.triangles += u64::from(triangles);
            frame.light_evaluations += u64::from(count);
        }
        frame.variants_compiled = self.variants.len();

        self.frames_rendered += 1;
        Ok(frame)
    }

    fn ensure_variant(&mut self, light_count: u32) -> Result<(), RenderFailure> {
        if self.variants.contains(&light_count) {
            return Ok(());
        }
        if self.variants.len() >= self.settings.max_shader_variants {
            return Err(RenderFailure::engine(format!(
                "shader link failed for {light_count}-light variant: cache holds {} of {}",
                self.variants.len(),
                self.settings.max_shader_variants
            )));
        }
        tracing::debug!(light_count, "compiled forward shader variant");
        self.variants.insert(light_count);
        Ok(())
    }
}
