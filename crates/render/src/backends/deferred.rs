use scenebox_common::NodeId;
use scenebox_scene::{NodeKind, Scene};
use serde::{Deserialize, Serialize};

use super::require_initialized;
use crate::{RenderFailure, RenderView, RendererKind};

const BYTES_PER_TEXEL: u64 = 4;
const MAX_ATTACHMENTS: u32 = 8;

/// Settings for the deferred renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeferredSettings {
    pub width: u32,
    pub height: u32,
    /// G-buffer colour attachments (albedo, normal, material, ...).
    pub attachments: u32,
    /// Upper bound on G-buffer memory. Exceeding it fails the frame.
    pub gbuffer_budget_bytes: u64,
}

impl Default for DeferredSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            attachments: 4,
            gbuffer_budget_bytes: 256 * 1024 * 1024,
        }
    }
}

/// Work done by one deferred frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeferredFrame {
    pub geometry_draws: usize,
    pub triangles: u64,
    pub light_volumes: usize,
    pub gbuffer_bytes: u64,
}

/// Counters reported by the deferred renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeferredStats {
    pub frames_rendered: u64,
    pub width: u32,
    pub height: u32,
    /// Bytes currently held by the G-buffer, if allocated.
    pub gbuffer_bytes: Option<u64>,
    pub light_cache_rebuilds: u64,
}

/// Deferred renderer: a geometry pass into a G-buffer followed by one light
/// volume per light.
///
/// The G-buffer is allocated lazily on the first frame after initialization
/// or resize. The light list is cached per scene revision.
#[derive(Debug)]
pub struct DeferredRenderer {
    settings: DeferredSettings,
    initialized: bool,
    width: u32,
    height: u32,
    gbuffer_bytes: Option<u64>,
    light_cache: Vec<NodeId>,
    light_cache_revision: Option<u64>,
    light_cache_rebuilds: u64,
    frames_rendered: u64,
}

impl DeferredRenderer {
    pub fn new(settings: DeferredSettings) -> Self {
        let (width, height) = (settings.width, settings.height);
        Self {
            settings,
            initialized: false,
            width,
            height,
            gbuffer_bytes: None,
            light_cache: Vec::new(),
            light_cache_revision: None,
            light_cache_rebuilds: 0,
            frames_rendered: 0,
        }
    }

    pub fn settings(&self) -> &DeferredSettings {
        &self.settings
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn stats(&self) -> DeferredStats {
        DeferredStats {
            frames_rendered: self.frames_rendered,
            width: self.width,
            height: self.height,
            gbuffer_bytes: self.gbuffer_bytes,
            light_cache_rebuilds: self.light_cache_rebuilds,
        }
    }

    pub fn initialize(&mut self) -> Result<(), RenderFailure> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderFailure::contract(format!(
                "deferred target size {}x{} is empty",
                self.width, self.height
            )));
        }
        if self.settings.attachments == 0 || self.settings.attachments > MAX_ATTACHMENTS {
            return Err(RenderFailure::contract(format!(
                "deferred attachments must be 1..={MAX_ATTACHMENTS}, got {}",
                self.settings.attachments
            )));
        }
        self.initialized = true;
        tracing::debug!(
            width = self.width,
            height = self.height,
            attachments = self.settings.attachments,
            "deferred renderer initialized"
        );
        Ok(())
    }

    pub fn shutdown(&mut self) {
        if let Some(bytes) = self.gbuffer_bytes.take() {
            tracing::debug!(bytes, "released G-buffer");
        }
        self.light_cache.clear();
        self.light_cache_revision = None;
        self.initialized = false;
    }

    /// Change the render target size. The G-buffer is reallocated on the next frame.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderFailure> {
        if width == 0 || height == 0 {
            return Err(RenderFailure::contract(format!(
                "cannot resize deferred target to {width}x{height}"
            )));
        }
        if (width, height) != (self.width, self.height) {
            self.width = width;
            self.height = height;
            self.gbuffer_bytes = None;
        }
        Ok(())
    }

    pub fn render(
        &mut self,
        scene: &Scene,
        view: &RenderView,
    ) -> Result<DeferredFrame, RenderFailure> {
        require_initialized(self.initialized, RendererKind::Deferred)?;
        view.validate()?;
        let gbuffer_bytes = self.ensure_gbuffer()?;

        let mut frame = DeferredFrame {
            gbuffer_bytes,
            ..DeferredFrame::default()
        };
        for (_, node) in scene.meshes() {
            if let NodeKind::Mesh { triangles } = node.kind {
                frame.geometry_draws += 1;
                frame.triangles += u64::from(triangles);
            }
        }

        self.refresh_light_cache(scene);
        frame.light_volumes = self.light_cache.len();

        self.frames_rendered += 1;
        Ok(frame)
    }

    fn ensure_gbuffer(&mut self) -> Result<u64, RenderFailure> {
        if let Some(bytes) = self.gbuffer_bytes {
            return Ok(bytes);
        }
        let budget = self.settings.gbuffer_budget_bytes;
        let bytes = u64::from(self.width)
            .checked_mul(u64::from(self.height))
            .and_then(|texels| texels.checked_mul(BYTES_PER_TEXEL))
            .and_then(|size| size.checked_mul(u64::from(self.settings.attachments)));
        let bytes = match bytes {
            Some(bytes) if bytes <= budget => bytes,
            _ => {
                // `None` means the size does not even fit in a u64.
                let requested = bytes.map_or_else(|| format!(">{}", u64::MAX), |b| b.to_string());
                return Err(RenderFailure::engine(format!(
                    "G-buffer allocation of {requested} bytes for {}x{} exceeds budget of {} bytes",
                    self.width, self.height, budget
                )));
            }
        };
        tracing::debug!(bytes, "allocated G-buffer");
        self.gbuffer_bytes = Some(bytes);
        Ok(bytes)
    }

    fn refresh_light_cache(&mut self, scene: &Scene) {
        if self.light_cache_revision == Some(scene.revision()) {
            return;
        }
        self.light_cache = scene.lights().map(|(id, _)| *id).collect();
        self.light_cache_revision = Some(scene.revision());
        self.light_cache_rebuilds += 1;
    }
}
