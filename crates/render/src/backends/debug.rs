use scenebox_scene::{NodeKind, Scene};
use serde::{Deserialize, Serialize};

use super::require_initialized;
use crate::{RenderFailure, RenderView, RendererKind};

/// Settings for the debug text renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugSettings {
    /// Maximum number of node lines per frame. Extra nodes are summarised.
    pub max_lines: usize,
    /// Include the camera line in the dump.
    pub show_camera: bool,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            max_lines: 64,
            show_camera: true,
        }
    }
}

/// Counters reported by the debug renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebugStats {
    pub frames_rendered: u64,
    pub last_output_bytes: usize,
    pub last_truncated_nodes: usize,
}

/// Debug text renderer.
///
/// Produces a human-readable dump of the scene instead of pixels. Useful for
/// the CLI, logging and testing the dispatch path without a GPU.
#[derive(Debug)]
pub struct DebugRenderer {
    settings: DebugSettings,
    initialized: bool,
    stats: DebugStats,
}

impl DebugRenderer {
    pub fn new(settings: DebugSettings) -> Self {
        Self {
            settings,
            initialized: false,
            stats: DebugStats::default(),
        }
    }

    pub fn settings(&self) -> &DebugSettings {
        &self.settings
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn frames_rendered(&self) -> u64 {
        self.stats.frames_rendered
    }

    pub fn stats(&self) -> &DebugStats {
        &self.stats
    }

    pub fn initialize(&mut self) -> Result<(), RenderFailure> {
        if self.settings.max_lines == 0 {
            return Err(RenderFailure::contract("debug max_lines must be at least 1"));
        }
        self.initialized = true;
        tracing::debug!(max_lines = self.settings.max_lines, "debug renderer initialized");
        Ok(())
    }

    pub fn shutdown(&mut self) {
        if self.initialized {
            tracing::debug!(frames = self.stats.frames_rendered, "debug renderer shut down");
        }
        self.initialized = false;
    }

    /// Render one frame as text.
    pub fn render(&mut self, scene: &Scene, view: &RenderView) -> Result<String, RenderFailure> {
        require_initialized(self.initialized, RendererKind::Debug)?;
        view.validate()?;

        let mut out = String::new();
        out.push_str(&format!(
            "=== Scene (revision={}, frame={}) ===\n",
            scene.revision(),
            self.stats.frames_rendered + 1
        ));
        out.push_str(&format!("Nodes: {}\n", scene.node_count()));
        if self.settings.show_camera {
            out.push_str(&format!(
                "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
                view.eye.x,
                view.eye.y,
                view.eye.z,
                view.target.x,
                view.target.y,
                view.target.z,
                view.fov_degrees
            ));
        }

        for (id, node) in scene.nodes().iter().take(self.settings.max_lines) {
            let p = node.transform.position;
            let tag = match node.kind {
                NodeKind::Mesh { triangles } => format!("mesh tris={triangles}"),
                NodeKind::Light { intensity, range } => {
                    format!("light i={intensity:.1} r={range:.1}")
                }
                NodeKind::Empty => "empty".to_string(),
            };
            out.push_str(&format!(
                "  [{}] {} pos=({:.2}, {:.2}, {:.2}) {}\n",
                id.short(),
                node.name,
                p.x,
                p.y,
                p.z,
                tag
            ));
        }

        let truncated = scene.node_count().saturating_sub(self.settings.max_lines);
        if truncated > 0 {
            out.push_str(&format!("  ... {truncated} more\n"));
        }

        self.stats.frames_rendered += 1;
        self.stats.last_output_bytes = out.len();
        self.stats.last_truncated_nodes = truncated;
        Ok(out)
    }
}
