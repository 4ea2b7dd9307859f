//! Developer tooling: scene inspector and per-mode renderer diagnostics.
//!
//! # Invariants
//! - Tools only read; they never render or mutate the scene.

mod diagnostics;
mod inspector;

pub use diagnostics::{DiagnosticsVisitor, RendererDiagnostics};
pub use inspector::{NodeInfo, SceneInspector, SceneSummary};

pub fn crate_info() -> &'static str {
    "scenebox-tools v0.1.0"
}
