use scenebox_render::{RenderFailure, RendererKind};

use crate::ConfigError;

/// Errors surfaced by the sandbox to its caller.
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    /// A renderer call failed and the failure policy did not absorb it.
    /// The original failure is kept as is.
    #[error("{kind} renderer: {failure}")]
    Render {
        kind: RendererKind,
        #[source]
        failure: RenderFailure,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SandboxError {
    pub(crate) fn render(kind: RendererKind, failure: RenderFailure) -> Self {
        Self::Render { kind, failure }
    }

    /// The renderer failure behind this error, if any.
    pub fn failure(&self) -> Option<&RenderFailure> {
        match self {
            Self::Render { failure, .. } => Some(failure),
            Self::Config(_) => None,
        }
    }
}
