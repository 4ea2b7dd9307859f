use scenebox_render::{RenderFailure, RendererKind};
use serde::{Deserialize, Serialize};

/// What the render loop does about a failed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureResponse {
    /// Dispatch the same frame again.
    Retry,
    /// Give up on this frame and keep the current mode.
    SkipFrame,
    /// Give up on this frame and switch to another mode.
    FallBack(RendererKind),
    /// Stop the operation and report the failure.
    Halt,
}

/// Retry and fallback rules for engine errors.
///
/// Contract violations are never retried, whatever the settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailurePolicy {
    /// Extra dispatches of the same frame after an engine error.
    pub max_retries: u32,
    /// Consecutive failed frames before falling back to another mode.
    pub fallback_after_failed_frames: u32,
    /// Fallback chain: a failing mode falls back to the entry after it.
    pub fallback_order: Vec<RendererKind>,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            fallback_after_failed_frames: 3,
            fallback_order: vec![
                RendererKind::Forward,
                RendererKind::Deferred,
                RendererKind::Debug,
            ],
        }
    }
}

impl FailurePolicy {
    /// Decide how to handle `failure` from the `active` mode.
    ///
    /// `retries` is how many times the current frame was already retried;
    /// `failed_frames` counts consecutive failed frames including this one.
    pub fn decide(
        &self,
        failure: &RenderFailure,
        active: RendererKind,
        retries: u32,
        failed_frames: u32,
    ) -> FailureResponse {
        if !failure.is_retryable() {
            return FailureResponse::Halt;
        }
        if retries < self.max_retries {
            return FailureResponse::Retry;
        }
        if failed_frames >= self.fallback_after_failed_frames {
            if let Some(next) = self.fallback_for(active) {
                return FailureResponse::FallBack(next);
            }
        }
        FailureResponse::SkipFrame
    }

    /// The mode after `active` in the fallback chain. A mode missing from the
    /// chain falls back to its first entry.
    pub fn fallback_for(&self, active: RendererKind) -> Option<RendererKind> {
        match self.fallback_order.iter().position(|k| *k == active) {
            Some(i) => self.fallback_order.get(i + 1).copied(),
            None => self.fallback_order.first().copied(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.fallback_after_failed_frames == 0 {
            return Err("fallback_after_failed_frames must be at least 1".into());
        }
        for (i, kind) in self.fallback_order.iter().enumerate() {
            if self.fallback_order[..i].contains(kind) {
                return Err(format!("fallback_order lists {kind} twice"));
            }
        }
        Ok(())
    }
}
