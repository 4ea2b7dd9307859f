use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::RenderFailure;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 10.0, 10.0),
            target: Vec3::ZERO,
            fov_degrees: 60.0,
        }
    }
}

impl RenderView {
    /// Every renderer requires a field of view in (0, 180) and an eye distinct
    /// from the target.
    pub fn validate(&self) -> Result<(), RenderFailure> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(RenderFailure::contract(format!(
                "field of view {} is outside (0, 180)",
                self.fov_degrees
            )));
        }
        if self.eye.distance_squared(self.target) == 0.0 {
            return Err(RenderFailure::contract("camera eye and target coincide"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_view_default() {
        let view = RenderView::default();
        assert_eq!(view.fov_degrees, 60.0);
        assert_eq!(view.target, Vec3::ZERO);
        assert!(view.validate().is_ok());
    }

    #[test]
    fn bad_fov_is_contract_violation() {
        let view = RenderView {
            fov_degrees: 180.0,
            ..RenderView::default()
        };
        assert!(matches!(
            view.validate(),
            Err(RenderFailure::ContractViolation(_))
        ));
    }

    #[test]
    fn degenerate_camera_is_contract_violation() {
        let view = RenderView {
            eye: Vec3::ZERO,
            ..RenderView::default()
        };
        assert!(!view.validate().unwrap_err().is_retryable());
    }
}
