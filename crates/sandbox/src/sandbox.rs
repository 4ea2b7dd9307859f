use scenebox_input::SandboxAction;
use scenebox_render::{
    RenderFailure, RenderView, RendererKind, RendererRef, RendererSet, RendererVisitor,
};
use scenebox_scene::Scene;
use scenebox_tools::{DiagnosticsVisitor, RendererDiagnostics};

use crate::{
    FailurePolicy, FailureResponse, FrameReport, FrameVisitor, InitializeVisitor, ResizeVisitor,
    SandboxConfig, SandboxError, ShutdownVisitor,
};

/// Result of one call to [`Sandbox::render_frame`].
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    Rendered(FrameReport),
    /// The frame was dropped after an engine error; the mode is unchanged.
    Skipped {
        kind: RendererKind,
        failure: RenderFailure,
    },
    /// The frame was dropped and the sandbox switched to another mode.
    FellBack {
        from: RendererKind,
        to: RendererKind,
        failure: RenderFailure,
    },
}

/// Result of [`Sandbox::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Frame(FrameOutcome),
    Switched { from: RendererKind, to: RendererKind },
    Initialized(RendererKind),
    Diagnostics(RendererDiagnostics),
    Resized { width: u32, height: u32 },
    ShutDown,
    Nothing,
}

/// The sandbox render loop.
///
/// Owns the scene and one renderer per mode. Handles are created per call and
/// dropped before the call returns, so switching modes never races a dispatch.
pub struct Sandbox {
    scene: Scene,
    renderers: RendererSet,
    active: RendererKind,
    view: RenderView,
    policy: FailurePolicy,
    auto_initialize: bool,
    shutdown_on_switch: bool,
    frames_rendered: u64,
    failed_frames: u32,
}

impl Sandbox {
    /// Build a sandbox with a generated demo scene.
    pub fn new(config: SandboxConfig) -> Result<Self, SandboxError> {
        let scene = Scene::demo(config.scene_meshes);
        Self::with_scene(config, scene)
    }

    pub fn with_scene(config: SandboxConfig, scene: Scene) -> Result<Self, SandboxError> {
        config.validate()?;
        let mut sandbox = Self {
            scene,
            renderers: RendererSet::new(&config.renderers),
            active: config.initial_mode,
            view: config.view,
            policy: config.policy,
            auto_initialize: config.auto_initialize,
            shutdown_on_switch: config.shutdown_on_switch,
            frames_rendered: 0,
            failed_frames: 0,
        };
        if sandbox.auto_initialize {
            sandbox.initialize_active()?;
        }
        tracing::info!(mode = %sandbox.active, nodes = sandbox.scene.node_count(), "sandbox ready");
        Ok(sandbox)
    }

    pub fn active_mode(&self) -> RendererKind {
        self.active
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn view(&self) -> &RenderView {
        &self.view
    }

    pub fn set_view(&mut self, view: RenderView) {
        self.view = view;
    }

    /// Frames rendered successfully, across all modes.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Consecutive failed frames in the current mode.
    pub fn failed_frames(&self) -> u32 {
        self.failed_frames
    }

    /// Read-only view of the active renderer, for settings panels.
    pub fn inspect_active(&self) -> RendererRef<'_> {
        self.renderers.get(self.active)
    }

    /// Render one frame with the active mode, applying the failure policy.
    ///
    /// Engine errors from the active renderer never escape: they become
    /// retries, skipped frames or a fallback. A contract violation halts the
    /// frame and is returned unchanged inside [`SandboxError::Render`].
    ///
    /// A fallback goes through [`Sandbox::switch_mode`]. If the fallback
    /// renderer then fails to initialize, its failure is returned for the
    /// fallback kind and the fallback mode stays active. The engine error that
    /// triggered the fallback is only logged.
    pub fn render_frame(&mut self) -> Result<FrameOutcome, SandboxError> {
        let index = self.frames_rendered + 1;
        let _span = tracing::debug_span!("frame", index, mode = %self.active).entered();
        let mut retries = 0;
        loop {
            let mut visitor = FrameVisitor::new(&self.scene, &self.view, index);
            let failure = match self.renderers.handle(self.active).dispatch(&mut visitor) {
                Ok(report) => {
                    self.frames_rendered = index;
                    self.failed_frames = 0;
                    return Ok(FrameOutcome::Rendered(report));
                }
                Err(failure) => failure,
            };

            let failed_frames = self.failed_frames + 1;
            match self
                .policy
                .decide(&failure, self.active, retries, failed_frames)
            {
                FailureResponse::Retry => {
                    retries += 1;
                    tracing::warn!(retries, %failure, "retrying frame");
                }
                FailureResponse::SkipFrame => {
                    self.failed_frames = failed_frames;
                    tracing::warn!(failed_frames, %failure, "frame skipped");
                    return Ok(FrameOutcome::Skipped {
                        kind: self.active,
                        failure,
                    });
                }
                FailureResponse::FallBack(to) => {
                    let from = self.active;
                    tracing::warn!(%from, %to, %failure, "falling back to another renderer");
                    self.switch_mode(to)?;
                    return Ok(FrameOutcome::FellBack { from, to, failure });
                }
                FailureResponse::Halt => {
                    tracing::error!(mode = %self.active, %failure, "renderer contract violated");
                    return Err(SandboxError::render(self.active, failure));
                }
            }
        }
    }

    /// Make `to` the active mode. The old handle is gone by the time this runs.
    pub fn switch_mode(&mut self, to: RendererKind) -> Result<(), SandboxError> {
        let from = self.active;
        if from == to {
            return Ok(());
        }
        if self.shutdown_on_switch {
            self.dispatch_to(from, &mut ShutdownVisitor)?;
        }
        self.active = to;
        self.failed_frames = 0;
        tracing::info!(%from, %to, "renderer mode switched");
        if self.auto_initialize {
            self.initialize_active()?;
        }
        Ok(())
    }

    pub fn initialize_active(&mut self) -> Result<(), SandboxError> {
        self.dispatch_to(self.active, &mut InitializeVisitor)
    }

    pub fn diagnostics(&mut self) -> Result<RendererDiagnostics, SandboxError> {
        self.dispatch_to(self.active, &mut DiagnosticsVisitor)
    }

    /// Diagnostics for every mode, in [`RendererKind::ALL`] order.
    pub fn diagnostics_all(&mut self) -> Result<Vec<RendererDiagnostics>, SandboxError> {
        self.renderers
            .handles()
            .iter_mut()
            .map(|handle| {
                handle
                    .dispatch(&mut DiagnosticsVisitor)
                    .map_err(|failure| SandboxError::render(handle.kind(), failure))
            })
            .collect()
    }

    /// Resize every renderer's target.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), SandboxError> {
        let mut visitor = ResizeVisitor { width, height };
        for mut handle in self.renderers.handles() {
            handle
                .dispatch(&mut visitor)
                .map_err(|failure| SandboxError::render(handle.kind(), failure))?;
        }
        Ok(())
    }

    /// Shut every renderer down.
    pub fn shutdown(&mut self) -> Result<(), SandboxError> {
        for mut handle in self.renderers.handles() {
            handle
                .dispatch(&mut ShutdownVisitor)
                .map_err(|failure| SandboxError::render(handle.kind(), failure))?;
        }
        tracing::info!(frames = self.frames_rendered, "sandbox shut down");
        Ok(())
    }

    pub fn apply(&mut self, action: SandboxAction) -> Result<ActionOutcome, SandboxError> {
        tracing::debug!(%action, "applying action");
        match action {
            SandboxAction::RenderFrame => self.render_frame().map(ActionOutcome::Frame),
            SandboxAction::SwitchMode(to) => {
                let from = self.active;
                self.switch_mode(to)?;
                Ok(ActionOutcome::Switched { from, to })
            }
            SandboxAction::Initialize => {
                self.initialize_active()?;
                Ok(ActionOutcome::Initialized(self.active))
            }
            SandboxAction::Diagnose => self.diagnostics().map(ActionOutcome::Diagnostics),
            SandboxAction::Resize { width, height } => {
                self.resize(width, height)?;
                Ok(ActionOutcome::Resized { width, height })
            }
            SandboxAction::Shutdown => {
                self.shutdown()?;
                Ok(ActionOutcome::ShutDown)
            }
            SandboxAction::Noop => Ok(ActionOutcome::Nothing),
        }
    }

    fn dispatch_to<V>(
        &mut self,
        kind: RendererKind,
        visitor: &mut V,
    ) -> Result<V::Output, SandboxError>
    where
        V: RendererVisitor,
    {
        self.renderers
            .handle(kind)
            .dispatch(visitor)
            .map_err(|failure| SandboxError::render(kind, failure))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenebox_render::DeferredSettings;

    fn config(mode: RendererKind) -> SandboxConfig {
        SandboxConfig {
            initial_mode: mode,
            scene_meshes: 4,
            ..SandboxConfig::default()
        }
    }

    #[test]
    fn renders_with_initial_mode() {
        let mut sandbox = Sandbox::new(config(RendererKind::Forward)).unwrap();
        let outcome = sandbox.render_frame().unwrap();
        let FrameOutcome::Rendered(report) = outcome else {
            panic!("expected a rendered frame, got {outcome:?}");
        };
        assert_eq!(report.kind, RendererKind::Forward);
        assert_eq!(report.frame_index, 1);
        assert_eq!(report.draw_calls, 4);
        assert_eq!(sandbox.frames_rendered(), 1);
    }

    #[test]
    fn contract_violation_halts_without_retry() {
        let mut sandbox = Sandbox::new(SandboxConfig {
            auto_initialize: false,
            ..config(RendererKind::Debug)
        })
        .unwrap();

        let err = sandbox.render_frame().unwrap_err();
        assert_eq!(
            err.failure(),
            Some(&RenderFailure::contract("debug renderer not initialized"))
        );
        assert!(matches!(
            err,
            SandboxError::Render {
                kind: RendererKind::Debug,
                ..
            }
        ));
        assert_eq!(sandbox.active_mode(), RendererKind::Debug);
        assert_eq!(sandbox.failed_frames(), 0);
        assert_eq!(sandbox.frames_rendered(), 0);
    }

    #[test]
    fn engine_errors_skip_then_fall_back() {
        let mut cfg = config(RendererKind::Deferred);
        cfg.renderers.deferred = DeferredSettings {
            gbuffer_budget_bytes: 1,
            ..DeferredSettings::default()
        };
        cfg.policy.fallback_after_failed_frames = 2;
        let mut sandbox = Sandbox::new(cfg).unwrap();

        let first = sandbox.render_frame().unwrap();
        assert!(matches!(
            first,
            FrameOutcome::Skipped {
                kind: RendererKind::Deferred,
                failure: RenderFailure::Engine(_),
            }
        ));
        assert_eq!(sandbox.failed_frames(), 1);

        let second = sandbox.render_frame().unwrap();
        assert!(matches!(
            second,
            FrameOutcome::FellBack {
                from: RendererKind::Deferred,
                to: RendererKind::Debug,
                ..
            }
        ));
        assert_eq!(sandbox.active_mode(), RendererKind::Debug);
        assert_eq!(sandbox.failed_frames(), 0);

        assert!(matches!(
            sandbox.render_frame().unwrap(),
            FrameOutcome::Rendered(_)
        ));
    }

    #[test]
    fn failed_fallback_initialization_returns_fallback_failure() {
        let mut cfg = config(RendererKind::Deferred);
        cfg.renderers.deferred.gbuffer_budget_bytes = 1;
        cfg.renderers.debug.max_lines = 0;
        cfg.policy.max_retries = 0;
        cfg.policy.fallback_after_failed_frames = 1;
        let mut sandbox = Sandbox::new(cfg).unwrap();

        let err = sandbox.render_frame().unwrap_err();
        assert!(matches!(
            err,
            SandboxError::Render {
                kind: RendererKind::Debug,
                failure: RenderFailure::ContractViolation(_),
            }
        ));
        assert_eq!(sandbox.active_mode(), RendererKind::Debug);
        assert!(!sandbox.inspect_active().is_initialized());
    }

    #[test]
    fn resize_to_empty_target_is_rejected_by_deferred() {
        let mut sandbox = Sandbox::new(config(RendererKind::Forward)).unwrap();
        let action = "resize:0x0".parse::<SandboxAction>().unwrap();
        let err = sandbox.apply(action).unwrap_err();
        assert!(matches!(
            err,
            SandboxError::Render {
                kind: RendererKind::Deferred,
                failure: RenderFailure::ContractViolation(_),
            }
        ));
        let scenebox_render::RendererRef::Deferred(deferred) =
            sandbox.renderers.get(RendererKind::Deferred)
        else {
            panic!("expected deferred renderer");
        };
        assert_eq!(deferred.stats().width, 1280);
    }

    #[test]
    fn oversized_resize_skips_the_frame() {
        let mut sandbox = Sandbox::new(config(RendererKind::Deferred)).unwrap();
        let actions = scenebox_input::parse_script("resize:4294967295x4294967295,frame").unwrap();
        let outcomes: Vec<_> = actions
            .into_iter()
            .map(|a| sandbox.apply(a).unwrap())
            .collect();

        assert!(matches!(
            &outcomes[1],
            ActionOutcome::Frame(FrameOutcome::Skipped {
                kind: RendererKind::Deferred,
                failure: RenderFailure::Engine(_),
            })
        ));
        assert_eq!(sandbox.active_mode(), RendererKind::Deferred);
    }

    #[test]
    fn switch_mode_initializes_incoming_renderer() {
        let mut sandbox = Sandbox::new(config(RendererKind::Forward)).unwrap();
        assert!(!sandbox.renderers.get(RendererKind::Deferred).is_initialized());

        sandbox.switch_mode(RendererKind::Deferred).unwrap();
        assert_eq!(sandbox.active_mode(), RendererKind::Deferred);
        assert!(sandbox.inspect_active().is_initialized());
        // The outgoing renderer stays up unless configured otherwise.
        assert!(sandbox.renderers.get(RendererKind::Forward).is_initialized());
    }

    #[test]
    fn shutdown_on_switch_stops_outgoing_renderer() {
        let mut sandbox = Sandbox::new(SandboxConfig {
            shutdown_on_switch: true,
            ..config(RendererKind::Forward)
        })
        .unwrap();
        sandbox.switch_mode(RendererKind::Debug).unwrap();
        assert!(!sandbox.renderers.get(RendererKind::Forward).is_initialized());
        assert!(sandbox.inspect_active().is_initialized());
    }

    #[test]
    fn scene_edits_show_up_in_next_frame() {
        let mut sandbox = Sandbox::new(config(RendererKind::Forward)).unwrap();
        sandbox.scene_mut().spawn(
            "late",
            scenebox_common::Transform::default(),
            scenebox_scene::NodeKind::Mesh { triangles: 2 },
        );
        let FrameOutcome::Rendered(report) = sandbox.render_frame().unwrap() else {
            panic!("expected a rendered frame");
        };
        assert_eq!(report.draw_calls, 5);
    }

    #[test]
    fn script_of_actions() {
        let mut sandbox = Sandbox::new(config(RendererKind::Debug)).unwrap();
        let actions =
            scenebox_input::parse_script("frame,switch:deferred,resize:640x480,frame,diag,shutdown")
                .unwrap();
        let outcomes: Vec<_> = actions
            .into_iter()
            .map(|a| sandbox.apply(a).unwrap())
            .collect();

        assert!(matches!(outcomes[0], ActionOutcome::Frame(FrameOutcome::Rendered(_))));
        assert_eq!(
            outcomes[1],
            ActionOutcome::Switched {
                from: RendererKind::Debug,
                to: RendererKind::Deferred
            }
        );
        let ActionOutcome::Frame(FrameOutcome::Rendered(report)) = &outcomes[3] else {
            panic!("expected a deferred frame");
        };
        assert!(report.detail.contains(&format!("gbuffer_bytes={}", 640 * 480 * 16)));
        let ActionOutcome::Diagnostics(diag) = &outcomes[4] else {
            panic!("expected diagnostics");
        };
        assert_eq!(diag.kind, RendererKind::Deferred);
        assert_eq!(diag.frames_rendered, 1);
        assert_eq!(outcomes[5], ActionOutcome::ShutDown);
        assert!(!sandbox.inspect_active().is_initialized());
    }

    #[test]
    fn diagnostics_all_covers_every_mode() {
        let mut sandbox = Sandbox::new(config(RendererKind::Forward)).unwrap();
        let all = sandbox.diagnostics_all().unwrap();
        let kinds: Vec<_> = all.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, RendererKind::ALL.to_vec());
        assert!(all[2].initialized);
        assert!(!all[0].initialized);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut cfg = config(RendererKind::Debug);
        cfg.policy.fallback_order = vec![RendererKind::Debug];
        assert!(matches!(
            Sandbox::new(cfg),
            Err(SandboxError::Config(_))
        ));
    }

    #[test]
    fn bad_settings_surface_on_initialize() {
        let mut cfg = config(RendererKind::Forward);
        cfg.renderers.forward.msaa_samples = 3;
        let err = Sandbox::new(cfg).err().unwrap();
        assert!(matches!(
            err.failure(),
            Some(RenderFailure::ContractViolation(_))
        ));
    }
}
