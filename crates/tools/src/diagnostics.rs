use scenebox_render::{
    DebugRenderer, DeferredRenderer, ForwardRenderer, RenderFailure, RendererKind,
    RendererVisitor,
};

/// Snapshot of one renderer's state, uniform across modes.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererDiagnostics {
    pub kind: RendererKind,
    pub initialized: bool,
    pub frames_rendered: u64,
    /// Mode-specific key/value pairs, in display order.
    pub entries: Vec<(String, String)>,
}

impl RendererDiagnostics {
    fn new(kind: RendererKind, initialized: bool, frames_rendered: u64) -> Self {
        Self {
            kind,
            initialized,
            frames_rendered,
            entries: Vec::new(),
        }
    }

    fn entry(mut self, key: &str, value: impl ToString) -> Self {
        self.entries.push((key.to_string(), value.to_string()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl std::fmt::Display for RendererDiagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Renderer: kind={} initialized={} frames={}",
            self.kind, self.initialized, self.frames_rendered
        )?;
        for (key, value) in &self.entries {
            write!(f, " {key}={value}")?;
        }
        Ok(())
    }
}

/// Collects [`RendererDiagnostics`] from whichever renderer it is dispatched to.
#[derive(Debug, Default)]
pub struct DiagnosticsVisitor;

impl RendererVisitor for DiagnosticsVisitor {
    type Output = RendererDiagnostics;

    fn visit_debug(&mut self, r: &mut DebugRenderer) -> Result<RendererDiagnostics, RenderFailure> {
        let stats = r.stats();
        Ok(
            RendererDiagnostics::new(RendererKind::Debug, r.is_initialized(), stats.frames_rendered)
                .entry("max_lines", r.settings().max_lines)
                .entry("last_output_bytes", stats.last_output_bytes)
                .entry("last_truncated_nodes", stats.last_truncated_nodes),
        )
    }

    fn visit_deferred(
        &mut self,
        r: &mut DeferredRenderer,
    ) -> Result<RendererDiagnostics, RenderFailure> {
        let stats = r.stats();
        let gbuffer = stats
            .gbuffer_bytes
            .map_or_else(|| "unallocated".to_string(), |b| b.to_string());
        Ok(RendererDiagnostics::new(
            RendererKind::Deferred,
            r.is_initialized(),
            stats.frames_rendered,
        )
        .entry("size", format!("{}x{}", stats.width, stats.height))
        .entry("attachments", r.settings().attachments)
        .entry("gbuffer_bytes", gbuffer)
        .entry("gbuffer_budget_bytes", r.settings().gbuffer_budget_bytes)
        .entry("light_cache_rebuilds", stats.light_cache_rebuilds))
    }

    fn visit_forward(
        &mut self,
        r: &mut ForwardRenderer,
    ) -> Result<RendererDiagnostics, RenderFailure> {
        let stats = r.stats();
        Ok(RendererDiagnostics::new(
            RendererKind::Forward,
            r.is_initialized(),
            stats.frames_rendered,
        )
        .entry("msaa", stats.msaa_samples)
        .entry("max_lights_per_draw", r.settings().max_lights_per_draw)
        .entry(
            "shader_variants",
            format!(
                "{}/{}",
                stats.compiled_variants.len(),
                r.settings().max_shader_variants
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenebox_render::{RenderView, RendererSet, RendererSettings};
    use scenebox_scene::Scene;

    #[test]
    fn diagnostics_report_the_dispatched_kind() {
        let mut set = RendererSet::new(&RendererSettings::default());
        for kind in RendererKind::ALL {
            let diag = set.handle(kind).dispatch(&mut DiagnosticsVisitor).unwrap();
            assert_eq!(diag.kind, kind);
            assert!(!diag.initialized);
            assert_eq!(diag.frames_rendered, 0);
        }
    }

    #[test]
    fn deferred_reports_gbuffer_state() {
        let mut deferred = DeferredRenderer::new(Default::default());
        let mut visitor = DiagnosticsVisitor;

        let before = visitor.visit_deferred(&mut deferred).unwrap();
        assert_eq!(before.get("gbuffer_bytes"), Some("unallocated"));

        deferred.initialize().unwrap();
        deferred.render(&Scene::demo(2), &RenderView::default()).unwrap();
        let after = visitor.visit_deferred(&mut deferred).unwrap();
        assert_eq!(after.frames_rendered, 1);
        assert_eq!(after.get("gbuffer_bytes"), Some("14745600"));
        assert_eq!(after.get("size"), Some("1280x720"));
    }

    #[test]
    fn forward_reports_variant_usage() {
        let mut forward = ForwardRenderer::new(Default::default());
        let diag = DiagnosticsVisitor.visit_forward(&mut forward).unwrap();
        assert_eq!(diag.get("shader_variants"), Some("0/8"));
        assert_eq!(diag.get("msaa"), Some("4"));
    }

    #[test]
    fn display_lists_entries() {
        let mut debug = DebugRenderer::new(Default::default());
        let diag = DiagnosticsVisitor.visit_debug(&mut debug).unwrap();
        let s = diag.to_string();
        assert!(s.starts_with("Renderer: kind=debug initialized=false frames=0"));
        assert!(s.contains("max_lines=64"));
    }
}
