use serde::{Deserialize, Serialize};

use super::{
    DebugRenderer, DebugSettings, DeferredRenderer, DeferredSettings, ForwardRenderer,
    ForwardSettings,
};
use crate::{RendererHandle, RendererKind, RendererRef};

/// Per-mode renderer settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    pub debug: DebugSettings,
    pub deferred: DeferredSettings,
    pub forward: ForwardSettings,
}

/// Owner of one renderer per mode.
///
/// The set outlives every handle it gives out; handles only borrow. Switching
/// modes means dropping the current handle and asking for another.
#[derive(Debug)]
pub struct RendererSet {
    debug: DebugRenderer,
    deferred: DeferredRenderer,
    forward: ForwardRenderer,
}

impl RendererSet {
    pub fn new(settings: &RendererSettings) -> Self {
        Self {
            debug: DebugRenderer::new(settings.debug.clone()),
            deferred: DeferredRenderer::new(settings.deferred.clone()),
            forward: ForwardRenderer::new(settings.forward.clone()),
        }
    }

    /// Borrow the renderer for `kind` behind a handle.
    pub fn handle(&mut self, kind: RendererKind) -> RendererHandle<'_> {
        match kind {
            RendererKind::Debug => RendererHandle::debug(&mut self.debug),
            RendererKind::Deferred => RendererHandle::deferred(&mut self.deferred),
            RendererKind::Forward => RendererHandle::forward(&mut self.forward),
        }
    }

    /// One handle per mode, in [`RendererKind::ALL`] order.
    pub fn handles(&mut self) -> [RendererHandle<'_>; 3] {
        let Self {
            debug,
            deferred,
            forward,
        } = self;
        [
            RendererHandle::debug(debug),
            RendererHandle::deferred(deferred),
            RendererHandle::forward(forward),
        ]
    }

    /// Read-only view of the renderer for `kind`, for settings panels.
    pub fn get(&self, kind: RendererKind) -> RendererRef<'_> {
        match kind {
            RendererKind::Debug => RendererRef::Debug(&self.debug),
            RendererKind::Deferred => RendererRef::Deferred(&self.deferred),
            RendererKind::Forward => RendererRef::Forward(&self.forward),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_matches_requested_kind() {
        let mut set = RendererSet::new(&RendererSettings::default());
        for kind in RendererKind::ALL {
            assert_eq!(set.handle(kind).kind(), kind);
            assert_eq!(set.get(kind).kind(), kind);
        }
    }

    #[test]
    fn handles_cover_every_kind_in_order() {
        let mut set = RendererSet::new(&RendererSettings::default());
        let kinds: Vec<_> = set.handles().iter().map(RendererHandle::kind).collect();
        assert_eq!(kinds, RendererKind::ALL.to_vec());
    }

    #[test]
    fn settings_reach_renderers() {
        let settings = RendererSettings {
            forward: ForwardSettings {
                msaa_samples: 8,
                ..ForwardSettings::default()
            },
            ..RendererSettings::default()
        };
        let set = RendererSet::new(&settings);
        let RendererRef::Forward(forward) = set.get(RendererKind::Forward) else {
            panic!("expected forward renderer");
        };
        assert_eq!(forward.settings().msaa_samples, 8);
    }
}
