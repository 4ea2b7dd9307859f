use glam::Vec3;
use scenebox_common::{NodeId, Transform};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What a node contributes to a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Geometry drawn by every renderer mode.
    Mesh { triangles: u32 },
    /// Point light. Forward shades per draw, deferred per light volume.
    Light { intensity: f32, range: f32 },
    /// Grouping node with no visual output.
    Empty,
}

/// A single node stored in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
}

impl SceneNode {
    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh { .. })
    }

    pub fn is_light(&self) -> bool {
        matches!(self.kind, NodeKind::Light { .. })
    }
}

/// Change notification record produced by every scene mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneChange {
    Added { id: NodeId, revision: u64 },
    Removed { id: NodeId, revision: u64 },
    Moved {
        id: NodeId,
        old: Transform,
        new: Transform,
        revision: u64,
    },
}

/// The scene graph shared by all renderer modes.
///
/// Nodes live in a `BTreeMap` so every renderer walks them in the same order.
/// `revision` lets renderers cache derived data (light lists, draw batches)
/// and rebuild it only when the scene actually changed.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: BTreeMap<NodeId, SceneNode>,
    revision: u64,
    changes: Vec<SceneChange>,
}

impl Scene {
    /// Create an empty scene at revision 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// A grid of `mesh_count` cubes lit by one light per eight meshes (at least one).
    pub fn demo(mesh_count: usize) -> Self {
        let mut scene = Self::new();
        let side = (mesh_count as f32).sqrt().ceil().max(1.0) as usize;
        for i in 0..mesh_count {
            let x = (i % side) as f32 * 2.0;
            let z = (i / side) as f32 * 2.0;
            scene.spawn(
                format!("cube_{i}"),
                Transform::at(Vec3::new(x, 0.0, z)),
                NodeKind::Mesh { triangles: 12 },
            );
        }
        let light_count = mesh_count.div_ceil(8).max(1);
        for i in 0..light_count {
            let x = (i % side) as f32 * 4.0;
            scene.spawn(
                format!("light_{i}"),
                Transform::at(Vec3::new(x, 5.0, x)),
                NodeKind::Light {
                    intensity: 1.0,
                    range: 12.0,
                },
            );
        }
        scene
    }

    /// Current revision. Incremented by every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Read-only access to all nodes in deterministic order.
    pub fn nodes(&self) -> &BTreeMap<NodeId, SceneNode> {
        &self.nodes
    }

    pub fn meshes(&self) -> impl Iterator<Item = (&NodeId, &SceneNode)> {
        self.nodes.iter().filter(|(_, n)| n.is_mesh())
    }

    pub fn lights(&self) -> impl Iterator<Item = (&NodeId, &SceneNode)> {
        self.nodes.iter().filter(|(_, n)| n.is_light())
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Pending change records since the last drain.
    pub fn changes(&self) -> &[SceneChange] {
        &self.changes
    }

    /// Drain pending change records.
    pub fn drain_changes(&mut self) -> Vec<SceneChange> {
        std::mem::take(&mut self.changes)
    }

    /// Add a node and return its id.
    pub fn spawn(
        &mut self,
        name: impl Into<String>,
        transform: Transform,
        kind: NodeKind,
    ) -> NodeId {
        let id = NodeId::new();
        self.spawn_with_id(id, name, transform, kind);
        id
    }

    /// Add a node under a caller-chosen id. Replaces any node with the same id.
    pub fn spawn_with_id(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        transform: Transform,
        kind: NodeKind,
    ) {
        let node = SceneNode {
            name: name.into(),
            transform,
            kind,
        };
        self.nodes.insert(id, node);
        self.revision += 1;
        self.changes.push(SceneChange::Added {
            id,
            revision: self.revision,
        });
        tracing::trace!(%id, revision = self.revision, "node added");
    }

    /// Remove a node. Returns it if it existed.
    pub fn despawn(&mut self, id: NodeId) -> Option<SceneNode> {
        let node = self.nodes.remove(&id)?;
        self.revision += 1;
        self.changes.push(SceneChange::Removed {
            id,
            revision: self.revision,
        });
        Some(node)
    }

    /// Move a node. Returns false if the node does not exist.
    pub fn set_transform(&mut self, id: NodeId, new: Transform) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        let old = node.transform;
        node.transform = new;
        self.revision += 1;
        self.changes.push(SceneChange::Moved {
            id,
            old,
            new,
            revision: self.revision,
        });
        true
    }
}
