use scenebox_common::NodeId;
use scenebox_scene::{NodeKind, Scene};

/// Scene inspector for developer tooling.
///
/// Read-only queries against the scene for debugging and the sandbox UI.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the scene.
    pub fn summary(scene: &Scene) -> SceneSummary {
        SceneSummary {
            revision: scene.revision(),
            nodes: scene.node_count(),
            meshes: scene.meshes().count(),
            lights: scene.lights().count(),
            triangles: scene
                .meshes()
                .map(|(_, n)| match n.kind {
                    NodeKind::Mesh { triangles } => u64::from(triangles),
                    _ => 0,
                })
                .sum(),
            pending_changes: scene.changes().len(),
        }
    }

    /// Details of a single node.
    pub fn inspect_node(scene: &Scene, id: NodeId) -> Option<NodeInfo> {
        scene.get(id).map(|node| {
            let p = node.transform.position;
            let s = node.transform.scale;
            NodeInfo {
                id,
                name: node.name.clone(),
                kind: node.kind,
                position: [p.x, p.y, p.z],
                scale: [s.x, s.y, s.z],
            }
        })
    }

    /// Ids of every node, in scene order.
    pub fn list_nodes(scene: &Scene) -> Vec<NodeId> {
        scene.nodes().keys().copied().collect()
    }
}

/// Summary of scene state for the inspector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSummary {
    pub revision: u64,
    pub nodes: usize,
    pub meshes: usize,
    pub lights: usize,
    pub triangles: u64,
    pub pending_changes: usize,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: revision={} nodes={} meshes={} lights={} triangles={} pending_changes={}",
            self.revision,
            self.nodes,
            self.meshes,
            self.lights,
            self.triangles,
            self.pending_changes
        )
    }
}

/// Detailed info about a single node.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub position: [f32; 3],
    pub scale: [f32; 3],
}

impl std::fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Node [{}] {} pos=({:.2}, {:.2}, {:.2}) scale=({:.2}, {:.2}, {:.2})",
            self.id,
            self.name,
            self.position[0],
            self.position[1],
            self.position[2],
            self.scale[0],
            self.scale[1],
            self.scale[2],
        )
    }
}
