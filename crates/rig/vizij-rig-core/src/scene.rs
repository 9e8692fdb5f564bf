//! Scene lookup contract used once at rig-load time to resolve semantic bones.

use indexmap::IndexMap;
use vizij_face_api::{math::QUAT_IDENTITY, Quat, Vec3};

/// Local transform of a scene node at the moment it was looked up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeSnapshot {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for NodeSnapshot {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: QUAT_IDENTITY,
        }
    }
}

/// Read-only view over the host's scene graph.
pub trait RigScene {
    /// Exact-name node lookup.
    fn node(&self, name: &str) -> Option<NodeSnapshot>;

    /// All node names, in scene traversal order.
    fn node_names(&self) -> Vec<String>;
}

/// In-memory scene for tests and headless hosts.
#[derive(Clone, Debug, Default)]
pub struct MemoryScene {
    nodes: IndexMap<String, NodeSnapshot>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(mut self, name: &str, snapshot: NodeSnapshot) -> Self {
        self.insert(name, snapshot);
        self
    }

    pub fn insert(&mut self, name: &str, snapshot: NodeSnapshot) {
        self.nodes.insert(name.to_string(), snapshot);
    }

    /// Overwrite a node's transform, as an animation host would between frames.
    pub fn set_rotation(&mut self, name: &str, rotation: Quat) {
        if let Some(n) = self.nodes.get_mut(name) {
            n.rotation = rotation;
        }
    }
}

impl RigScene for MemoryScene {
    fn node(&self, name: &str) -> Option<NodeSnapshot> {
        self.nodes.get(name).copied()
    }

    fn node_names(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }
}
