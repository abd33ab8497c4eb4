use glam::Vec3;

use crate::scene::raycast::Collider;
use crate::scene::transform::Transform;

/// Prefab node: plain data, children referenced by index.
#[derive(Debug, Clone)]
pub struct PrefabNode {
    pub name: Option<String>,
    pub transform: Transform,
    /// Indices of the children in [`Prefab::nodes`].
    pub children_indices: Vec<usize>,
    /// Pick volume. Nodes carrying one are treated as meshes.
    pub collider: Option<Collider>,
}

impl PrefabNode {
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: None,
            transform: Transform::new(),
            children_indices: Vec::new(),
            collider: None,
        }
    }

    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::new()
        }
    }

    #[must_use]
    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.collider = Some(collider);
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    #[inline]
    #[must_use]
    pub fn is_mesh(&self) -> bool {
        self.collider.is_some()
    }
}

impl Default for PrefabNode {
    fn default() -> Self {
        Self::new()
    }
}

/// Loaded asset hierarchy, independent of any [`Scene`](crate::scene::Scene).
///
/// An asset loader produces a `Prefab` off the frame loop and sends it to the
/// viewer; [`Scene::instantiate`](crate::scene::Scene::instantiate) turns it
/// into live nodes. It holds no handles, so it can cross threads freely.
#[derive(Debug, Clone, Default)]
pub struct Prefab {
    /// All nodes, flattened.
    pub nodes: Vec<PrefabNode>,
    /// Indices of the top-level nodes in `nodes`.
    pub root_indices: Vec<usize>,
}

impl Prefab {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A single mesh node with a spherical pick volume, the shape most planet
    /// models reduce to.
    #[must_use]
    pub fn sphere(name: &str, radius: f32) -> Self {
        let mut prefab = Self::new();
        let root = prefab.push(PrefabNode::named(name).with_collider(Collider::sphere(radius)));
        prefab.root_indices.push(root);
        prefab
    }

    /// Appends a node and returns its index.
    pub fn push(&mut self, node: PrefabNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Appends `node` as a child of `parent` and returns its index.
    pub fn push_child(&mut self, parent: usize, node: PrefabNode) -> usize {
        let index = self.push(node);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children_indices.push(index);
        }
        index
    }

    /// Iterates over the mesh nodes (nodes carrying a pick volume).
    pub fn meshes(&self) -> impl Iterator<Item = &PrefabNode> {
        self.nodes.iter().filter(|node| node.is_mesh())
    }
}
