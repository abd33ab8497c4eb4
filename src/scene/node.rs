use crate::scene::NodeHandle;
use crate::scene::transform::Transform;
use glam::{Affine3A, Vec3};

/// A render node in the scene graph.
///
/// Only the hierarchy, the transform and the visibility flag live here.
/// Names and pick colliders are stored in the [`Scene`](crate::scene::Scene)'s
/// component maps, keyed by [`NodeHandle`].
///
/// # Hierarchy
///
/// - `parent`: handle of the parent node (`None` for roots)
/// - `children`: child handles in insertion order
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,

    /// Invisible nodes are neither drawn nor hit by picking rays.
    pub visible: bool,
}

impl Node {
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            visible: true,
        }
    }

    /// Creates a node already carrying `transform`.
    #[must_use]
    pub fn with_transform(transform: Transform) -> Self {
        Self {
            transform,
            ..Self::new()
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// Sets the parent link only. Prefer [`Scene::attach`](crate::scene::Scene::attach),
    /// which keeps both sides of the relation in sync.
    #[inline]
    pub fn set_parent(&mut self, parent: Option<NodeHandle>) {
        self.parent = parent;
    }

    /// Appends a child link only. Prefer [`Scene::attach`](crate::scene::Scene::attach).
    #[inline]
    pub fn push_child(&mut self, child: NodeHandle) {
        self.children.push(child);
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }

    /// World-space position as of the last hierarchy update.
    #[inline]
    #[must_use]
    pub fn world_position(&self) -> Vec3 {
        self.transform.world_position()
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}
