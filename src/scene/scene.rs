use glam::Vec3;
use slotmap::{SecondaryMap, SlotMap, SparseSecondaryMap};

use crate::scene::NodeHandle;
use crate::scene::camera::Camera;
use crate::scene::node::Node;
use crate::scene::prefab::Prefab;
use crate::scene::raycast::{Collider, Ray};
use crate::scene::transform::Transform;
use crate::scene::transform_system;

/// A ray hit on a render node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub node: NodeHandle,
    /// Distance from the ray origin.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
}

/// Scene graph.
///
/// Pure CPU-side data: the node hierarchy plus component maps for names, pick
/// colliders and cameras. Rendering reads from it; picking queries it through
/// [`Scene::intersect`].
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    pub names: SparseSecondaryMap<NodeHandle, String>,
    pub colliders: SparseSecondaryMap<NodeHandle, Collider>,
    pub cameras: SparseSecondaryMap<NodeHandle, Camera>,

    pub active_camera: Option<NodeHandle>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            names: SparseSecondaryMap::new(),
            colliders: SparseSecondaryMap::new(),
            cameras: SparseSecondaryMap::new(),
            active_camera: None,
        }
    }

    /// Starts building a node with a fluent API.
    pub fn build_node(&'_ mut self, name: &str) -> NodeBuilder<'_> {
        NodeBuilder::new(self, name)
    }

    /// Creates an empty root node.
    pub fn create_node(&mut self) -> NodeHandle {
        self.add_node(Node::new())
    }

    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        let handle = self.create_node();
        self.set_name(handle, name);
        handle
    }

    /// Inserts `node` as a scene root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Inserts `child` directly under `parent`. Falls back to a root node when
    /// `parent` no longer exists.
    pub fn add_to_parent(&mut self, child: Node, parent: NodeHandle) -> NodeHandle {
        let handle = self.nodes.insert(child);

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(handle);
            self.nodes[handle].parent = Some(parent);
        } else {
            log::warn!("Parent node not found, inserting child as a root");
            self.root_nodes.push(handle);
        }

        handle
    }

    /// Removes `handle` together with its whole subtree.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        let Some(parent) = self.nodes.get(handle).map(Node::parent) else {
            return;
        };

        match parent {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(parent)
                    && let Some(pos) = p.children.iter().position(|&x| x == handle)
                {
                    p.children.remove(pos);
                }
            }
            None => self.root_nodes.retain(|&x| x != handle),
        }

        for victim in self.descendants(handle) {
            self.nodes.remove(victim);
            self.names.remove(victim);
            self.colliders.remove(victim);
            self.cameras.remove(victim);
            if self.active_camera == Some(victim) {
                self.active_camera = None;
            }
        }
    }

    /// Re-parents `child` under `parent`.
    ///
    /// Attaching a node to itself or to one of its own descendants is refused
    /// with a warning, keeping the graph acyclic.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            log::error!("Node not found during attach!");
            return;
        }
        if self.is_ancestor(child, parent) {
            log::warn!("Cannot attach a node below its own descendant!");
            return;
        }

        let old_parent = self.nodes[child].parent;
        if let Some(p) = old_parent {
            if let Some(n) = self.nodes.get_mut(p)
                && let Some(i) = n.children.iter().position(|&x| x == child)
            {
                n.children.remove(i);
            }
        } else {
            self.root_nodes.retain(|&x| x != child);
        }

        self.nodes[parent].children.push(child);

        let c = &mut self.nodes[child];
        c.parent = Some(parent);
        c.transform.mark_dirty();
    }

    /// Whether `ancestor` lies on the parent chain of `node`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = self.nodes.get(node).and_then(Node::parent);
        while let Some(handle) = current {
            if handle == ancestor {
                return true;
            }
            current = self.nodes.get(handle).and_then(Node::parent);
        }
        false
    }

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    // ========================================================================
    // Components
    // ========================================================================

    pub fn set_name(&mut self, handle: NodeHandle, name: &str) {
        if self.nodes.contains_key(handle) {
            self.names.insert(handle, name.to_string());
        }
    }

    #[must_use]
    pub fn get_name(&self, handle: NodeHandle) -> Option<&str> {
        self.names.get(handle).map(String::as_str)
    }

    /// First node carrying `name`, in insertion order.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NodeHandle> {
        self.nodes
            .keys()
            .find(|&handle| self.get_name(handle) == Some(name))
    }

    /// Makes `handle` pickable with the given node-local volume.
    pub fn set_collider(&mut self, handle: NodeHandle, collider: Collider) {
        if self.nodes.contains_key(handle) {
            self.colliders.insert(handle, collider);
        }
    }

    #[must_use]
    pub fn get_collider(&self, handle: NodeHandle) -> Option<&Collider> {
        self.colliders.get(handle)
    }

    pub fn set_camera(&mut self, handle: NodeHandle, camera: Camera) {
        if self.nodes.contains_key(handle) {
            self.cameras.insert(handle, camera);
            if let Some(node) = self.nodes.get_mut(handle) {
                node.transform.mark_dirty();
            }
        }
    }

    #[must_use]
    pub fn get_camera(&self, handle: NodeHandle) -> Option<&Camera> {
        self.cameras.get(handle)
    }

    /// Adds a root node carrying `camera`.
    pub fn add_camera(&mut self, camera: Camera) -> NodeHandle {
        let handle = self.create_node_with_name("Camera");
        self.set_camera(handle, camera);
        handle
    }

    #[must_use]
    pub fn main_camera(&self) -> Option<&Camera> {
        self.active_camera.and_then(|handle| self.cameras.get(handle))
    }

    pub fn query_camera_bundle(&mut self, handle: NodeHandle) -> Option<(&mut Transform, &mut Camera)> {
        let camera = self.cameras.get_mut(handle)?;
        let transform = &mut self.nodes.get_mut(handle)?.transform;
        Some((transform, camera))
    }

    // ========================================================================
    // Hierarchy queries
    // ========================================================================

    /// `root` followed by all of its descendants in depth-first pre-order.
    /// Empty if `root` does not exist.
    #[must_use]
    pub fn descendants(&self, root: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        if !self.nodes.contains_key(root) {
            return out;
        }
        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            out.push(handle);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// World-space position of `handle` as of the last matrix update.
    #[must_use]
    pub fn world_position(&self, handle: NodeHandle) -> Option<Vec3> {
        self.nodes.get(handle).map(Node::world_position)
    }

    // ========================================================================
    // Matrix update pipeline
    // ========================================================================

    /// Refreshes every world matrix. Call once per frame after mutating
    /// transforms and before picking or rendering.
    pub fn update_matrix_world(&mut self) {
        transform_system::update_hierarchy(&mut self.nodes, &mut self.cameras, &self.root_nodes);
    }

    /// Refreshes the world matrices of one subtree only.
    pub fn update_subtree(&mut self, root: NodeHandle) {
        transform_system::update_subtree(&mut self.nodes, &mut self.cameras, root);
    }

    // ========================================================================
    // Picking
    // ========================================================================

    /// Intersects `ray` with every visible, collider-carrying node reachable
    /// from `roots`.
    ///
    /// Hits come back nearest first; equal distances keep traversal order.
    /// Stale handles in `roots` are skipped, and a node reachable from several
    /// roots is only tested once.
    #[must_use]
    pub fn intersect(&self, ray: &Ray, roots: &[NodeHandle]) -> Vec<Intersection> {
        let mut visited: SecondaryMap<NodeHandle, ()> = SecondaryMap::new();
        let mut hits = Vec::new();

        for &root in roots {
            let mut stack = vec![root];
            while let Some(handle) = stack.pop() {
                let Some(node) = self.nodes.get(handle) else {
                    continue;
                };
                if !node.visible || visited.insert(handle, ()).is_some() {
                    continue;
                }
                if let Some(collider) = self.colliders.get(handle)
                    && let Some(distance) = collider.intersect(ray, node.world_matrix())
                {
                    hits.push(Intersection {
                        node: handle,
                        distance,
                        point: ray.at(distance),
                    });
                }
                stack.extend(node.children.iter().rev().copied());
            }
        }

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    // ========================================================================
    // Prefabs
    // ========================================================================

    /// Instantiates `prefab` under `parent` (or as new roots) and returns the
    /// handles of the instantiated prefab roots.
    pub fn instantiate(&mut self, prefab: &Prefab, parent: Option<NodeHandle>) -> Vec<NodeHandle> {
        let mut handles: Vec<Option<NodeHandle>> = vec![None; prefab.nodes.len()];
        let mut instantiated_roots = Vec::with_capacity(prefab.root_indices.len());

        // (prefab index, parent handle, is prefab root)
        let mut stack: Vec<(usize, Option<NodeHandle>, bool)> = prefab
            .root_indices
            .iter()
            .rev()
            .map(|&index| (index, parent, true))
            .collect();

        while let Some((index, parent_handle, is_root)) = stack.pop() {
            let Some(prefab_node) = prefab.nodes.get(index) else {
                log::warn!("Prefab references missing node index {index}");
                continue;
            };
            if handles[index].is_some() {
                log::warn!("Prefab node {index} is reachable twice, skipping");
                continue;
            }

            let node = Node::with_transform(prefab_node.transform.clone());
            let handle = match parent_handle {
                Some(p) => self.add_to_parent(node, p),
                None => self.add_node(node),
            };
            handles[index] = Some(handle);

            if let Some(name) = &prefab_node.name {
                self.set_name(handle, name);
            }
            if let Some(collider) = prefab_node.collider {
                self.set_collider(handle, collider);
            }
            if is_root {
                instantiated_roots.push(handle);
            }

            for &child in prefab_node.children_indices.iter().rev() {
                stack.push((child, Some(handle), false));
            }
        }

        instantiated_roots
    }
}

/// Fluent node construction, see [`Scene::build_node`].
pub struct NodeBuilder<'a> {
    scene: &'a mut Scene,
    name: String,
    node: Node,
    collider: Option<Collider>,
    parent: Option<NodeHandle>,
}

impl<'a> NodeBuilder<'a> {
    pub fn new(scene: &'a mut Scene, name: &str) -> Self {
        Self {
            scene,
            name: name.to_string(),
            node: Node::new(),
            collider: None,
            parent: None,
        }
    }

    #[must_use]
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.node.transform.position = Vec3::new(x, y, z);
        self
    }

    #[must_use]
    pub fn with_scale(mut self, s: f32) -> Self {
        self.node.transform.scale = Vec3::splat(s);
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: NodeHandle) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.collider = Some(collider);
        self
    }

    /// Inserts the node and returns its handle.
    pub fn build(self) -> NodeHandle {
        let handle = match self.parent {
            Some(parent) => self.scene.add_to_parent(self.node, parent),
            None => self.scene.add_node(self.node),
        };
        self.scene.set_name(handle, &self.name);
        if let Some(collider) = self.collider {
            self.scene.set_collider(handle, collider);
        }
        handle
    }
}
