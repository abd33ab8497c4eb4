//! Scene graph module
//!
//! CPU-side scene hierarchy consumed by the interaction core:
//! - Node: render node with parent/child links and a transform
//! - Transform: position, rotation, scale and cached matrices
//! - Scene: node storage, component maps and ray queries
//! - Camera: perspective camera component
//! - Ray / Collider: pick geometry
//! - Prefab: handle-free node hierarchy produced by asset loaders
//! - TransformSystem: world-matrix propagation

pub mod camera;
pub mod node;
pub mod prefab;
pub mod raycast;
pub mod scene;
pub mod transform;
pub mod transform_system;

pub use camera::Camera;
pub use node::Node;
pub use prefab::{Prefab, PrefabNode};
pub use raycast::{Collider, Ray};
pub use scene::{Intersection, Scene};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    /// Handle of a render node in a [`Scene`].
    pub struct NodeHandle;
}
