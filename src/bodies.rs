//! Spawning bodies into the scene.
//!
//! Every body gets a root node of its own: the registry maps that root to the
//! body, and everything added below it (the loaded meshes, cloud shells,
//! labels) resolves back to the body when picked.

use glam::Vec3;

use crate::assets::Placement;
use crate::interaction::registry::EntityId;
use crate::scene::{Collider, NodeHandle, Prefab, Scene};
use crate::settings::ViewerSettings;

/// Pick volume of a label sprite, in the planet's local units.
const LABEL_SIZE: Vec3 = Vec3::new(2.0, 1.0, 0.05);

/// Nodes created for one body.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnedBody {
    /// The node registered for the body.
    pub root: NodeHandle,
    /// Node that spins about its local Y axis every frame, if any.
    pub spin: Option<NodeHandle>,
    /// Instantiated mesh nodes (nodes with a pick volume).
    pub meshes: Vec<NodeHandle>,
    pub cloud_shells: Vec<NodeHandle>,
    pub label: Option<NodeHandle>,
}

/// Adds the Earth: a unit sphere inside a group tilted about Z.
///
/// The group is the registered root; the sphere is what spins, so the spin
/// axis follows the tilt.
pub fn spawn_earth(scene: &mut Scene, settings: &ViewerSettings) -> SpawnedBody {
    let group = scene.create_node_with_name("Earth");
    if let Some(node) = scene.get_node_mut(group) {
        node.transform
            .set_rotation_euler(0.0, 0.0, settings.earth_tilt_degrees.to_radians());
    }

    let mesh = scene
        .build_node("EarthMesh")
        .with_parent(group)
        .with_collider(Collider::sphere(1.0))
        .build();

    scene.update_subtree(group);
    SpawnedBody {
        root: group,
        spin: Some(mesh),
        meshes: vec![mesh],
        cloud_shells: Vec::new(),
        label: None,
    }
}

/// Instantiates a loaded body.
///
/// The prefab goes under a fresh root placed and uniformly scaled per
/// `placement`. Exoplanets additionally get a cloud shell around each mesh and
/// a name label above the planet; the Sun is added as is. Loaded bodies do not
/// spin, so labels stay facing the camera's side of the scene.
pub fn spawn_body(
    scene: &mut Scene,
    entity: &EntityId,
    prefab: &Prefab,
    placement: Placement,
    settings: &ViewerSettings,
) -> SpawnedBody {
    let root_name = match entity {
        EntityId::Exoplanet(name) => format!("Exoplanet_{name}"),
        other => other.label().to_string(),
    };
    let root = scene
        .build_node(&root_name)
        .with_position(placement.position.x, placement.position.y, placement.position.z)
        .with_scale(placement.scale)
        .build();

    let instantiated = scene.instantiate(prefab, Some(root));
    let meshes: Vec<NodeHandle> = instantiated
        .iter()
        .flat_map(|&top| scene.descendants(top))
        .filter(|&handle| scene.get_collider(handle).is_some())
        .collect();

    if meshes.is_empty() {
        log::warn!("{entity} has no pickable meshes");
    }

    let mut body = SpawnedBody {
        root,
        spin: None,
        meshes,
        cloud_shells: Vec::new(),
        label: None,
    };

    if let EntityId::Exoplanet(name) = entity {
        body.cloud_shells = add_cloud_shells(scene, &body.meshes, settings.cloud_shell_scale);
        body.label = Some(add_label(scene, root, name, settings.label_height_factor));
    }

    scene.update_subtree(root);
    log::debug!(
        "Spawned {entity}: {} meshes, {} cloud shells",
        body.meshes.len(),
        body.cloud_shells.len()
    );
    body
}

/// Adds a slightly larger copy of each mesh's pick volume as its child.
fn add_cloud_shells(scene: &mut Scene, meshes: &[NodeHandle], scale: f32) -> Vec<NodeHandle> {
    let mut shells = Vec::with_capacity(meshes.len());
    for &mesh in meshes {
        let Some(collider) = scene.get_collider(mesh).copied() else {
            continue;
        };
        let name = format!("{}_clouds", scene.get_name(mesh).unwrap_or("mesh"));
        let shell = scene
            .build_node(&name)
            .with_parent(mesh)
            .with_scale(scale)
            .with_collider(collider)
            .build();
        shells.push(shell);
    }
    shells
}

/// Adds the name label above the planet.
///
/// The label hangs off the scaled root, so a local height of `height_factor`
/// puts it `height_factor * size` above the planet center in world space.
fn add_label(scene: &mut Scene, root: NodeHandle, name: &str, height_factor: f32) -> NodeHandle {
    scene
        .build_node(&format!("{name}_label"))
        .with_parent(root)
        .with_position(0.0, height_factor, 0.0)
        .with_collider(Collider::cuboid(LABEL_SIZE))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earth_is_tilted_unit_sphere() {
        let mut scene = Scene::new();
        let earth = spawn_earth(&mut scene, &ViewerSettings::default());

        let mesh = earth.spin.unwrap();
        assert_eq!(scene.get_collider(mesh), Some(&Collider::sphere(1.0)));
        assert_eq!(scene.get_node(mesh).and_then(|n| n.parent()), Some(earth.root));
        let tilt = scene.get_node(earth.root).unwrap().transform.rotation_euler().z;
        assert!((tilt - (-23.4_f32).to_radians()).abs() < 1e-5);
    }

    #[test]
    fn sun_has_no_decorations() {
        let mut scene = Scene::new();
        let body = spawn_body(
            &mut scene,
            &EntityId::Sun,
            &Prefab::sphere("sun", 1.0),
            Placement::new(Vec3::new(50.0, 0.0, 0.0), 3.0),
            &ViewerSettings::default(),
        );

        assert_eq!(body.meshes.len(), 1);
        assert!(body.cloud_shells.is_empty());
        assert_eq!(body.label, None);
        assert_eq!(body.spin, None);
        assert_eq!(scene.world_position(body.root), Some(Vec3::new(50.0, 0.0, 0.0)));
    }
}
