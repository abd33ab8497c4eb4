//! Picking Resolver Tests
//!
//! Tests for:
//! - Pointer to NDC to camera ray
//! - Nearest-hit resolution through the entity registry
//! - Occluders, stale roots, bodies that are not loaded yet

use glam::{Vec2, Vec3};
use orrery::interaction::picking::{PointerEvent, Viewport, pick};
use orrery::interaction::registry::{EntityId, EntityRegistry};
use orrery::scene::camera::Camera;
use orrery::scene::raycast::Collider;
use orrery::scene::scene::Scene;
use orrery::scene::NodeHandle;

const WIDTH: f32 = 800.0;
const HEIGHT: f32 = 600.0;

struct Fixture {
    scene: Scene,
    camera: NodeHandle,
    registry: EntityRegistry,
    viewport: Viewport,
}

impl Fixture {
    /// Camera at (0, 0, 10) looking at the origin.
    fn new() -> Self {
        let mut scene = Scene::new();
        let camera = scene.add_camera(Camera::new_perspective(75.0, WIDTH / HEIGHT, 0.1, 10_000.0));
        {
            let node = scene.get_node_mut(camera).unwrap();
            node.transform.position = Vec3::new(0.0, 0.0, 10.0);
            node.transform.look_at(Vec3::ZERO, Vec3::Y);
        }
        scene.update_matrix_world();
        Self {
            scene,
            camera,
            registry: EntityRegistry::new(),
            viewport: Viewport::new(WIDTH, HEIGHT),
        }
    }

    fn body(&mut self, name: &str, position: Vec3, radius: f32) -> (NodeHandle, NodeHandle) {
        let root = self
            .scene
            .build_node(name)
            .with_position(position.x, position.y, position.z)
            .build();
        let mesh = self
            .scene
            .build_node(&format!("{name}_mesh"))
            .with_parent(root)
            .with_collider(Collider::sphere(radius))
            .build();
        self.scene.update_matrix_world();
        (root, mesh)
    }

    /// Pixel position at which `world` appears.
    fn pixel_of(&self, world: Vec3) -> PointerEvent {
        let ndc = self.camera().project(world);
        self.viewport.pointer_at(ndc.truncate())
    }

    fn camera(&self) -> &Camera {
        self.scene.get_camera(self.camera).unwrap()
    }

    fn pick_at(&self, event: PointerEvent, roots: &[NodeHandle]) -> Option<orrery::PickHit> {
        pick(event, self.viewport, self.camera(), &self.scene, roots, &self.registry)
    }
}

fn center() -> PointerEvent {
    PointerEvent::new(WIDTH / 2.0, HEIGHT / 2.0)
}

// ============================================================================
// Hits and Misses
// ============================================================================

#[test]
fn empty_space_is_a_miss() {
    let mut f = Fixture::new();
    let (earth, _) = f.body("Earth", Vec3::ZERO, 1.0);
    f.registry.register(EntityId::Earth, earth, Vec3::ZERO);

    assert!(f.pick_at(PointerEvent::new(0.0, 0.0), &[earth]).is_none());
}

#[test]
fn center_click_hits_body_in_front() {
    let mut f = Fixture::new();
    let (earth, mesh) = f.body("Earth", Vec3::ZERO, 1.0);
    f.registry.register(EntityId::Earth, earth, Vec3::ZERO);

    let hit = f.pick_at(center(), &[earth]).expect("earth is straight ahead");

    assert_eq!(hit.entity, EntityId::Earth);
    assert_eq!(hit.node, mesh);
    assert!((hit.distance - 9.0).abs() < 1e-3, "distance = {}", hit.distance);
    assert!((hit.point - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-3);
}

#[test]
fn off_center_body_is_hit_at_its_projection() {
    let mut f = Fixture::new();
    let (earth, _) = f.body("Earth", Vec3::ZERO, 1.0);
    let (kepler, _) = f.body("KeplerX", Vec3::new(4.0, 0.0, 0.0), 1.0);
    f.registry.register(EntityId::Earth, earth, Vec3::ZERO);
    f.registry.register(EntityId::exoplanet("KeplerX"), kepler, Vec3::new(4.0, 0.0, 0.0));

    let event = f.pixel_of(Vec3::new(4.0, 0.0, 0.0));
    assert!(event.x > WIDTH / 2.0);

    let hit = f.pick_at(event, &f.registry.roots()).unwrap();
    assert_eq!(hit.entity, EntityId::exoplanet("KeplerX"));
}

#[test]
fn hit_on_decoration_resolves_to_owner() {
    let mut f = Fixture::new();
    let (root, mesh) = f.body("KeplerX", Vec3::ZERO, 1.0);
    let clouds = f
        .scene
        .build_node("KeplerX_clouds")
        .with_parent(mesh)
        .with_scale(1.02)
        .with_collider(Collider::sphere(1.0))
        .build();
    f.scene.update_matrix_world();
    f.registry.register(EntityId::exoplanet("KeplerX"), root, Vec3::ZERO);

    let hit = f.pick_at(center(), &[root]).unwrap();

    assert_eq!(hit.node, clouds);
    assert_eq!(hit.entity, EntityId::exoplanet("KeplerX"));
}

#[test]
fn unowned_occluder_blocks_the_pick() {
    let mut f = Fixture::new();
    let (earth, _) = f.body("Earth", Vec3::ZERO, 1.0);
    let (occluder, _) = f.body("Asteroid", Vec3::new(0.0, 0.0, 5.0), 0.5);
    f.registry.register(EntityId::Earth, earth, Vec3::ZERO);

    assert!(f.pick_at(center(), &[earth, occluder]).is_none());
    assert_eq!(f.pick_at(center(), &[earth]).unwrap().entity, EntityId::Earth);
}

#[test]
fn nearer_body_wins() {
    let mut f = Fixture::new();
    let (far, _) = f.body("Sun", Vec3::new(0.0, 0.0, -20.0), 3.0);
    let (near, _) = f.body("Earth", Vec3::ZERO, 1.0);
    f.registry.register(EntityId::Sun, far, Vec3::new(0.0, 0.0, -20.0));
    f.registry.register(EntityId::Earth, near, Vec3::ZERO);

    let hit = f.pick_at(center(), &f.registry.roots()).unwrap();
    assert_eq!(hit.entity, EntityId::Earth);
}

#[test]
fn picking_is_repeatable() {
    let mut f = Fixture::new();
    let (earth, _) = f.body("Earth", Vec3::ZERO, 1.0);
    f.registry.register(EntityId::Earth, earth, Vec3::ZERO);

    let first = f.pick_at(center(), &[earth]);
    let second = f.pick_at(center(), &[earth]);
    assert_eq!(first, second);
}

// ============================================================================
// Load State
// ============================================================================

#[test]
fn stale_root_is_skipped() {
    let mut f = Fixture::new();
    let (earth, _) = f.body("Earth", Vec3::ZERO, 1.0);
    let (gone, _) = f.body("Gone", Vec3::new(0.0, 0.0, 5.0), 0.5);
    f.registry.register(EntityId::Earth, earth, Vec3::ZERO);
    f.registry.register(EntityId::exoplanet("Gone"), gone, Vec3::new(0.0, 0.0, 5.0));
    f.scene.remove_node(gone);

    let hit = f.pick_at(center(), &f.registry.roots()).unwrap();
    assert_eq!(hit.entity, EntityId::Earth);
}

#[test]
fn body_becomes_pickable_once_registered() {
    let mut f = Fixture::new();
    let (kepler, _) = f.body("KeplerX", Vec3::ZERO, 1.0);

    // Nodes exist but the load has not been announced yet.
    assert!(f.pick_at(center(), &f.registry.roots()).is_none());
    assert!(f.pick_at(center(), &[kepler]).is_none());

    f.registry.register(EntityId::exoplanet("KeplerX"), kepler, Vec3::ZERO);
    let hit = f.pick_at(center(), &f.registry.roots()).unwrap();
    assert_eq!(hit.entity, EntityId::exoplanet("KeplerX"));
}

#[test]
fn empty_viewport_picks_nothing() {
    let mut f = Fixture::new();
    let (earth, _) = f.body("Earth", Vec3::ZERO, 1.0);
    f.registry.register(EntityId::Earth, earth, Vec3::ZERO);

    let hit = pick(
        center(),
        Viewport::new(0.0, 0.0),
        f.camera(),
        &f.scene,
        &[earth],
        &f.registry,
    );
    assert!(hit.is_none());
}

#[test]
fn pointer_converts_from_vec2() {
    let event = PointerEvent::from(Vec2::new(400.0, 300.0));
    assert_eq!(event.to_ndc(Viewport::new(WIDTH, HEIGHT)), Some(Vec2::ZERO));
}
