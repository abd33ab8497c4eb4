//! Camera Transition Tests
//!
//! Tests for:
//! - Linear path sampling and the exact end position
//! - Frame-driven flights including aiming and orbit anchoring
//! - Superseding and cancelling flights

use glam::Vec3;
use orrery::interaction::transition::{CameraTransition, TransitionStatus};
use orrery::scene::transform::Transform;
use orrery::utils::orbit_control::OrbitControls;

const START: Vec3 = Vec3::new(0.0, 0.0, 10.0);
const TARGET: Vec3 = Vec3::new(100.0, -43.0, 0.0);
const OFFSET: Vec3 = Vec3::new(0.0, 2.0, -5.0);

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < 1e-4
}

fn setup() -> (Transform, OrbitControls) {
    let mut camera = Transform::from_position(START);
    camera.look_at(Vec3::ZERO, Vec3::Y);
    let controls = OrbitControls::looking_from(&camera, Vec3::ZERO);
    (camera, controls)
}

// ============================================================================
// Path
// ============================================================================

#[test]
fn path_starts_and_ends_exactly() {
    let (camera, _) = setup();
    let mut transition = CameraTransition::new();
    transition.begin(&camera, TARGET, OFFSET, 1.0);

    assert_eq!(transition.sample(0.0), Some(START));
    assert_eq!(transition.sample(1.0), Some(TARGET + OFFSET));
    assert_eq!(transition.sample(3.0), Some(TARGET + OFFSET));
    assert_eq!(transition.sample(-1.0), Some(START));
}

#[test]
fn path_is_linear() {
    let (camera, _) = setup();
    let mut transition = CameraTransition::new();
    transition.begin(&camera, TARGET, OFFSET, 1.0);

    let mid = transition.sample(0.5).unwrap();
    assert!(vec3_approx(mid, Vec3::new(50.0, -20.5, 2.5)), "mid = {mid}");

    let quarter = transition.sample(0.25).unwrap();
    assert!(vec3_approx(quarter, START.lerp(TARGET + OFFSET, 0.25)));
}

#[test]
fn sample_without_flight_is_none() {
    assert_eq!(CameraTransition::new().sample(0.5), None);
}

// ============================================================================
// Frame-driven flight
// ============================================================================

#[test]
fn flight_to_lp_791_18d() {
    let (mut camera, mut controls) = setup();
    let mut transition = CameraTransition::new();
    transition.begin(&camera, TARGET, OFFSET, 1.0);

    // The clock starts on the first tick.
    assert_eq!(
        transition.tick(2_000.0, &mut camera, &mut controls),
        TransitionStatus::Running { t: 0.0 }
    );
    assert_eq!(camera.position, START);

    let status = transition.tick(2_500.0, &mut camera, &mut controls);
    assert_eq!(status, TransitionStatus::Running { t: 0.5 });
    assert!(vec3_approx(camera.position, Vec3::new(50.0, -20.5, 2.5)));
    assert_eq!(controls.target, TARGET);

    let status = transition.tick(3_000.0, &mut camera, &mut controls);
    assert_eq!(status, TransitionStatus::Finished);
    assert_eq!(camera.position, Vec3::new(100.0, -41.0, -5.0));

    let expected_forward = Vec3::new(0.0, -2.0, 5.0) / 29.0_f32.sqrt();
    assert!(vec3_approx(camera.forward(), expected_forward), "forward = {}", camera.forward());
    assert_eq!(controls.target, TARGET);
    assert!((controls.radius - 29.0_f32.sqrt()).abs() < 1e-4);

    assert!(!transition.is_running());
    assert_eq!(transition.tick(3_100.0, &mut camera, &mut controls), TransitionStatus::Idle);
    assert_eq!(camera.position, Vec3::new(100.0, -41.0, -5.0));
}

#[test]
fn late_frame_snaps_to_end() {
    let (mut camera, mut controls) = setup();
    let mut transition = CameraTransition::new();
    transition.begin(&camera, TARGET, OFFSET, 1.0);

    transition.tick(0.0, &mut camera, &mut controls);
    let status = transition.tick(60_000.0, &mut camera, &mut controls);

    assert_eq!(status, TransitionStatus::Finished);
    assert_eq!(camera.position, TARGET + OFFSET);
}

#[test]
fn aims_at_target_every_frame() {
    let (mut camera, mut controls) = setup();
    let mut transition = CameraTransition::new();
    transition.begin(&camera, TARGET, OFFSET, 2.0);

    transition.tick(0.0, &mut camera, &mut controls);
    for ts in [400.0, 800.0, 1_200.0, 1_600.0] {
        transition.tick(ts, &mut camera, &mut controls);
        let towards = (TARGET - camera.position).normalize();
        assert!(vec3_approx(camera.forward(), towards), "at {ts}ms forward = {}", camera.forward());
    }
}

#[test]
fn new_flight_supersedes_running_one() {
    let (mut camera, mut controls) = setup();
    let mut transition = CameraTransition::new();
    let sun = Vec3::new(50.0, 0.0, 0.0);

    transition.begin(&camera, TARGET, OFFSET, 1.0);
    transition.tick(0.0, &mut camera, &mut controls);
    transition.tick(500.0, &mut camera, &mut controls);
    let halfway = camera.position;

    transition.begin(&camera, sun, OFFSET, 1.0);
    let flight = transition.flight().unwrap();
    assert_eq!(flight.start_position, halfway);
    assert_eq!(flight.end_position, sun + OFFSET);

    // Fresh clock for the new flight.
    assert_eq!(
        transition.tick(600.0, &mut camera, &mut controls),
        TransitionStatus::Running { t: 0.0 }
    );
    assert_eq!(transition.tick(1_600.0, &mut camera, &mut controls), TransitionStatus::Finished);
    assert_eq!(camera.position, sun + OFFSET);
    assert_eq!(controls.target, sun);
}

#[test]
fn cancel_leaves_camera_mid_flight() {
    let (mut camera, mut controls) = setup();
    let mut transition = CameraTransition::new();
    transition.begin(&camera, TARGET, OFFSET, 1.0);
    transition.tick(0.0, &mut camera, &mut controls);
    transition.tick(250.0, &mut camera, &mut controls);
    let at = camera.position;

    transition.cancel();

    assert_eq!(transition.tick(1_000.0, &mut camera, &mut controls), TransitionStatus::Idle);
    assert_eq!(camera.position, at);
}

#[test]
fn vertical_offset_still_faces_target() {
    let (mut camera, mut controls) = setup();
    let mut transition = CameraTransition::new();
    transition.begin(&camera, TARGET, Vec3::new(0.0, 5.0, 0.0), 1.0);

    transition.tick(0.0, &mut camera, &mut controls);
    assert_eq!(transition.tick(1_000.0, &mut camera, &mut controls), TransitionStatus::Finished);

    assert_eq!(camera.position, TARGET + Vec3::new(0.0, 5.0, 0.0));
    assert!(vec3_approx(camera.forward(), Vec3::NEG_Y), "forward = {}", camera.forward());
}
