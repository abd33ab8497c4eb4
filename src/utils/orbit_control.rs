use glam::{Vec2, Vec3};
use winit::event::MouseButton;

use crate::app::input::Input;
use crate::scene::transform::Transform;

/// Orbit-style camera controls.
///
/// The camera sits on a sphere of `radius` around `target`, parameterized by
/// the azimuth `theta` and the polar angle `phi`. Left drag rotates, right drag
/// pans the target, the wheel zooms.
///
/// Anything else that moves the camera (a fly-to animation) sets `target` and
/// then calls [`OrbitControls::sync`], so the next user drag continues from
/// where the camera actually is instead of snapping back.
pub struct OrbitControls {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub damping_factor: f32,
    pub enable_damping: bool,
    pub enable_pan: bool,
    pub min_distance: f32,
    pub max_distance: f32,

    /// The point the camera orbits around and looks at.
    pub target: Vec3,
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,

    rotate_delta: Vec2,
}

impl OrbitControls {
    #[must_use]
    pub fn new(target: Vec3, radius: f32) -> Self {
        Self {
            rotate_speed: 1.0,
            zoom_speed: 0.05,
            pan_speed: 0.5,
            damping_factor: 0.1,
            enable_damping: true,
            enable_pan: true,
            min_distance: 1.0,
            max_distance: 10_000.0,

            target,
            radius,
            theta: 0.0,
            phi: std::f32::consts::FRAC_PI_2,

            rotate_delta: Vec2::ZERO,
        }
    }

    /// Creates controls that orbit `target` starting from wherever
    /// `transform` currently is.
    #[must_use]
    pub fn looking_from(transform: &Transform, target: Vec3) -> Self {
        let mut controls = Self::new(target, 1.0);
        controls.sync(transform);
        controls
    }

    /// Re-derives the spherical coordinates from the camera's position around
    /// the current `target` and drops any pending rotation momentum.
    pub fn sync(&mut self, transform: &Transform) {
        let offset = transform.position - self.target;
        let radius = offset.length();
        self.rotate_delta = Vec2::ZERO;
        if radius <= f32::EPSILON {
            return;
        }
        self.radius = radius;
        self.theta = offset.x.atan2(offset.z);
        self.phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
    }

    /// Applies one frame of user input.
    ///
    /// Returns `false` and leaves `transform` untouched when there was nothing
    /// to apply (no drag, no wheel, no remaining damping momentum).
    pub fn update(&mut self, transform: &mut Transform, input: &Input, fov_degrees: f32, dt: f32) -> bool {
        let screen_height = input.screen_size().y.max(1.0);
        let mut moved = false;

        if input.get_mouse_button(MouseButton::Left) && input.mouse_delta() != Vec2::ZERO {
            let rotate_per_pixel = 2.0 * std::f32::consts::PI / screen_height;
            self.rotate_delta.x -= input.mouse_delta().x * rotate_per_pixel * self.rotate_speed;
            self.rotate_delta.y -= input.mouse_delta().y * rotate_per_pixel * self.rotate_speed;
        }

        if self.rotate_delta.length_squared() > 1e-12 {
            moved = true;
            if self.enable_damping {
                let target_fps = 60.0;
                let retention = (1.0 - self.damping_factor).powf(dt * target_fps);
                let delta_apply = self.rotate_delta * (1.0 - retention);

                self.theta += delta_apply.x;
                self.phi += delta_apply.y;

                self.rotate_delta *= retention;
            } else {
                self.theta += self.rotate_delta.x;
                self.phi += self.rotate_delta.y;
                self.rotate_delta = Vec2::ZERO;
            }
        } else {
            self.rotate_delta = Vec2::ZERO;
        }

        const EPS: f32 = 0.0001;
        self.phi = self.phi.clamp(EPS, std::f32::consts::PI - EPS);

        if input.scroll_delta().y != 0.0 {
            moved = true;
            let scale = (1.0 - self.zoom_speed).powf(input.scroll_delta().y.abs());
            if input.scroll_delta().y > 0.0 {
                self.radius *= scale;
            } else {
                self.radius /= scale;
            }
            self.radius = self.radius.clamp(self.min_distance, self.max_distance);
        }

        if self.enable_pan && input.get_mouse_button(MouseButton::Right) && input.mouse_delta() != Vec2::ZERO {
            moved = true;
            let half_fov = fov_degrees.to_radians() / 2.0;
            let target_world_height = 2.0 * self.radius * half_fov.tan();
            let pixels_to_world_ratio = target_world_height / screen_height;

            let forward = -self.direction();
            let right = forward.cross(Vec3::Y).normalize_or_zero();
            let up = right.cross(forward).normalize_or_zero();

            let pan_delta_world = (right * -input.mouse_delta().x + up * input.mouse_delta().y)
                * pixels_to_world_ratio
                * self.pan_speed;

            self.target += pan_delta_world;
        }

        if moved {
            self.apply(transform);
        }
        moved
    }

    /// Places `transform` on the orbit sphere and points it at `target`.
    pub fn apply(&self, transform: &mut Transform) {
        transform.position = self.target + self.direction() * self.radius;
        transform.look_at(self.target, Vec3::Y);
    }

    /// Unit vector from `target` towards the camera.
    fn direction(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_round_trips_through_apply() {
        let mut transform = Transform::from_position(Vec3::new(100.0, -41.0, -5.0));
        let controls = OrbitControls::looking_from(&transform, Vec3::new(100.0, -43.0, 0.0));

        assert!((controls.radius - 29.0_f32.sqrt()).abs() < 1e-5);

        controls.apply(&mut transform);
        assert!((transform.position - Vec3::new(100.0, -41.0, -5.0)).length() < 1e-4);
    }

    #[test]
    fn idle_update_leaves_transform_alone() {
        let mut transform = Transform::from_position(Vec3::new(0.0, 2.0, -5.0));
        let mut controls = OrbitControls::looking_from(&transform, Vec3::ZERO);
        let input = Input::new();

        assert!(!controls.update(&mut transform, &input, 75.0, 1.0 / 60.0));
        assert_eq!(transform.position, Vec3::new(0.0, 2.0, -5.0));
    }

    #[test]
    fn wheel_zooms_towards_target() {
        let mut transform = Transform::from_position(Vec3::new(0.0, 0.0, 10.0));
        let mut controls = OrbitControls::looking_from(&transform, Vec3::ZERO);
        let mut input = Input::new();
        input.inject_scroll(winit::event::MouseScrollDelta::LineDelta(0.0, 1.0));

        assert!(controls.update(&mut transform, &input, 75.0, 1.0 / 60.0));
        assert!(transform.position.length() < 10.0);
    }
}
