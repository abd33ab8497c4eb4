//! Rays and pick colliders.
//!
//! Picking works on simple bounding volumes attached to render nodes rather
//! than on triangle soup: planets are spheres, labels and decorative props are
//! boxes. Volumes are stored in node-local space and tested against a
//! world-space [`Ray`] using the node's cached world matrix.

use glam::{Affine3A, Vec2, Vec3};

use crate::scene::camera::Camera;

/// A half-line in world space. `direction` is always unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Creates a ray, normalizing `direction`.
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Builds the ray from the camera through a point given in normalized
    /// device coordinates (`[-1, 1]` on both axes, +Y up).
    #[must_use]
    pub fn from_camera(ndc: Vec2, camera: &Camera) -> Self {
        let origin = camera.position();
        let on_near_plane = camera.unproject(ndc.extend(0.0));
        Self::new(origin, on_near_plane - origin)
    }

    /// Point at distance `t` along the ray.
    #[inline]
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Node-local bounding volume used for pick tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    Sphere { center: Vec3, radius: f32 },
    Box { min: Vec3, max: Vec3 },
}

impl Collider {
    /// Sphere centered on the node origin.
    #[must_use]
    pub fn sphere(radius: f32) -> Self {
        Collider::Sphere {
            center: Vec3::ZERO,
            radius,
        }
    }

    /// Box centered on the node origin with the given full extents.
    #[must_use]
    pub fn cuboid(size: Vec3) -> Self {
        let half = size * 0.5;
        Collider::Box {
            min: -half,
            max: half,
        }
    }

    /// Distance along `ray` to the nearest surface hit in front of the ray
    /// origin, with the volume placed by `world`.
    ///
    /// An origin inside the volume reports the exit point.
    #[must_use]
    pub fn intersect(&self, ray: &Ray, world: &Affine3A) -> Option<f32> {
        match *self {
            Collider::Sphere { center, radius } => {
                let world_center = world.transform_point3(center);
                let world_radius = radius * max_axis_scale(world);
                let (t0, t1) = ray_sphere_intersect(ray.origin, ray.direction, world_center, world_radius)?;
                nearest_non_negative(t0, t1)
            }
            Collider::Box { min, max } => {
                if world.matrix3.determinant().abs() <= f32::EPSILON {
                    return None;
                }
                // An affine map keeps the ray parameter, so `t` found in local
                // space is the world distance along the unit world direction.
                let inverse = world.inverse();
                let origin = inverse.transform_point3(ray.origin);
                let direction = inverse.transform_vector3(ray.direction);
                let (t0, t1) = ray_box_intersect(origin, direction, min, max)?;
                nearest_non_negative(t0, t1)
            }
        }
    }
}

fn max_axis_scale(world: &Affine3A) -> f32 {
    world
        .matrix3
        .x_axis
        .length()
        .max(world.matrix3.y_axis.length())
        .max(world.matrix3.z_axis.length())
}

fn nearest_non_negative(t0: f32, t1: f32) -> Option<f32> {
    if t1 < 0.0 {
        None
    } else if t0 >= 0.0 {
        Some(t0)
    } else {
        Some(t1)
    }
}

/// Ray/sphere intersection for a unit-length `dir`.
///
/// Returns the entry and exit distances, or `None` when the ray's line misses.
#[must_use]
pub fn ray_sphere_intersect(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<(f32, f32)> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    Some((-b - sqrt_disc, -b + sqrt_disc))
}

/// Slab test against an axis-aligned box.
///
/// Returns the entry and exit parameters along `dir` (which need not be unit
/// length), or `None` when the line misses the box.
#[must_use]
pub fn ray_box_intersect(origin: Vec3, dir: Vec3, min: Vec3, max: Vec3) -> Option<(f32, f32)> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        if d.abs() < f32::EPSILON {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (min[axis] - o) * inv;
        let mut t1 = (max[axis] - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }

    Some((t_enter, t_exit))
}
