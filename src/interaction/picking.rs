//! Picking resolver.
//!
//! Turns a pointer position into the body under the cursor:
//! 1. viewport pixels to normalized device coordinates (Y flipped)
//! 2. a ray from the camera through that point
//! 3. intersection against every node reachable from the candidate roots
//! 4. the nearest hit mapped to its body via the [`EntityRegistry`]

use glam::{Vec2, Vec3};

use crate::interaction::registry::{EntityId, EntityRegistry};
use crate::scene::{Camera, NodeHandle, Ray, Scene};

/// A pointer position in viewport pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Normalized device coordinates in `[-1, 1]`, +Y up.
    ///
    /// `None` for a zero-sized viewport.
    #[must_use]
    pub fn to_ndc(&self, viewport: Viewport) -> Option<Vec2> {
        if viewport.is_empty() {
            return None;
        }
        Some(Vec2::new(
            (self.x / viewport.width) * 2.0 - 1.0,
            -(self.y / viewport.height) * 2.0 + 1.0,
        ))
    }
}

impl From<Vec2> for PointerEvent {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// Size of the surface the pointer coordinates refer to, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Pixel position of a point given in normalized device coordinates.
    #[must_use]
    pub fn pointer_at(&self, ndc: Vec2) -> PointerEvent {
        PointerEvent::new(
            (ndc.x + 1.0) * 0.5 * self.width,
            (1.0 - ndc.y) * 0.5 * self.height,
        )
    }
}

impl From<Vec2> for Viewport {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// The body found under the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct PickHit {
    pub entity: EntityId,
    /// The render node actually hit (may be a descendant of the body's root).
    pub node: NodeHandle,
    /// World-space hit point.
    pub point: Vec3,
    /// Distance from the camera along the pick ray.
    pub distance: f32,
}

/// Finds the body under `event`.
///
/// Only the nearest intersection counts: when it belongs to a node no body
/// owns (a backdrop, a star field) the result is `None` even if a registered
/// body lies further behind it. Roots that are not loaded yet simply do not
/// take part.
#[must_use]
pub fn pick(
    event: PointerEvent,
    viewport: Viewport,
    camera: &Camera,
    scene: &Scene,
    candidate_roots: &[NodeHandle],
    registry: &EntityRegistry,
) -> Option<PickHit> {
    let Some(ndc) = event.to_ndc(viewport) else {
        log::warn!("Pick ignored: empty viewport {}x{}", viewport.width, viewport.height);
        return None;
    };

    let ray = Ray::from_camera(ndc, camera);
    let nearest = scene.intersect(&ray, candidate_roots).into_iter().next()?;

    let Some(entity) = registry.resolve(scene, nearest.node) else {
        log::debug!("Nearest hit at {:.3} belongs to no entity", nearest.distance);
        return None;
    };

    log::debug!("Picked {entity} at {}", nearest.point);
    Some(PickHit {
        entity: entity.clone(),
        node: nearest.node,
        point: nearest.point,
        distance: nearest.distance,
    })
}
