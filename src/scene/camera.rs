use glam::{Affine3A, Mat4, Vec3};

/// Perspective camera component.
///
/// The camera itself carries only projection parameters. Its placement comes
/// from the [`Transform`](crate::scene::Transform) of the node it is attached
/// to; the transform system pushes that node's world matrix in through
/// [`Camera::update_view_projection`].
#[derive(Debug, Clone)]
pub struct Camera {
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    pub(crate) world_matrix: Affine3A,
    pub(crate) view_matrix: Mat4,
    pub(crate) projection_matrix: Mat4,
    pub(crate) view_projection_matrix: Mat4,
}

impl Camera {
    /// Creates a perspective camera. `fov` is given in degrees.
    #[must_use]
    pub fn new_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            fov: fov.to_radians(),
            aspect,
            near,
            far,

            world_matrix: Affine3A::IDENTITY,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            view_projection_matrix: Mat4::IDENTITY,
        };

        cam.update_projection_matrix();
        cam
    }

    /// Rebuilds the projection after `fov`, `aspect`, `near` or `far` changed.
    pub fn update_projection_matrix(&mut self) {
        // glam's right-handed perspective maps depth to [0, 1].
        self.projection_matrix = Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far);
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    pub fn update_view_projection(&mut self, world_transform: &Affine3A) {
        self.world_matrix = *world_transform;
        self.view_matrix = Mat4::from(*world_transform).inverse();
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    /// Adapts the aspect ratio to a new viewport size. Zero-sized viewports
    /// (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
        self.update_projection_matrix();
    }

    #[inline]
    #[must_use]
    pub fn fov_degrees(&self) -> f32 {
        self.fov.to_degrees()
    }

    /// World-space position of the camera as of the last view update.
    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.world_matrix.translation.into()
    }

    #[inline]
    #[must_use]
    pub fn view_projection_matrix(&self) -> &Mat4 {
        &self.view_projection_matrix
    }

    /// Maps a point from normalized device coordinates back into world space.
    ///
    /// `ndc.z` is the depth in `[0, 1]` (near plane at 0, far plane at 1).
    #[must_use]
    pub fn unproject(&self, ndc: Vec3) -> Vec3 {
        self.view_projection_matrix.inverse().project_point3(ndc)
    }

    /// Maps a world-space point into normalized device coordinates.
    #[must_use]
    pub fn project(&self, world: Vec3) -> Vec3 {
        self.view_projection_matrix.project_point3(world)
    }
}
