//! Fixed framing camera.
//!
//! The camera sits on the +Z axis looking at the origin, backed off far
//! enough for the fitted model to sit in view.

use glam::{Mat4, Vec3};

pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Frames a model whose largest bounding-box extent is `max_extent` and
    /// which has been scaled down to `fit_size` world units.
    pub fn framing(max_extent: f32, fit_size: f32, fov_deg: f32) -> Self {
        let distance = (max_extent / fit_size) * 2.0;
        Self {
            eye: Vec3::new(0.0, 0.0, distance),
            target: Vec3::ZERO,
            fov_deg,
            near: 0.1,
            far: 100.0,
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_deg.to_radians(), aspect_ratio, self.near, self.far)
    }
}
