//! Perspective camera that always looks at the world origin.
//!
//! Only the eye position moves (see [`crate::parallax`]); orientation is
//! rebuilt from `eye`, `target` and `up` every time a matrix is requested,
//! so there is no orientation state to smooth or drift.

use glam::{Mat4, Vec3};

/// Right-handed camera description with perspective projection.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(eye: Vec3, fovy_degrees: f32, znear: f32, zfar: f32) -> Self {
        Self {
            eye,
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.0,
            fovy_radians: fovy_degrees.to_radians(),
            znear,
            zfar,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Updates the aspect ratio from a surface size.
    ///
    /// Returns `false` and keeps the previous aspect when the size is
    /// degenerate, so no `NaN`/`inf` reaches the projection.
    pub fn set_aspect_from_size(&mut self, width: f32, height: f32) -> bool {
        let aspect = width / height;
        if !(width > 0.0 && height > 0.0) || !aspect.is_finite() {
            return false;
        }
        self.aspect = aspect;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_follows_size() {
        let mut cam = Camera::new(Vec3::new(0.0, 0.2, 9.0), 55.0, 0.1, 100.0);
        assert!(cam.set_aspect_from_size(1600.0, 900.0));
        assert!((cam.aspect - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_size_keeps_aspect() {
        let mut cam = Camera::new(Vec3::Z * 9.0, 55.0, 0.1, 100.0);
        cam.set_aspect_from_size(800.0, 400.0);
        assert!(!cam.set_aspect_from_size(800.0, 0.0));
        assert!(!cam.set_aspect_from_size(0.0, 0.0));
        assert_eq!(cam.aspect, 2.0);
        assert!(cam.view_proj().is_finite());
    }

    #[test]
    fn origin_projects_to_screen_centre() {
        let mut cam = Camera::new(Vec3::new(0.7, -0.3, 8.2), 55.0, 0.1, 100.0);
        cam.set_aspect_from_size(1280.0, 720.0);
        let clip = cam.view_proj() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
    }
}
