//! # Perspective Camera
//!
//! A ready-made [`Camera`] implementation for applications that do not bring
//! their own projection math.
//!
//! ## Coordinate System
//! Right-handed, Y-up view space looking down -Z, with a [-1, 1] clip depth
//! range as expected by the OpenGL-style shaders shipped with the renderer.

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec2, Vec3};
use crate::graphics::Camera;

/// 3D camera with a perspective projection
///
/// The aspect ratio is not set by hand: it is recomputed from the viewport
/// every time the renderer binds the camera for a frame.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height), refreshed by [`Camera::update`]
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl PerspectiveCamera {
    /// Create a new perspective camera looking at the origin
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    ///
    /// # Example
    /// ```rust
    /// use scene_renderer::foundation::math::Vec3;
    /// use scene_renderer::camera::PerspectiveCamera;
    ///
    /// let camera = PerspectiveCamera::new(Vec3::new(0.0, 2.0, 5.0), 60.0, 0.1, 100.0);
    /// assert_eq!(camera.target, Vec3::zeros());
    /// ```
    #[must_use]
    pub fn new(position: Vec3, fov_degrees: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            fov: utils::deg_to_rad(fov_degrees),
            near,
            far,
            ..Self::default()
        }
    }

    /// Configure camera to look at a specific point with custom up vector
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        self.target = target;
        self.up = up;
        log::trace!("Camera look_at updated - target: {:?}, up: {:?}", target, up);
    }

    /// Update camera position in world space
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }
}

impl Camera for PerspectiveCamera {
    fn update(&mut self, viewport: Vec2) {
        // Minimized windows report a zero height; keep the last usable aspect
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            log::debug!("Ignoring degenerate viewport {}x{}", viewport.x, viewport.y);
            return;
        }

        let aspect = viewport.x / viewport.y;
        if (self.aspect - aspect).abs() > 0.01 {
            log::info!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far)
    }

    fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }
}

impl Default for PerspectiveCamera {
    /// Positioned above and behind the origin, 45 degree field of view
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 3.0, 3.0),
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: std::f32::consts::FRAC_PI_4,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_update_recomputes_aspect() {
        let mut camera = PerspectiveCamera::default();
        camera.update(Vec2::new(800.0, 600.0));
        assert_relative_eq!(camera.aspect, 800.0 / 600.0);
    }

    #[test]
    fn test_update_ignores_zero_height() {
        let mut camera = PerspectiveCamera::default();
        camera.update(Vec2::new(1280.0, 0.0));
        assert_relative_eq!(camera.aspect, 16.0 / 9.0);
    }

    #[test]
    fn test_projection_follows_aspect() {
        let mut camera = PerspectiveCamera::new(Vec3::new(0.0, 0.0, 5.0), 90.0, 0.1, 100.0);
        camera.update(Vec2::new(200.0, 100.0));

        let projection = camera.projection_matrix();
        assert_relative_eq!(projection[(1, 1)], 1.0, epsilon = 1e-5);
        assert_relative_eq!(projection[(0, 0)], 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_view_matrix_matches_math_helper() {
        let camera = PerspectiveCamera::new(Vec3::new(1.0, 2.0, 3.0), 60.0, 0.1, 10.0);
        assert_relative_eq!(
            camera.view_matrix(),
            Mat4::look_at(Vec3::new(1.0, 2.0, 3.0), Vec3::zeros(), Vec3::y()),
            epsilon = 1e-6
        );
    }
}
