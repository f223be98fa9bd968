//! Math utilities and types
//!
//! Thin aliases over `nalgebra` plus the handful of matrix builders the
//! renderer needs (axis rotations, perspective, look-at, zero-to-one ortho).

pub use nalgebra::{Matrix4, Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Math constants
pub mod constants {
    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = std::f32::consts::PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / std::f32::consts::PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    #[must_use]
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    #[must_use]
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a rotation matrix around the X axis (radians)
    fn rotation_x(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Y axis (radians)
    fn rotation_y(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Z axis (radians)
    fn rotation_z(angle: f32) -> Mat4;

    /// Create a right-handed perspective projection with a [-1, 1] depth range
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create a right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;

    /// Create a right-handed orthographic projection mapping depth to [0, 1]
    ///
    /// Passing `bottom > top` flips the Y axis, which is how pixel-space
    /// projections with a top-left origin are built.
    fn orthographic_zo(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn rotation_x(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), angle)
    }

    fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle)
    }

    fn rotation_z(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), angle)
    }

    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new_perspective(aspect, fov_y, near, far)
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let forward = (target - eye).normalize();
        let right = forward.cross(&up).normalize();
        let camera_up = right.cross(&forward);

        let translation = Mat4::new_translation(&-eye);

        #[rustfmt::skip]
        let rotation = Mat4::new(
            right.x, right.y, right.z, 0.0,
            camera_up.x, camera_up.y, camera_up.z, 0.0,
            -forward.x, -forward.y, -forward.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );

        rotation * translation
    }

    fn orthographic_zo(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
        let mut result = Mat4::identity();

        result[(0, 0)] = 2.0 / (right - left);
        result[(1, 1)] = 2.0 / (top - bottom);
        result[(2, 2)] = -1.0 / (far - near);
        result[(0, 3)] = -(right + left) / (right - left);
        result[(1, 3)] = -(top + bottom) / (top - bottom);
        result[(2, 3)] = -near / (far - near);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_deg_to_rad_round_trip() {
        assert_relative_eq!(utils::deg_to_rad(180.0), std::f32::consts::PI, epsilon = EPSILON);
        assert_relative_eq!(utils::rad_to_deg(std::f32::consts::FRAC_PI_2), 90.0, epsilon = EPSILON);
    }

    #[test]
    fn test_rotation_z_quarter_turn() {
        let rotated = Mat4::rotation_z(std::f32::consts::FRAC_PI_2).transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(rotated, Point3::new(0.0, 1.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_rotation_order_is_not_commutative() {
        let a = Mat4::rotation_x(0.7) * Mat4::rotation_y(0.3);
        let b = Mat4::rotation_y(0.3) * Mat4::rotation_x(0.7);
        assert!((a - b).abs().max() > 0.01);
    }

    #[test]
    fn test_orthographic_zo_pixel_space_corners() {
        let ortho = Mat4::orthographic_zo(0.0, 800.0, 600.0, 0.0, -1.0, 1.0);

        // Top-left pixel maps to the top-left of clip space
        let top_left = ortho.transform_point(&Point3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(top_left, Point3::new(-1.0, 1.0, 0.5), epsilon = EPSILON);

        // Bottom-right pixel maps to the bottom-right
        let bottom_right = ortho.transform_point(&Point3::new(800.0, 600.0, 0.0));
        assert_relative_eq!(bottom_right, Point3::new(1.0, -1.0, 0.5), epsilon = EPSILON);

        // Depth range [-1, 1] lands in [0, 1]
        let near = ortho.transform_point(&Point3::new(0.0, 0.0, 1.0));
        let far = ortho.transform_point(&Point3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(near.z, 0.0, epsilon = EPSILON);
        assert_relative_eq!(far.z, 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_look_at_moves_eye_to_origin() {
        let view = Mat4::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::zeros(), Vec3::y());
        let eye = view.transform_point(&Point3::new(0.0, 0.0, 5.0));
        assert_relative_eq!(eye, Point3::origin(), epsilon = EPSILON);

        // Target ends up straight ahead, down the negative Z axis
        let target = view.transform_point(&Point3::origin());
        assert_relative_eq!(target, Point3::new(0.0, 0.0, -5.0), epsilon = EPSILON);
    }
}
