//! Math utilities and types
//!
//! Provides the vector and matrix aliases used by the camera, the scene graph
//! and the drawables.
//!
//! # Conventions
//! All matrices follow nalgebra's column-vector convention: a point is
//! transformed as `M * p`, so a child's combined transform is written
//! `parent * local` and the complete draw transform `projection * view * world`.
//!
//! The world is left-handed and Y-up: +X right, +Y up, +Z forward (into the
//! screen). View space matches it and the projection maps depth into `[0, 1]`.

pub use nalgebra::{Matrix4, Unit, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }
}

/// Extension trait for Mat4 with the constructors the renderer needs
pub trait Mat4Ext {
    /// Rotation of `angle` radians about an arbitrary axis
    ///
    /// The axis does not need to be normalized. A zero axis yields identity.
    fn rotation_axis(axis: &Vec3, angle: f32) -> Mat4;

    /// Rotation about the X axis
    fn rotation_x(angle: f32) -> Mat4;

    /// Rotation about the Y axis
    fn rotation_y(angle: f32) -> Mat4;

    /// Rotation about the Z axis
    fn rotation_z(angle: f32) -> Mat4;

    /// Left-handed perspective projection with depth mapped to `[0, 1]`
    fn perspective_lh(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Left-handed look-at view matrix
    ///
    /// Maps `eye` to the origin and the direction towards `target` onto +Z.
    fn look_at_left_handed(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn rotation_axis(axis: &Vec3, angle: f32) -> Mat4 {
        Unit::try_new(*axis, f32::EPSILON)
            .map_or_else(Mat4::identity, |unit| Mat4::from_axis_angle(&unit, angle))
    }

    fn rotation_x(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), angle)
    }

    fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle)
    }

    fn rotation_z(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), angle)
    }

    fn perspective_lh(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        // P = [1/(a·tan(φ/2))  0            0          0        ]
        //     [0               1/tan(φ/2)   0          0        ]
        //     [0               0            f/(f-n)    -nf/(f-n)]
        //     [0               0            1          0        ]
        let tan_half_fovy = (fov_y * 0.5).tan();

        let mut result = Mat4::zeros();
        result[(0, 0)] = 1.0 / (aspect * tan_half_fovy);
        result[(1, 1)] = 1.0 / tan_half_fovy;
        result[(2, 2)] = far / (far - near);
        result[(2, 3)] = -(near * far) / (far - near);
        result[(3, 2)] = 1.0;
        result
    }

    fn look_at_left_handed(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4 {
        Mat4::look_at_lh(&Point3::from(*eye), &Point3::from(*target), up)
    }
}

/// Transform a direction by the rotational part of `matrix`
pub fn transform_direction(matrix: &Mat4, direction: &Vec3) -> Vec3 {
    matrix.transform_vector(direction)
}
