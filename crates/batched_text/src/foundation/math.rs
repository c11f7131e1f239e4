//! Math utilities and types
//!
//! Thin aliases over `nalgebra` plus the handful of matrix helpers the text
//! pipeline needs when placing glyphs in a scene.

pub use nalgebra::{
    Vector2, Vector3, Vector4,
    Matrix3, Matrix4,
    Quaternion,
    Unit,
};

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

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,
    
    /// Rotation quaternion
    pub rotation: Quat,
    
    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }
    
    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
    
    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }
    
    /// Set the scale, keeping position and rotation
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }
    
    /// Convert to a transformation matrix (translation * rotation * scale)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;
    
    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a rotation matrix around the X axis
    fn rotation_x(angle: f32) -> Mat4;
    
    /// Create a translation matrix on the XY plane
    fn translation_xy(x: f32, y: f32) -> Mat4;
    
    /// Write the matrix as 16 column-major floats into `out[..16]`
    fn write_column_major(&self, out: &mut [f32]);
}

impl Mat4Ext for Mat4 {
    fn rotation_x(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), angle)
    }
    
    fn translation_xy(x: f32, y: f32) -> Mat4 {
        Mat4::new_translation(&Vec3::new(x, y, 0.0))
    }
    
    fn write_column_major(&self, out: &mut [f32]) {
        // nalgebra stores matrices column-major already
        out[..16].copy_from_slice(self.as_slice());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    
    #[test]
    fn test_transform_to_matrix_translation() {
        let transform = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        let point = transform.to_matrix().transform_point(&Point3::origin());
        
        assert_relative_eq!(point, Point3::new(1.0, 2.0, 3.0), epsilon = 1e-6);
    }
    
    #[test]
    fn test_write_column_major_puts_translation_last() {
        let matrix = Mat4::translation_xy(4.0, -2.0);
        let mut out = [0.0f32; 16];
        matrix.write_column_major(&mut out);
        
        assert_eq!(out[12], 4.0);
        assert_eq!(out[13], -2.0);
        assert_eq!(out[14], 0.0);
        assert_eq!(out[15], 1.0);
    }
    
    #[test]
    fn test_rotation_x_half_turn_flips_y() {
        let rotated = Mat4::rotation_x(constants::PI).transform_vector(&Vec3::new(0.0, 1.0, 0.0));
        
        assert_relative_eq!(rotated, Vec3::new(0.0, -1.0, 0.0), epsilon = 1e-6);
    }
}
