//! Vertex and per-draw constant layouts
//!
//! Both types are plain `#[repr(C)]` data that backends can upload as bytes.

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::{Mat4, Vec3};

/// 3D vertex data structure for rendering
///
/// Cube vertices use `position` + `color`; mesh and terrain vertices use
/// `position` + `normal` + `tex_coord`. Unused attributes stay zeroed.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    /// Position in object space
    pub position: [f32; 3],
    /// Normal vector
    pub normal: [f32; 3],
    /// Texture coordinates
    pub tex_coord: [f32; 2],
    /// RGBA colour
    pub color: [f32; 4],
}

impl Vertex {
    /// Vertex with position and colour
    pub fn colored(position: [f32; 3], color: [f32; 4]) -> Self {
        Self {
            position,
            color,
            ..Self::default()
        }
    }

    /// Vertex with position, normal and texture coordinates
    pub fn lit(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coord,
            ..Self::default()
        }
    }
}

/// Per-draw shader constants
///
/// Built on the stack for every draw; nothing is shared between draws.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ObjectConstants {
    /// `projection * view * world`
    pub complete_transformation: [[f32; 4]; 4],
    /// Object-to-world transform
    pub world_transformation: [[f32; 4]; 4],
    /// Camera position, w = 1
    pub camera_position: [f32; 4],
    /// Normalized directional light vector
    pub light_vector: [f32; 4],
    /// Directional light colour
    pub light_color: [f32; 4],
    /// Ambient light colour
    pub ambient_color: [f32; 4],
    /// Diffuse reflection coefficient
    pub diffuse_coefficient: [f32; 4],
    /// Specular reflection coefficient
    pub specular_coefficient: [f32; 4],
    /// Specular exponent
    pub shininess: f32,
    /// Material opacity
    pub opacity: f32,
    /// Pads the block to a 16-byte multiple
    pub padding: [f32; 2],
}

impl ObjectConstants {
    /// Constants carrying only transforms; lighting and material fields are zero
    /// except opacity, which defaults to fully opaque
    pub fn from_transforms(world: &Mat4, view: &Mat4, projection: &Mat4, camera_position: &Vec3) -> Self {
        let complete = projection * view * world;
        Self {
            complete_transformation: complete.into(),
            world_transformation: (*world).into(),
            camera_position: [camera_position.x, camera_position.y, camera_position.z, 1.0],
            opacity: 1.0,
            ..Self::zeroed()
        }
    }

    /// The complete transformation as a matrix
    pub fn complete_matrix(&self) -> Mat4 {
        Mat4::from(self.complete_transformation)
    }
}
