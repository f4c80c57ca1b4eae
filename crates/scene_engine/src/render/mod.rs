//! # Rendering System
//!
//! The boundary between the scene graph and whatever draws pixels.
//!
//! ## Architecture
//!
//! - **Camera**: free-look camera producing the per-frame view matrix
//! - **Backend**: [`RenderBackend`] capability for pipelines, meshes and draws
//! - **Recording backend**: headless [`RenderBackend`] for dry runs and tests
//! - **Resource types**: vertices, per-draw constants, materials, lighting
//!
//! Drawables receive everything they need for a draw through a
//! [`FrameContext`]; there is no globally reachable renderer or camera.

pub mod backend;
pub mod camera;
pub mod lighting;
pub mod material;
pub mod recording;
pub mod vertex;

pub use backend::{
    BackendResult, BlendMode, CullMode, DrawCommand, FillMode, MeshHandle, PipelineDesc, PipelineHandle,
    RenderBackend, RenderError, ShaderSource, VertexLayout,
};
pub use camera::{Camera, CameraBasis};
pub use lighting::Lighting;
pub use material::Material;
pub use recording::{DrawRecord, FrameStats, RecordingBackend};
pub use vertex::{ObjectConstants, Vertex};

use crate::foundation::math::{Mat4, Vec3};

/// Per-frame state threaded through the render traversal
///
/// Bundles the camera-derived matrices with the backend so drawables never
/// reach for global state.
pub struct FrameContext<'a> {
    /// View matrix from the camera's latest update
    pub view: Mat4,
    /// Projection matrix owned by the driver
    pub projection: Mat4,
    /// Camera position in world space
    pub camera_position: Vec3,
    /// Backend receiving draw commands
    pub backend: &'a mut dyn RenderBackend,
}

impl<'a> FrameContext<'a> {
    /// Build a context from a camera and projection
    pub fn new(camera: &Camera, projection: Mat4, backend: &'a mut dyn RenderBackend) -> Self {
        Self {
            view: camera.view_matrix(),
            projection,
            camera_position: camera.position(),
            backend,
        }
    }

    /// Constants for drawing an object with the given world transform
    pub fn object_constants(&self, world: &Mat4) -> ObjectConstants {
        ObjectConstants::from_transforms(world, &self.view, &self.projection, &self.camera_position)
    }
}

impl std::fmt::Debug for FrameContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameContext")
            .field("view", &self.view)
            .field("projection", &self.projection)
            .field("camera_position", &self.camera_position)
            .finish_non_exhaustive()
    }
}
