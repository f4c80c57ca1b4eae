//! Backend abstraction traits for the rendering system
//!
//! Scene nodes never talk to a graphics API directly. They describe the
//! pipelines and geometry they need once during initialisation, then submit
//! one [`DrawCommand`] per draw with a fully prepared [`ObjectConstants`]
//! block. How those become GPU work is up to the implementor.

use thiserror::Error;

use crate::render::{ObjectConstants, Vertex};

slotmap::new_key_type! {
    /// Handle to a vertex/index buffer pair stored in the backend
    pub struct MeshHandle;

    /// Handle to a shader + input layout + fixed-function state bundle
    pub struct PipelineHandle;
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Errors raised by a rendering backend
#[derive(Error, Debug)]
pub enum RenderError {
    /// The backend refused to create a resource
    #[error("Failed to create {kind} '{label}': {reason}")]
    ResourceCreation {
        /// Resource category ("pipeline", "mesh")
        kind: &'static str,
        /// Label supplied by the caller
        label: String,
        /// Backend-specific reason
        reason: String,
    },

    /// A handle did not refer to a live resource
    #[error("Unknown {0} handle")]
    UnknownResource(&'static str),

    /// A draw could not be recorded
    #[error("Draw failed: {0}")]
    Draw(String),
}

/// Vertex format a pipeline consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexLayout {
    /// Position + colour
    PositionColor,
    /// Position + normal + texture coordinates
    PositionNormalTexCoord,
}

/// Rasterizer fill mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    /// Filled triangles
    #[default]
    Solid,
    /// Triangle edges only
    Wireframe,
}

/// Face culling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullMode {
    /// No culling
    None,
    /// Cull back faces
    #[default]
    Back,
}

/// Output merger blend state for a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// No blending (fully opaque)
    #[default]
    Opaque,
    /// Source-alpha / inverse-source-alpha blending
    AlphaBlend,
}

/// Shader file and entry points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    /// Shader source file
    pub file: String,
    /// Vertex stage entry point
    pub vertex_entry: String,
    /// Pixel stage entry point
    pub pixel_entry: String,
}

impl ShaderSource {
    /// Create a shader source description
    pub fn new(file: impl Into<String>, vertex_entry: impl Into<String>, pixel_entry: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            vertex_entry: vertex_entry.into(),
            pixel_entry: pixel_entry.into(),
        }
    }
}

/// Everything a backend needs to build a pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineDesc {
    /// Debug label, also used for diagnostics
    pub label: String,
    /// Shaders to compile
    pub shader: ShaderSource,
    /// Vertex input layout
    pub layout: VertexLayout,
    /// Rasterizer fill mode
    pub fill: FillMode,
    /// Rasterizer cull mode
    pub cull: CullMode,
}

/// One indexed draw
#[derive(Debug, Clone, Copy)]
pub struct DrawCommand {
    /// Pipeline to bind
    pub pipeline: PipelineHandle,
    /// Geometry to draw
    pub mesh: MeshHandle,
    /// Number of indices to draw from the start of the index buffer
    pub index_count: u32,
    /// Blend state for this draw
    pub blend: BlendMode,
    /// Per-draw constant block
    pub constants: ObjectConstants,
}

/// Rendering backend capability
///
/// Resource creation happens during node initialisation; failures there are
/// fatal for that initialisation. Releasing an unknown handle is ignored.
pub trait RenderBackend {
    /// Compile shaders and build the fixed-function state for a pipeline
    fn create_pipeline(&mut self, desc: &PipelineDesc) -> BackendResult<PipelineHandle>;

    /// Upload vertex and index data
    fn create_mesh(&mut self, label: &str, vertices: &[Vertex], indices: &[u32]) -> BackendResult<MeshHandle>;

    /// Record one indexed draw
    fn draw(&mut self, command: &DrawCommand) -> BackendResult<()>;

    /// Release a pipeline created by this backend
    fn release_pipeline(&mut self, handle: PipelineHandle);

    /// Release a mesh created by this backend
    fn release_mesh(&mut self, handle: MeshHandle);

    /// Called by the driver before the first draw of a frame
    fn begin_frame(&mut self) {}

    /// Called by the driver after the last draw of a frame
    fn end_frame(&mut self) {}
}
