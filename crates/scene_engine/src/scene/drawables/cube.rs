//! Vertex-coloured cube

use crate::foundation::math::Mat4;
use crate::render::{
    BackendResult, BlendMode, CullMode, DrawCommand, FillMode, FrameContext, MeshHandle, PipelineDesc,
    PipelineHandle, RenderBackend, RenderError, ShaderSource, Vertex, VertexLayout,
};
use crate::scene::node::Drawable;

const HOT_PINK: [f32; 4] = [1.0, 0.412, 0.706, 1.0];
const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const GREEN: [f32; 4] = [0.0, 0.502, 0.0, 1.0];
const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
const YELLOW: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
const CYAN: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
const MAGENTA: [f32; 4] = [1.0, 0.0, 1.0, 1.0];

/// Triangle list: front, back, left, right, top, bottom
pub const CUBE_INDICES: [u32; 36] = [
    0, 1, 2, 0, 2, 3, //
    4, 6, 5, 4, 7, 6, //
    4, 5, 1, 4, 1, 0, //
    3, 2, 6, 3, 6, 7, //
    1, 5, 6, 1, 6, 2, //
    4, 0, 3, 4, 3, 7,
];

/// The eight corners at ±1, one colour each
pub fn cube_vertices() -> [Vertex; 8] {
    [
        Vertex::colored([-1.0, -1.0, -1.0], HOT_PINK),
        Vertex::colored([-1.0, 1.0, -1.0], BLACK),
        Vertex::colored([1.0, 1.0, -1.0], RED),
        Vertex::colored([1.0, -1.0, -1.0], GREEN),
        Vertex::colored([-1.0, -1.0, 1.0], BLUE),
        Vertex::colored([-1.0, 1.0, 1.0], YELLOW),
        Vertex::colored([1.0, 1.0, 1.0], CYAN),
        Vertex::colored([1.0, -1.0, 1.0], MAGENTA),
    ]
}

/// A 2×2×2 cube drawn with per-vertex colours
#[derive(Debug)]
pub struct CubeNode {
    shader: ShaderSource,
    pipeline: Option<PipelineHandle>,
    mesh: Option<MeshHandle>,
}

impl Default for CubeNode {
    fn default() -> Self {
        Self::new()
    }
}

impl CubeNode {
    /// Cube using the default colour shader
    pub fn new() -> Self {
        Self::with_shader(ShaderSource::new("shader.hlsl", "VS", "PS"))
    }

    /// Cube using a custom shader
    pub fn with_shader(shader: ShaderSource) -> Self {
        Self {
            shader,
            pipeline: None,
            mesh: None,
        }
    }
}

impl Drawable for CubeNode {
    fn initialise(&mut self, label: &str, backend: &mut dyn RenderBackend) -> BackendResult<()> {
        self.pipeline = Some(backend.create_pipeline(&PipelineDesc {
            label: format!("{}:pipeline", label),
            shader: self.shader.clone(),
            layout: VertexLayout::PositionColor,
            fill: FillMode::Solid,
            cull: CullMode::Back,
        })?);
        self.mesh = Some(backend.create_mesh(&format!("{}:mesh", label), &cube_vertices(), &CUBE_INDICES)?);
        Ok(())
    }

    fn render(&self, world: &Mat4, frame: &mut FrameContext<'_>) -> BackendResult<()> {
        let (Some(pipeline), Some(mesh)) = (self.pipeline, self.mesh) else {
            return Err(RenderError::UnknownResource("cube"));
        };
        let constants = frame.object_constants(world);
        frame.backend.draw(&DrawCommand {
            pipeline,
            mesh,
            index_count: CUBE_INDICES.len() as u32,
            blend: BlendMode::Opaque,
            constants,
        })
    }

    fn shutdown(&mut self, backend: &mut dyn RenderBackend) {
        if let Some(mesh) = self.mesh.take() {
            backend.release_mesh(mesh);
        }
        if let Some(pipeline) = self.pipeline.take() {
            backend.release_pipeline(pipeline);
        }
    }
}
