//! Height-map terrain
//!
//! The terrain is an `N×N` grid of square cells centred on the origin in X
//! and Z. Every cell owns four vertices (no sharing between cells) and six
//! indices, and takes a single height sample. To keep the surface closed,
//! a cell's left edge copies the heights of the previous cell's right edge
//! and its top edge copies the heights of the cell above's bottom edge.
//!
//! Cell corners, looking down on the grid:
//!
//! ```text
//!   v1 ---- v2      (row z, toward +Z)
//!   |        |
//!   v3 ---- v4      (row z + 1)
//! ```

use crate::assets::load_height_map;
use crate::config::TerrainConfig;
use crate::foundation::math::{Mat4, Vec3};
use crate::render::{
    BackendResult, BlendMode, CullMode, DrawCommand, FillMode, FrameContext, Lighting, MeshHandle, PipelineDesc,
    PipelineHandle, RenderBackend, RenderError, ShaderSource, Vertex, VertexLayout,
};
use crate::scene::node::Drawable;

/// Generated terrain vertices and indices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerrainGeometry {
    /// Four vertices per cell, in cell order
    pub vertices: Vec<Vertex>,
    /// Six indices per cell
    pub indices: Vec<u32>,
}

impl TerrainGeometry {
    /// True when the grid has no cells
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Build the terrain grid from normalized height samples
///
/// With `S = min(heights.len(), N*N)` samples, cell `c` uses sample
/// `floor(S * c / (N*N))`. An empty sample list gives a flat grid.
pub fn generate_terrain(heights: &[f32], grid_size: u32, cell_size: f32, max_height: f32) -> TerrainGeometry {
    let n = grid_size as usize;
    let cells = n * n;
    let samples = heights.len().min(cells);

    let half_extent = grid_size as f32 * cell_size / 2.0;
    let x_offset = -half_extent;
    let z_offset = half_extent;

    let mut vertices: Vec<Vertex> = Vec::with_capacity(cells * 4);
    let mut indices: Vec<u32> = Vec::with_capacity(cells * 6);

    for cell in 0..cells {
        let (x, z) = (cell % n, cell / n);
        let sample = if samples == 0 {
            0.0
        } else {
            heights[(samples as u64 * cell as u64 / cells as u64) as usize]
        };
        let height = sample * max_height;

        let left = x as f32 * cell_size + x_offset;
        let right = (x + 1) as f32 * cell_size + x_offset;
        let near = -(z as f32 * cell_size) + z_offset;
        let far = -((z + 1) as f32 * cell_size) + z_offset;

        let mut v1 = Vec3::new(left, height, near);
        let mut v2 = Vec3::new(right, height, near);
        let mut v3 = Vec3::new(left, height, far);
        let v4 = Vec3::new(right, height, far);

        if x > 0 {
            let previous = (cell - 1) * 4;
            v1.y = vertices[previous + 1].position[1];
            v3.y = vertices[previous + 3].position[1];
        }
        if z > 0 {
            let above = (cell - n) * 4;
            v1.y = vertices[above + 2].position[1];
            v2.y = vertices[above + 3].position[1];
        }

        let normal = (v2 - v1).cross(&(v3 - v1)).try_normalize(f32::EPSILON).unwrap_or_else(Vec3::y);
        let normal = [normal.x, normal.y, normal.z];

        vertices.push(Vertex::lit(v1.into(), normal, [0.0, 0.0]));
        vertices.push(Vertex::lit(v2.into(), normal, [1.0, 0.0]));
        vertices.push(Vertex::lit(v3.into(), normal, [0.0, 1.0]));
        vertices.push(Vertex::lit(v4.into(), normal, [1.0, 1.0]));

        let base = (cell * 4) as u32;
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 1, base + 3]);
    }

    TerrainGeometry { vertices, indices }
}

/// Wireframe terrain generated from a height map
#[derive(Debug)]
pub struct TerrainNode {
    geometry: TerrainGeometry,
    lighting: Lighting,
    shader: ShaderSource,
    pipeline: Option<PipelineHandle>,
    mesh: Option<MeshHandle>,
}

impl TerrainNode {
    /// Load the configured height map and build the grid
    ///
    /// A missing or unreadable height map is not fatal: the terrain is
    /// generated flat and a warning is logged.
    pub fn from_config(config: &TerrainConfig) -> Self {
        let heights = load_height_map(&config.height_map).unwrap_or_else(|e| {
            log::warn!("{}; generating flat terrain", e);
            Vec::new()
        });
        Self::from_heights(&heights, config)
    }

    /// Build the grid from samples already in memory
    pub fn from_heights(heights: &[f32], config: &TerrainConfig) -> Self {
        let geometry = generate_terrain(heights, config.grid_size, config.cell_size, config.max_height);
        log::debug!(
            "Generated terrain: {}x{} cells, {} vertices",
            config.grid_size, config.grid_size, geometry.vertices.len()
        );
        Self {
            geometry,
            lighting: Lighting::default(),
            shader: ShaderSource::new("TexturedShaders.hlsl", "VShader", "PShader"),
            pipeline: None,
            mesh: None,
        }
    }

    /// Generated geometry
    pub fn geometry(&self) -> &TerrainGeometry {
        &self.geometry
    }
}

impl Drawable for TerrainNode {
    fn initialise(&mut self, label: &str, backend: &mut dyn RenderBackend) -> BackendResult<()> {
        self.pipeline = Some(backend.create_pipeline(&PipelineDesc {
            label: format!("{}:pipeline", label),
            shader: self.shader.clone(),
            layout: VertexLayout::PositionNormalTexCoord,
            fill: FillMode::Wireframe,
            cull: CullMode::Back,
        })?);

        if self.geometry.is_empty() {
            log::warn!("Terrain '{}' has no cells, nothing will be drawn", label);
            return Ok(());
        }
        self.mesh = Some(backend.create_mesh(
            &format!("{}:mesh", label),
            &self.geometry.vertices,
            &self.geometry.indices,
        )?);
        Ok(())
    }

    fn render(&self, world: &Mat4, frame: &mut FrameContext<'_>) -> BackendResult<()> {
        let pipeline = self.pipeline.ok_or(RenderError::UnknownResource("pipeline"))?;
        let Some(mesh) = self.mesh else {
            return Ok(());
        };

        let mut constants = frame.object_constants(world);
        self.lighting.apply_to(&mut constants);
        constants.diffuse_coefficient = [0.5, 0.5, 0.5, 1.0];
        constants.specular_coefficient = [0.5, 0.5, 0.5, 1.0];
        constants.shininess = 1.0;
        constants.opacity = 1.0;

        frame.backend.draw(&DrawCommand {
            pipeline,
            mesh,
            index_count: self.geometry.indices.len() as u32,
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
