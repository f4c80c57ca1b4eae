//! Multi-material mesh with a part hierarchy
//!
//! A [`Mesh`] owns a flat list of [`SubMesh`]es (geometry plus material) and
//! a tree of [`MeshPart`]s that reference them by index. Rendering walks the
//! part tree twice: first drawing submeshes whose material is opaque, then
//! those that are translucent, so blended surfaces composite over finished
//! opaque geometry. Depth sorting inside the translucent pass is not done.

use crate::foundation::math::Mat4;
use crate::render::{
    BackendResult, BlendMode, CullMode, DrawCommand, FillMode, FrameContext, Lighting, Material, MeshHandle,
    PipelineDesc, PipelineHandle, RenderBackend, RenderError, ShaderSource, Vertex, VertexLayout,
};
use crate::scene::node::Drawable;

/// Which materials a render pass draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPass {
    /// Opacity of exactly one
    Opaque,
    /// Opacity below one, alpha blended
    Transparent,
}

impl RenderPass {
    /// Whether a submesh with this material belongs to the pass
    pub fn accepts(self, material: &Material) -> bool {
        match self {
            Self::Opaque => material.is_opaque(),
            Self::Transparent => !material.is_opaque(),
        }
    }

    fn blend(self) -> BlendMode {
        match self {
            Self::Opaque => BlendMode::Opaque,
            Self::Transparent => BlendMode::AlphaBlend,
        }
    }
}

/// Geometry drawn with a single material
#[derive(Debug, Clone)]
pub struct SubMesh {
    /// Vertex data
    pub vertices: Vec<Vertex>,
    /// Triangle list indices
    pub indices: Vec<u32>,
    /// Surface material
    pub material: Material,
}

impl SubMesh {
    /// Bundle geometry with a material
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>, material: Material) -> Self {
        Self {
            vertices,
            indices,
            material,
        }
    }
}

/// Named node of the part hierarchy
#[derive(Debug, Clone, Default)]
pub struct MeshPart {
    /// Part name
    pub name: String,
    /// Indices into [`Mesh::submeshes`] drawn by this part
    pub submeshes: Vec<usize>,
    /// Child parts, drawn after this part's own submeshes
    pub children: Vec<MeshPart>,
}

impl MeshPart {
    /// Part drawing the given submeshes
    pub fn new(name: impl Into<String>, submeshes: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            submeshes,
            children: Vec::new(),
        }
    }

    /// Append a child part
    pub fn with_child(mut self, child: MeshPart) -> Self {
        self.children.push(child);
        self
    }
}

/// Submeshes plus the part tree that references them
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// All submeshes
    pub submeshes: Vec<SubMesh>,
    /// Root of the part hierarchy
    pub root: MeshPart,
}

impl Mesh {
    /// Mesh with a single root part drawing every submesh in order
    pub fn from_submeshes(submeshes: Vec<SubMesh>) -> Self {
        let root = MeshPart::new("root", (0..submeshes.len()).collect());
        Self { submeshes, root }
    }

    /// Mesh with an explicit part hierarchy
    pub fn with_parts(submeshes: Vec<SubMesh>, root: MeshPart) -> Self {
        Self { submeshes, root }
    }

    /// Submesh indices the pass draws, in part-tree order
    ///
    /// Each part contributes its own submeshes before its children's.
    pub fn pass_order(&self, pass: RenderPass) -> Vec<usize> {
        let mut order = Vec::new();
        self.collect_pass(&self.root, pass, &mut order);
        order
    }

    fn collect_pass(&self, part: &MeshPart, pass: RenderPass, order: &mut Vec<usize>) {
        for &index in &part.submeshes {
            if let Some(submesh) = self.submeshes.get(index) {
                if pass.accepts(&submesh.material) {
                    order.push(index);
                }
            }
        }
        for child in &part.children {
            self.collect_pass(child, pass, order);
        }
    }

    fn first_dangling_reference(&self) -> Option<(&str, usize)> {
        let mut parts = vec![&self.root];
        while let Some(part) = parts.pop() {
            if let Some(&index) = part.submeshes.iter().find(|&&index| index >= self.submeshes.len()) {
                return Some((part.name.as_str(), index));
            }
            parts.extend(part.children.iter());
        }
        None
    }
}

/// Drawable wrapping a [`Mesh`]
#[derive(Debug)]
pub struct MeshNode {
    mesh: Mesh,
    lighting: Lighting,
    shader: ShaderSource,
    pipeline: Option<PipelineHandle>,
    handles: Vec<MeshHandle>,
}

impl MeshNode {
    /// Drawable for `mesh` with default lighting
    pub fn new(mesh: Mesh) -> Self {
        Self {
            mesh,
            lighting: Lighting::default(),
            shader: ShaderSource::new("TexturedShaders.hlsl", "VShader", "PShader"),
            pipeline: None,
            handles: Vec::new(),
        }
    }

    /// Replace the lighting used for every draw
    pub fn with_lighting(mut self, lighting: Lighting) -> Self {
        self.lighting = lighting;
        self
    }

    /// The wrapped mesh
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    fn render_pass(&self, pass: RenderPass, world: &Mat4, frame: &mut FrameContext<'_>) -> BackendResult<()> {
        let pipeline = self.pipeline.ok_or(RenderError::UnknownResource("pipeline"))?;

        for index in self.mesh.pass_order(pass) {
            let (Some(submesh), Some(&mesh)) = (self.mesh.submeshes.get(index), self.handles.get(index)) else {
                return Err(RenderError::UnknownResource("mesh"));
            };
            let material = &submesh.material;

            let mut constants = frame.object_constants(world);
            self.lighting.apply_to(&mut constants);
            constants.diffuse_coefficient = material.diffuse;
            constants.specular_coefficient = material.specular;
            constants.shininess = material.shininess;
            constants.opacity = material.opacity;

            frame.backend.draw(&DrawCommand {
                pipeline,
                mesh,
                index_count: submesh.indices.len() as u32,
                blend: pass.blend(),
                constants,
            })?;
        }
        Ok(())
    }
}

impl Drawable for MeshNode {
    fn initialise(&mut self, label: &str, backend: &mut dyn RenderBackend) -> BackendResult<()> {
        if let Some((part, index)) = self.mesh.first_dangling_reference() {
            return Err(RenderError::ResourceCreation {
                kind: "mesh",
                label: label.to_string(),
                reason: format!("part '{}' references missing submesh {}", part, index),
            });
        }

        self.pipeline = Some(backend.create_pipeline(&PipelineDesc {
            label: format!("{}:pipeline", label),
            shader: self.shader.clone(),
            layout: VertexLayout::PositionNormalTexCoord,
            fill: FillMode::Solid,
            cull: CullMode::None,
        })?);

        for (index, submesh) in self.mesh.submeshes.iter().enumerate() {
            let handle = backend.create_mesh(
                &format!("{}:{}:{}", label, index, submesh.material.name),
                &submesh.vertices,
                &submesh.indices,
            )?;
            self.handles.push(handle);
        }

        log::debug!("Mesh '{}' initialised with {} submeshes", label, self.handles.len());
        Ok(())
    }

    fn render(&self, world: &Mat4, frame: &mut FrameContext<'_>) -> BackendResult<()> {
        self.render_pass(RenderPass::Opaque, world, frame)?;
        self.render_pass(RenderPass::Transparent, world, frame)
    }

    fn shutdown(&mut self, backend: &mut dyn RenderBackend) {
        for handle in self.handles.drain(..) {
            backend.release_mesh(handle);
        }
        if let Some(pipeline) = self.pipeline.take() {
            backend.release_pipeline(pipeline);
        }
    }
}
