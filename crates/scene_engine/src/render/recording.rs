//! Headless backend that records draw work instead of submitting it
//!
//! Used for dry runs of a scene and by tests. Resources live in slot maps so
//! handles behave like real backend handles: released handles are rejected
//! by later draws. Creation of specific labels can be refused to exercise
//! initialisation failures.

use std::collections::HashSet;

use slotmap::SlotMap;

use crate::render::backend::{
    BackendResult, BlendMode, DrawCommand, MeshHandle, PipelineDesc, PipelineHandle, RenderBackend, RenderError,
};
use crate::render::{ObjectConstants, Vertex};

#[derive(Debug, Clone)]
struct MeshRecord {
    label: String,
    vertex_count: usize,
    index_count: usize,
}

/// One recorded draw, resolved to labels for easy inspection
#[derive(Debug, Clone)]
pub struct DrawRecord {
    /// Label of the bound pipeline
    pub pipeline: String,
    /// Label of the drawn mesh
    pub mesh: String,
    /// Indices drawn
    pub index_count: u32,
    /// Blend state used
    pub blend: BlendMode,
    /// Constants submitted with the draw
    pub constants: ObjectConstants,
}

/// Per-frame draw statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Draw calls recorded during the frame
    pub draw_calls: usize,
    /// Indices submitted during the frame
    pub indices: u64,
}

/// Backend that keeps everything in memory
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pipelines: SlotMap<PipelineHandle, PipelineDesc>,
    meshes: SlotMap<MeshHandle, MeshRecord>,
    draws: Vec<DrawRecord>,
    refused: HashSet<String>,
    frame_start: usize,
    last_frame: FrameStats,
    frames_completed: u64,
}

impl RecordingBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later attempt to create a resource with this label fail
    pub fn refuse(&mut self, label: impl Into<String>) {
        self.refused.insert(label.into());
    }

    /// All draws recorded since creation
    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    /// Number of pipelines not yet released
    pub fn live_pipelines(&self) -> usize {
        self.pipelines.len()
    }

    /// Number of meshes not yet released
    pub fn live_meshes(&self) -> usize {
        self.meshes.len()
    }

    /// Statistics of the last completed frame
    pub fn last_frame_stats(&self) -> FrameStats {
        self.last_frame
    }

    /// Frames completed through [`RenderBackend::end_frame`]
    pub fn frames_completed(&self) -> u64 {
        self.frames_completed
    }

    fn check_refused(&self, kind: &'static str, label: &str) -> BackendResult<()> {
        if self.refused.contains(label) {
            return Err(RenderError::ResourceCreation {
                kind,
                label: label.to_string(),
                reason: "refused by recording backend".to_string(),
            });
        }
        Ok(())
    }
}

impl RenderBackend for RecordingBackend {
    fn create_pipeline(&mut self, desc: &PipelineDesc) -> BackendResult<PipelineHandle> {
        self.check_refused("pipeline", &desc.label)?;
        log::debug!(
            "Creating pipeline '{}' from {} ({}/{})",
            desc.label, desc.shader.file, desc.shader.vertex_entry, desc.shader.pixel_entry
        );
        Ok(self.pipelines.insert(desc.clone()))
    }

    fn create_mesh(&mut self, label: &str, vertices: &[Vertex], indices: &[u32]) -> BackendResult<MeshHandle> {
        self.check_refused("mesh", label)?;
        if vertices.is_empty() || indices.is_empty() {
            return Err(RenderError::ResourceCreation {
                kind: "mesh",
                label: label.to_string(),
                reason: "empty vertex or index data".to_string(),
            });
        }
        if let Some(bad) = indices.iter().find(|&&index| index as usize >= vertices.len()) {
            return Err(RenderError::ResourceCreation {
                kind: "mesh",
                label: label.to_string(),
                reason: format!("index {} out of range for {} vertices", bad, vertices.len()),
            });
        }

        log::debug!("Creating mesh '{}' ({} vertices, {} indices)", label, vertices.len(), indices.len());
        Ok(self.meshes.insert(MeshRecord {
            label: label.to_string(),
            vertex_count: vertices.len(),
            index_count: indices.len(),
        }))
    }

    fn draw(&mut self, command: &DrawCommand) -> BackendResult<()> {
        let pipeline = self.pipelines.get(command.pipeline).ok_or(RenderError::UnknownResource("pipeline"))?;
        let mesh = self.meshes.get(command.mesh).ok_or(RenderError::UnknownResource("mesh"))?;

        if command.index_count as usize > mesh.index_count {
            return Err(RenderError::Draw(format!(
                "'{}' has {} indices, {} requested",
                mesh.label, mesh.index_count, command.index_count
            )));
        }

        log::trace!("Draw '{}' with '{}' ({} indices)", mesh.label, pipeline.label, command.index_count);
        self.draws.push(DrawRecord {
            pipeline: pipeline.label.clone(),
            mesh: mesh.label.clone(),
            index_count: command.index_count,
            blend: command.blend,
            constants: command.constants,
        });
        Ok(())
    }

    fn release_pipeline(&mut self, handle: PipelineHandle) {
        if let Some(desc) = self.pipelines.remove(handle) {
            log::debug!("Released pipeline '{}'", desc.label);
        }
    }

    fn release_mesh(&mut self, handle: MeshHandle) {
        if let Some(mesh) = self.meshes.remove(handle) {
            log::debug!("Released mesh '{}' ({} vertices)", mesh.label, mesh.vertex_count);
        }
    }

    fn begin_frame(&mut self) {
        self.frame_start = self.draws.len();
    }

    fn end_frame(&mut self) {
        let frame_draws = &self.draws[self.frame_start.min(self.draws.len())..];
        self.last_frame = FrameStats {
            draw_calls: frame_draws.len(),
            indices: frame_draws.iter().map(|draw| u64::from(draw.index_count)).sum(),
        };
        self.frames_completed += 1;
        log::trace!("Frame {} recorded {} draws", self.frames_completed, self.last_frame.draw_calls);
    }
}
