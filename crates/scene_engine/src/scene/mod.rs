//! Scene graph
//!
//! ## Architecture
//!
//! ```text
//! SceneGraph (arena)
//!   └─ Root group
//!        ├─ group ── drawable ...
//!        └─ drawable (cube / mesh / terrain)
//! ```
//!
//! The graph owns every node. Groups hold ordered child ids; leaves hold a
//! boxed [`Drawable`]. Each frame the driver calls [`SceneGraph::update`]
//! to propagate combined transforms, then [`SceneGraph::render`] to draw.

pub mod drawables;
pub mod graph;
pub mod node;

#[cfg(test)]
mod tests;

pub use drawables::{CubeNode, Mesh, MeshNode, MeshPart, RenderPass, SubMesh, TerrainNode};
pub use graph::{PreOrder, SceneError, SceneGraph, SceneResult};
pub use node::{Drawable, NodeId, NodeState, SceneNode};
