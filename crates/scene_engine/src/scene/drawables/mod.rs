//! Leaf drawables: cube, multi-material mesh, height-map terrain

pub mod cube;
pub mod mesh;
pub mod terrain;

pub use cube::{cube_vertices, CubeNode, CUBE_INDICES};
pub use mesh::{Mesh, MeshNode, MeshPart, RenderPass, SubMesh};
pub use terrain::{generate_terrain, TerrainGeometry, TerrainNode};
