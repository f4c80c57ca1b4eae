//! The demo scene: a spinning cube, a spinning plane mesh and terrain

use scene_engine::config::TerrainConfig;
use scene_engine::foundation::math::{utils, Mat4, Mat4Ext};
use scene_engine::prelude::*;
use scene_engine::render::Vertex;

/// Scene with the cube "SomeCube", the mesh "Plane1" and the terrain, drawn in that order
pub struct DemoScene {
    terrain: TerrainConfig,
    cube: Option<NodeId>,
    plane: Option<NodeId>,
    angle: f32,
}

impl DemoScene {
    pub fn new(terrain: TerrainConfig) -> Self {
        Self {
            terrain,
            cube: None,
            plane: None,
            angle: 0.0,
        }
    }

    /// Accumulated animation angle in radians
    pub fn angle(&self) -> f32 {
        self.angle
    }
}

impl Application for DemoScene {
    fn create_scene(&mut self, scene: &mut SceneGraph, _camera: &mut Camera) -> Result<(), AppError> {
        self.cube = Some(scene.add_to_root(SceneNode::drawable("SomeCube", CubeNode::new())));
        self.plane = Some(scene.add_to_root(SceneNode::drawable("Plane1", MeshNode::new(plane_mesh()))));
        scene.add_to_root(SceneNode::drawable("Terrain", TerrainNode::from_config(&self.terrain)));
        Ok(())
    }

    fn update_scene(&mut self, scene: &mut SceneGraph, delta_time: f32) -> Result<(), AppError> {
        self.angle += delta_time;

        let plane = self.plane.ok_or_else(|| AppError::MissingNode("Plane1".to_string()))?;
        let cube = self.cube.ok_or_else(|| AppError::MissingNode("SomeCube".to_string()))?;

        // Scale, tip onto its side, then spin about Y
        let plane_transform =
            Mat4::rotation_y(self.angle) * Mat4::rotation_x(utils::deg_to_rad(90.0)) * Mat4::new_scaling(1.0);
        // Scale, counter-spin about Y, then spin about Z
        let cube_transform = Mat4::rotation_z(self.angle) * Mat4::rotation_y(-self.angle) * Mat4::new_scaling(2.0);

        scene.set_local_transform(plane, plane_transform)?;
        scene.set_local_transform(cube, cube_transform)?;
        Ok(())
    }

    fn cleanup(&mut self) {
        log::info!("Demo scene finished after {:.2} radians of rotation", self.angle);
    }
}

/// Axis-aligned box with per-face normals (24 vertices, 36 indices)
fn box_geometry(min: [f32; 3], max: [f32; 3]) -> (Vec<Vertex>, Vec<u32>) {
    let [x0, y0, z0] = min;
    let [x1, y1, z1] = max;
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        ([0.0, 0.0, -1.0], [[x0, y0, z0], [x0, y1, z0], [x1, y1, z0], [x1, y0, z0]]),
        ([0.0, 0.0, 1.0], [[x1, y0, z1], [x1, y1, z1], [x0, y1, z1], [x0, y0, z1]]),
        ([-1.0, 0.0, 0.0], [[x0, y0, z1], [x0, y1, z1], [x0, y1, z0], [x0, y0, z0]]),
        ([1.0, 0.0, 0.0], [[x1, y0, z0], [x1, y1, z0], [x1, y1, z1], [x1, y0, z1]]),
        ([0.0, 1.0, 0.0], [[x0, y1, z0], [x0, y1, z1], [x1, y1, z1], [x1, y1, z0]]),
        ([0.0, -1.0, 0.0], [[x0, y0, z1], [x0, y0, z0], [x1, y0, z0], [x1, y0, z1]]),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, corners) in faces {
        let base = vertices.len() as u32;
        let tex_coords = [[0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0]];
        for (corner, tex_coord) in corners.into_iter().zip(tex_coords) {
            vertices.push(Vertex::lit(corner, normal, tex_coord));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    (vertices, indices)
}

fn box_submesh(min: [f32; 3], max: [f32; 3], material: Material) -> SubMesh {
    let (vertices, indices) = box_geometry(min, max);
    SubMesh::new(vertices, indices, material)
}

/// A small aircraft: opaque fuselage and wings, translucent canopy
pub fn plane_mesh() -> Mesh {
    let submeshes = vec![
        box_submesh(
            [-4.0, -4.0, -30.0],
            [4.0, 4.0, 30.0],
            Material::new("fuselage").with_diffuse(0.7, 0.7, 0.75).with_specular(1.0, 1.0, 1.0, 16.0),
        ),
        box_submesh(
            [-35.0, -1.0, -6.0],
            [35.0, 1.0, 6.0],
            Material::new("wings").with_diffuse(0.6, 0.1, 0.1),
        ),
        box_submesh(
            [-3.0, 4.0, 8.0],
            [3.0, 8.0, 18.0],
            Material::new("canopy").with_diffuse(0.4, 0.6, 0.9).with_opacity(0.4),
        ),
        box_submesh(
            [-12.0, -1.0, -30.0],
            [12.0, 1.0, -24.0],
            Material::new("tailplane").with_diffuse(0.6, 0.1, 0.1),
        ),
    ];

    let root = MeshPart::new("fuselage", vec![0])
        .with_child(MeshPart::new("wings", vec![1]))
        .with_child(MeshPart::new("cockpit", vec![2]))
        .with_child(MeshPart::new("tail", vec![3]));

    Mesh::with_parts(submeshes, root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_engine::scene::RenderPass;

    #[test]
    fn test_box_geometry_indices_in_range() {
        let (vertices, indices) = box_geometry([-1.0; 3], [1.0; 3]);
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }

    #[test]
    fn test_scene_is_built_cube_plane_terrain() {
        let terrain = TerrainConfig {
            height_map: "missing.raw".to_string(),
            grid_size: 2,
            ..TerrainConfig::default()
        };
        let mut app = DemoScene::new(terrain);
        let mut scene = SceneGraph::default();
        app.create_scene(&mut scene, &mut Camera::new()).unwrap();

        let names: Vec<&str> = scene.iter().skip(1).map(|(_, node)| node.name()).collect();
        assert_eq!(names, vec!["SomeCube", "Plane1", "Terrain"]);
    }

    #[test]
    fn test_canopy_is_drawn_last() {
        let mesh = plane_mesh();
        assert_eq!(mesh.pass_order(RenderPass::Opaque), vec![0, 1, 3]);
        assert_eq!(mesh.pass_order(RenderPass::Transparent), vec![2]);
    }
}
