//! # Scene Engine
//!
//! A hierarchical scene graph with transform propagation, a free-look
//! camera, and cube, mesh and height-map terrain drawables. Drawing goes
//! through the [`render::RenderBackend`] capability; a headless
//! [`render::RecordingBackend`] is included.
//!
//! ## Features
//!
//! - **Scene graph**: arena of named nodes, groups with ordered children,
//!   pre-order update/render, safe removal
//! - **Camera**: yaw → pitch → roll composition, left-handed view matrix
//! - **Drawables**: vertex-coloured cube, two-pass multi-material mesh,
//!   wireframe terrain generated from a raw height map
//! - **Input**: keyboard and gamepad state mapped onto camera motion
//! - **Config**: TOML/RON scene settings
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn create_scene(&mut self, scene: &mut SceneGraph, _camera: &mut Camera) -> Result<(), AppError> {
//!         scene.add_to_root(SceneNode::drawable("cube", CubeNode::new()));
//!         Ok(())
//!     }
//!
//!     fn update_scene(&mut self, _scene: &mut SceneGraph, _delta_time: f32) -> Result<(), AppError> {
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SceneConfig::default();
//!     let mut framework = Framework::new(&config, RecordingBackend::new());
//!     let frames = (0..60).map(|_| (InputState::default(), 1.0 / 60.0));
//!     framework.run(&mut MyApp, frames)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::must_use_candidate
)]

pub mod assets;
pub mod config;
pub mod foundation;
pub mod framework;
pub mod input;
pub mod render;
pub mod scene;

mod application;

pub use application::{AppError, Application};
pub use framework::{Framework, FrameworkError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, SceneConfig},
        foundation::math::{Mat4, Mat4Ext, Vec3},
        input::{CameraController, InputState, KeyCode},
        render::{Camera, Lighting, Material, RecordingBackend, RenderBackend, Vertex},
        scene::{
            CubeNode, Drawable, Mesh, MeshNode, MeshPart, NodeId, SceneError, SceneGraph, SceneNode, SubMesh,
            TerrainNode,
        },
        AppError, Application, Framework, FrameworkError,
    };
}
