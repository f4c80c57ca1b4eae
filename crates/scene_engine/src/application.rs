//! Application trait and lifecycle management

use thiserror::Error;

use crate::render::Camera;
use crate::scene::{SceneError, SceneGraph};

/// Application lifecycle trait
///
/// Implement this trait to describe a scene and animate it. The
/// [`Framework`](crate::framework::Framework) owns the graph and camera and
/// lends them to the application at the right points of the frame.
pub trait Application {
    /// Build the initial scene
    ///
    /// Called once before the graph is initialised. The camera has already
    /// been placed at the configured start position.
    fn create_scene(&mut self, scene: &mut SceneGraph, camera: &mut Camera) -> Result<(), AppError>;

    /// Pose nodes for the coming frame
    ///
    /// # Arguments
    /// * `scene` - The scene graph, safe to restructure here
    /// * `delta_time` - Time since last frame in seconds
    fn update_scene(&mut self, scene: &mut SceneGraph, delta_time: f32) -> Result<(), AppError>;

    /// Called after the scene has been shut down
    fn cleanup(&mut self) {}
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Scene graph error raised while building or posing the scene
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// A node the application relies on is missing
    #[error("Missing scene node '{0}'")]
    MissingNode(String),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}
