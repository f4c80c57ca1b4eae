//! Frame driver
//!
//! [`Framework`] owns the scene graph, camera, projection, frame clock and
//! render backend, and runs the fixed per-frame order:
//!
//! 1. application poses the scene (`update_scene`)
//! 2. input is mapped onto the camera, then `Camera::update`
//! 3. `SceneGraph::update` with identity as the root's parent
//! 4. `SceneGraph::render` between `begin_frame` / `end_frame`

use thiserror::Error;

pub use crate::application::{AppError, Application};
use crate::config::{ConfigError, SceneConfig, ViewportConfig};
use crate::foundation::math::Mat4;
use crate::foundation::time::FrameClock;
use crate::input::{CameraController, InputState, KeyCode};
use crate::render::{Camera, FrameContext, RenderBackend};
use crate::scene::{NodeState, SceneError, SceneGraph};

/// Errors surfaced by the frame driver
#[derive(Error, Debug)]
pub enum FrameworkError {
    /// Scene graph failure (initialisation, update or render)
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Error returned by the application
    #[error("Application error: {0}")]
    Application(#[from] AppError),

    /// Operation called in the wrong lifecycle state
    #[error("Framework is {0:?}")]
    InvalidState(NodeState),
}

/// Owns everything a frame needs
pub struct Framework<B: RenderBackend> {
    backend: B,
    scene: SceneGraph,
    camera: Camera,
    controller: CameraController,
    viewport: ViewportConfig,
    projection: Mat4,
    clock: FrameClock,
    state: NodeState,
    running: bool,
}

impl<B: RenderBackend> std::fmt::Debug for Framework<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Framework")
            .field("scene", &self.scene)
            .field("camera", &self.camera)
            .field("viewport", &self.viewport)
            .field("state", &self.state)
            .field("running", &self.running)
            .finish_non_exhaustive()
    }
}

impl<B: RenderBackend> Framework<B> {
    /// Create a driver with an empty scene
    pub fn new(config: &SceneConfig, backend: B) -> Self {
        let controller = CameraController::new(config.camera.clone());
        let mut camera = Camera::new();
        controller.reset(&mut camera);

        Self {
            backend,
            scene: SceneGraph::new("Root"),
            camera,
            controller,
            viewport: config.viewport.clone(),
            projection: config.viewport.projection(),
            clock: FrameClock::new(),
            state: NodeState::Uninitialised,
            running: true,
        }
    }

    /// Let the application build its scene, then create backend resources
    pub fn initialise(&mut self, app: &mut dyn Application) -> Result<(), FrameworkError> {
        if self.state != NodeState::Uninitialised {
            return Err(FrameworkError::InvalidState(self.state));
        }

        log::info!("Initialising framework...");
        app.create_scene(&mut self.scene, &mut self.camera)?;
        self.initialise_scene()?;
        self.state = NodeState::Initialised;

        log::info!(
            "Framework ready: {} nodes, viewport {}x{}",
            self.scene.len(),
            self.viewport.width,
            self.viewport.height
        );
        Ok(())
    }

    /// Run one frame with an explicit time step
    pub fn frame(&mut self, app: &mut dyn Application, input: &InputState, delta_time: f32) -> Result<(), FrameworkError> {
        if self.state != NodeState::Initialised {
            return Err(FrameworkError::InvalidState(self.state));
        }
        let delta_time = self.clock.tick_fixed(delta_time);
        self.step(app, input, delta_time)
    }

    /// Run one frame timed by the wall clock
    pub fn frame_realtime(&mut self, app: &mut dyn Application, input: &InputState) -> Result<(), FrameworkError> {
        if self.state != NodeState::Initialised {
            return Err(FrameworkError::InvalidState(self.state));
        }
        let delta_time = self.clock.tick();
        self.step(app, input, delta_time)
    }

    fn step(&mut self, app: &mut dyn Application, input: &InputState, delta_time: f32) -> Result<(), FrameworkError> {
        if input.keyboard.is_pressed(KeyCode::Escape) {
            self.quit();
        }

        app.update_scene(&mut self.scene, delta_time)?;

        // Pick up nodes added by the application this frame
        self.initialise_scene()?;

        self.controller.apply(input, &mut self.camera, delta_time);
        self.camera.update();
        self.scene.update(&Mat4::identity())?;

        self.backend.begin_frame();
        let result = {
            let mut frame = FrameContext::new(&self.camera, self.projection, &mut self.backend);
            self.scene.render(&mut frame)
        };
        self.backend.end_frame();
        result?;

        log::trace!("Frame {} done ({:.4}s)", self.clock.frame_count(), delta_time);
        Ok(())
    }

    /// A failed scene initialisation leaves the framework [`NodeState::Failed`];
    /// no further frames run, only shutdown
    fn initialise_scene(&mut self) -> Result<(), FrameworkError> {
        if let Err(e) = self.scene.initialise(&mut self.backend) {
            self.state = NodeState::Failed;
            self.running = false;
            return Err(e.into());
        }
        Ok(())
    }

    /// Initialise, run frames until the input runs out or quit is requested,
    /// then shut down
    ///
    /// Shutdown happens even when a frame fails; the first error is returned.
    pub fn run<I>(&mut self, app: &mut dyn Application, frames: I) -> Result<(), FrameworkError>
    where
        I: IntoIterator<Item = (InputState, f32)>,
    {
        let result = self.initialise(app).and_then(|()| {
            log::info!("Starting main loop...");
            for (input, delta_time) in frames {
                if !self.running {
                    break;
                }
                self.frame(app, &input, delta_time)?;
            }
            Ok(())
        });

        self.shutdown(app);
        result
    }

    /// Rebuild the projection for a new viewport size
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport.width = width;
        self.viewport.height = height;
        self.projection = self.viewport.projection();
        log::debug!("Viewport resized to {}x{}", width, height);
    }

    /// Release every backend resource; later calls do nothing
    pub fn shutdown(&mut self, app: &mut dyn Application) {
        if self.state == NodeState::Shutdown {
            return;
        }
        self.scene.shutdown(&mut self.backend);
        app.cleanup();
        self.state = NodeState::Shutdown;
        self.running = false;

        log::info!(
            "Framework shutdown complete after {} frames ({:.1} fps average)",
            self.clock.frame_count(),
            self.clock.average_fps()
        );
    }

    /// Stop [`Framework::run`] after the current frame
    pub fn quit(&mut self) {
        log::info!("Framework shutdown requested");
        self.running = false;
    }

    /// Whether the main loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Lifecycle state
    pub fn state(&self) -> NodeState {
        self.state
    }

    /// The scene graph
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Mutable access to the scene graph
    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    /// The camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable access to the camera
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Current projection matrix
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Frame timing
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// The render backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the render backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4Ext, Vec3};
    use crate::render::RecordingBackend;
    use crate::scene::{CubeNode, NodeId, SceneNode};
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct Spinner {
        cube: Option<NodeId>,
        angle: f32,
        cleaned_up: bool,
    }

    impl Application for Spinner {
        fn create_scene(&mut self, scene: &mut SceneGraph, _camera: &mut Camera) -> Result<(), AppError> {
            self.cube = Some(scene.add_to_root(SceneNode::drawable("cube", CubeNode::new())));
            Ok(())
        }

        fn update_scene(&mut self, scene: &mut SceneGraph, delta_time: f32) -> Result<(), AppError> {
            self.angle += delta_time;
            let cube = self.cube.ok_or_else(|| AppError::MissingNode("cube".to_string()))?;
            scene.set_local_transform(cube, Mat4::rotation_y(self.angle))?;
            Ok(())
        }

        fn cleanup(&mut self) {
            self.cleaned_up = true;
        }
    }

    /// Adds a cube on its first frame
    #[derive(Default)]
    struct Spawner {
        spawned: bool,
    }

    impl Application for Spawner {
        fn create_scene(&mut self, _scene: &mut SceneGraph, _camera: &mut Camera) -> Result<(), AppError> {
            Ok(())
        }

        fn update_scene(&mut self, scene: &mut SceneGraph, _delta_time: f32) -> Result<(), AppError> {
            if !self.spawned {
                scene.add_to_root(SceneNode::drawable("late", CubeNode::new()));
                self.spawned = true;
            }
            Ok(())
        }
    }

    struct LostCube;

    impl Application for LostCube {
        fn create_scene(&mut self, _scene: &mut SceneGraph, _camera: &mut Camera) -> Result<(), AppError> {
            Ok(())
        }

        fn update_scene(&mut self, _scene: &mut SceneGraph, _delta_time: f32) -> Result<(), AppError> {
            Err(AppError::Custom("cube went missing".to_string()))
        }
    }

    fn framework() -> Framework<RecordingBackend> {
        Framework::new(&SceneConfig::default(), RecordingBackend::new())
    }

    #[test]
    fn test_camera_starts_at_configured_position() {
        let framework = framework();
        assert_eq!(framework.camera().position(), Vec3::new(0.0, 50.0, -500.0));
    }

    #[test]
    fn test_frame_before_initialise_is_rejected() {
        let mut framework = framework();
        let mut app = Spinner::default();
        let result = framework.frame(&mut app, &InputState::default(), 0.016);
        assert!(matches!(result, Err(FrameworkError::InvalidState(NodeState::Uninitialised))));
    }

    #[test]
    fn test_run_draws_each_frame_and_shuts_down() {
        let mut framework = framework();
        let mut app = Spinner::default();
        let frames = (0..3).map(|_| (InputState::default(), 0.5));

        framework.run(&mut app, frames).unwrap();

        assert_eq!(framework.backend().frames_completed(), 3);
        assert_eq!(framework.backend().draws().len(), 3);
        assert_eq!(framework.backend().live_meshes(), 0);
        assert_eq!(framework.state(), NodeState::Shutdown);
        assert!(app.cleaned_up);
        assert_relative_eq!(app.angle, 1.5, epsilon = 1e-6);
    }

    #[test]
    fn test_escape_stops_the_loop() {
        let mut framework = framework();
        let mut app = Spinner::default();
        let frames = vec![
            (InputState::with_keys([KeyCode::Escape]), 0.1),
            (InputState::default(), 0.1),
            (InputState::default(), 0.1),
        ];

        framework.run(&mut app, frames).unwrap();
        assert_eq!(framework.backend().frames_completed(), 1);
    }

    #[test]
    fn test_input_moves_camera_during_frame() {
        let mut framework = framework();
        let mut app = Spinner::default();
        framework.initialise(&mut app).unwrap();

        framework.frame(&mut app, &InputState::with_keys([KeyCode::W]), 0.1).unwrap();
        assert_relative_eq!(framework.camera().position(), Vec3::new(0.0, 50.0, -450.0), epsilon = 1e-3);
    }

    #[test]
    fn test_resize_rebuilds_projection() {
        let mut framework = framework();
        let before = framework.projection();
        framework.resize(1600, 600);
        let after = framework.projection();

        assert_relative_eq!(after[(1, 1)], before[(1, 1)], epsilon = 1e-6);
        assert_relative_eq!(after[(0, 0)], before[(0, 0)] / 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_failed_initialise_still_releases_resources() {
        let mut backend = RecordingBackend::new();
        backend.refuse("cube:mesh");
        let mut framework = Framework::new(&SceneConfig::default(), backend);
        let mut app = Spinner::default();

        let result = framework.run(&mut app, std::iter::empty());
        assert!(matches!(result, Err(FrameworkError::Scene(SceneError::Initialisation { .. }))));
        assert_eq!(framework.backend().live_pipelines(), 0);
    }

    #[test]
    fn test_failed_late_node_stops_further_frames() {
        let mut backend = RecordingBackend::new();
        backend.refuse("late:mesh");
        let mut framework = Framework::new(&SceneConfig::default(), backend);
        let mut app = Spawner::default();
        framework.initialise(&mut app).unwrap();

        let first = framework.frame(&mut app, &InputState::default(), 0.1);
        assert!(matches!(first, Err(FrameworkError::Scene(SceneError::Initialisation { .. }))));
        assert_eq!(framework.state(), NodeState::Failed);
        assert!(!framework.is_running());
        assert_eq!(framework.backend().live_pipelines(), 0);

        let second = framework.frame(&mut app, &InputState::default(), 0.1);
        assert!(matches!(second, Err(FrameworkError::InvalidState(NodeState::Failed))));

        framework.shutdown(&mut app);
        assert_eq!(framework.state(), NodeState::Shutdown);
        assert_eq!(framework.backend().live_pipelines(), 0);
        assert_eq!(framework.backend().live_meshes(), 0);
    }

    #[test]
    fn test_application_error_ends_run_and_shuts_down() {
        let mut framework = framework();
        let frames = (0..3).map(|_| (InputState::default(), 0.1));

        let result = framework.run(&mut LostCube, frames);
        assert!(matches!(result, Err(FrameworkError::Application(AppError::Custom(_)))));
        assert_eq!(framework.backend().frames_completed(), 0);
        assert_eq!(framework.state(), NodeState::Shutdown);
    }

    #[test]
    fn test_realtime_frame_draws_and_counts() {
        let mut framework = framework();
        let mut app = Spinner::default();
        framework.initialise(&mut app).unwrap();

        framework.frame_realtime(&mut app, &InputState::default()).unwrap();
        framework.frame_realtime(&mut app, &InputState::default()).unwrap();

        assert_eq!(framework.clock().frame_count(), 2);
        assert_eq!(framework.backend().draws().len(), 2);
        assert!(app.angle >= 0.0);
    }
}
