//! Terrain demo application
//!
//! Builds the demo scene (terrain, spinning plane mesh, spinning cube) and
//! flies the camera through it with scripted input for a fixed number of
//! frames. Draws go to the recording backend, so the run is headless; the
//! per-frame draw statistics are logged.
//!
//! Settings come from `scene.toml` in the working directory when present.

mod demo_scene;

use scene_engine::config::{Config, ConfigError, SceneConfig};
use scene_engine::foundation::logging;
use scene_engine::input::{GamepadState, InputState, KeyCode};
use scene_engine::render::RecordingBackend;
use scene_engine::{Framework, FrameworkError};
use thiserror::Error;

use demo_scene::DemoScene;

const CONFIG_PATH: &str = "scene.toml";
const FRAME_RATE: f32 = 60.0;
const SECONDS_PER_MANOEUVRE: usize = 2;

#[derive(Error, Debug)]
enum DemoError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Framework error: {0}")]
    Framework(#[from] FrameworkError),
}

/// Input for one manoeuvre of the scripted flight
fn manoeuvre(index: usize) -> InputState {
    match index {
        0 => InputState::with_keys([KeyCode::W]),
        1 => InputState::with_keys([KeyCode::Right, KeyCode::W]),
        2 => InputState::with_keys([KeyCode::Up, KeyCode::Q]),
        3 => InputState::with_keys([KeyCode::Down, KeyCode::E, KeyCode::A]),
        4 => InputState {
            gamepad: GamepadState {
                connected: true,
                left_thumb: (0, 20_000),
                right_thumb: (-15_000, 0),
                ..GamepadState::default()
            },
            ..InputState::default()
        },
        _ => InputState::with_keys([KeyCode::Escape]),
    }
}

fn scripted_flight() -> impl Iterator<Item = (InputState, f32)> {
    let frames_per_manoeuvre = SECONDS_PER_MANOEUVRE * FRAME_RATE as usize;
    (0..6).flat_map(move |index| {
        let input = manoeuvre(index);
        std::iter::repeat((input, 1.0 / FRAME_RATE)).take(frames_per_manoeuvre)
    })
}

fn run() -> Result<(), DemoError> {
    let config = SceneConfig::load_or_default(CONFIG_PATH)?;
    log::info!(
        "Terrain {}x{} cells from '{}'",
        config.terrain.grid_size,
        config.terrain.grid_size,
        config.terrain.height_map
    );

    let mut framework = Framework::new(&config, RecordingBackend::new());
    let mut app = DemoScene::new(config.terrain.clone());

    framework.run(&mut app, scripted_flight())?;

    let backend = framework.backend();
    let stats = backend.last_frame_stats();
    log::info!(
        "Rendered {} frames; last frame: {} draw calls, {} indices",
        backend.frames_completed(),
        stats.draw_calls,
        stats.indices
    );
    let camera = framework.camera();
    log::info!(
        "Camera finished at {:?} (yaw {:.1}°, pitch {:.1}°, roll {:.1}°), scene angle {:.2}",
        camera.position(),
        camera.yaw(),
        camera.pitch(),
        camera.roll(),
        app.angle()
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    log::info!("Starting terrain demo");

    match run() {
        Ok(()) => {
            log::info!("Terrain demo completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Terrain demo failed: {}", e);
            Err(e.into())
        }
    }
}
