//! Maps held keys and gamepad sticks onto the free-look camera
//!
//! | Input | Camera |
//! |---|---|
//! | W / S | forward / back |
//! | A / D | left / right |
//! | Up / Down | pitch − / + |
//! | Left / Right | yaw − / + |
//! | Q / E | roll + / − |
//! | left stick | move (when no movement key is held) |
//! | right stick | yaw and pitch |
//! | left / right shoulder | roll + / − (when Q/E are not held) |
//!
//! For each key pair the first key wins when both are held. Amounts are
//! `speed * speed_scale * dt`.

use crate::config::CameraConfig;
use crate::input::{GamepadButtons, InputState, KeyCode};
use crate::render::Camera;

/// Applies one frame of input to a camera
#[derive(Debug, Clone, PartialEq)]
pub struct CameraController {
    settings: CameraConfig,
}

/// Direction from two opposing keys; `first` wins when both are held
fn key_pair(input: &InputState, first: KeyCode, first_sign: f32, second: KeyCode) -> Option<f32> {
    if input.keyboard.is_pressed(first) {
        Some(first_sign)
    } else if input.keyboard.is_pressed(second) {
        Some(-first_sign)
    } else {
        None
    }
}

impl CameraController {
    /// Controller using the given speeds
    pub fn new(settings: CameraConfig) -> Self {
        Self { settings }
    }

    /// Speed settings
    pub fn settings(&self) -> &CameraConfig {
        &self.settings
    }

    /// Place the camera at the configured start position
    pub fn reset(&self, camera: &mut Camera) {
        let [x, y, z] = self.settings.start_position;
        camera.set_position(x, y, z);
    }

    /// Feed this frame's input into the camera; `dt` is in seconds
    pub fn apply(&self, input: &InputState, camera: &mut Camera, dt: f32) {
        let scale = self.settings.speed_scale * dt;
        let movement = self.settings.move_speed * scale;
        let rotation = self.settings.rotate_speed * scale;
        let roll = self.settings.roll_speed * scale;

        let pad = input.gamepad.filtered();
        let left_stick = pad.left_stick();
        let right_stick = pad.right_stick();

        match key_pair(input, KeyCode::W, 1.0, KeyCode::S) {
            Some(direction) => camera.set_forward_back(direction * movement),
            None if left_stick.y != 0.0 => camera.set_forward_back(left_stick.y * movement),
            None => {}
        }
        match key_pair(input, KeyCode::A, -1.0, KeyCode::D) {
            Some(direction) => camera.set_left_right(direction * movement),
            None if left_stick.x != 0.0 => camera.set_left_right(left_stick.x * movement),
            None => {}
        }

        if let Some(direction) = key_pair(input, KeyCode::Up, -1.0, KeyCode::Down) {
            camera.set_pitch(direction * rotation);
        }
        if let Some(direction) = key_pair(input, KeyCode::Left, -1.0, KeyCode::Right) {
            camera.set_yaw(direction * rotation);
        }
        if right_stick.x != 0.0 {
            camera.set_yaw(right_stick.x * rotation);
        }
        if right_stick.y != 0.0 {
            camera.set_pitch(-right_stick.y * rotation);
        }

        match key_pair(input, KeyCode::Q, 1.0, KeyCode::E) {
            Some(direction) => camera.set_roll(direction * roll),
            None if pad.pressed(GamepadButtons::LEFT_SHOULDER) => camera.set_roll(roll),
            None if pad.pressed(GamepadButtons::RIGHT_SHOULDER) => camera.set_roll(-roll),
            None => {}
        }
    }
}
