//! Input state and camera control
//!
//! Platform layers fill an [`InputState`] each frame (keys held, gamepad
//! snapshot); [`CameraController`] turns it into camera adjustments.

pub mod camera_controller;
pub mod gamepad;

use std::collections::HashSet;

pub use camera_controller::CameraController;
pub use gamepad::{GamepadButtons, GamepadState};

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// W key
    W,
    /// A key
    A,
    /// S key
    S,
    /// D key
    D,
    /// Q key
    Q,
    /// E key
    E,
    /// Space key
    Space,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

/// Keys currently held down
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardState {
    pressed: HashSet<KeyCode>,
}

impl KeyboardState {
    /// Keyboard with nothing pressed
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press or release
    pub fn set(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.pressed.insert(key);
        } else {
            self.pressed.remove(&key);
        }
    }

    /// Mark a key as held
    pub fn press(&mut self, key: KeyCode) {
        self.set(key, true);
    }

    /// Mark a key as released
    pub fn release(&mut self, key: KeyCode) {
        self.set(key, false);
    }

    /// Whether a key is held
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Release every key
    pub fn clear(&mut self) {
        self.pressed.clear();
    }
}

impl FromIterator<KeyCode> for KeyboardState {
    fn from_iter<I: IntoIterator<Item = KeyCode>>(iter: I) -> Self {
        Self {
            pressed: iter.into_iter().collect(),
        }
    }
}

/// Snapshot of every input device for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    /// Keyboard state
    pub keyboard: KeyboardState,
    /// First gamepad
    pub gamepad: GamepadState,
}

impl InputState {
    /// Input with only keyboard keys held
    pub fn with_keys(keys: impl IntoIterator<Item = KeyCode>) -> Self {
        Self {
            keyboard: keys.into_iter().collect(),
            gamepad: GamepadState::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut keyboard = KeyboardState::new();
        keyboard.press(KeyCode::W);
        keyboard.press(KeyCode::Q);
        keyboard.release(KeyCode::W);

        assert!(!keyboard.is_pressed(KeyCode::W));
        assert!(keyboard.is_pressed(KeyCode::Q));

        keyboard.clear();
        assert!(!keyboard.is_pressed(KeyCode::Q));
    }

    #[test]
    fn test_with_keys_leaves_gamepad_disconnected() {
        let input = InputState::with_keys([KeyCode::Up, KeyCode::A]);
        assert!(input.keyboard.is_pressed(KeyCode::Up));
        assert!(!input.gamepad.connected);
    }
}
