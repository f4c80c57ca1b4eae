//! XInput-style gamepad state
//!
//! Raw stick values are signed 16-bit, triggers unsigned 8-bit. Sticks use a
//! circular dead zone tested on the squared magnitude; triggers at or below
//! the threshold read as released.

use bitflags::bitflags;

use crate::foundation::math::Vec2;

/// Left stick dead zone radius
pub const LEFT_THUMB_DEADZONE: i16 = 7849;
/// Right stick dead zone radius
pub const RIGHT_THUMB_DEADZONE: i16 = 8689;
/// Trigger values at or below this are ignored
pub const TRIGGER_THRESHOLD: u8 = 30;

bitflags! {
    /// Digital buttons
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GamepadButtons: u16 {
        /// Directional pad up
        const DPAD_UP = 0x0001;
        /// Directional pad down
        const DPAD_DOWN = 0x0002;
        /// Directional pad left
        const DPAD_LEFT = 0x0004;
        /// Directional pad right
        const DPAD_RIGHT = 0x0008;
        /// Start
        const START = 0x0010;
        /// Back
        const BACK = 0x0020;
        /// Left stick click
        const LEFT_THUMB = 0x0040;
        /// Right stick click
        const RIGHT_THUMB = 0x0080;
        /// Left shoulder
        const LEFT_SHOULDER = 0x0100;
        /// Right shoulder
        const RIGHT_SHOULDER = 0x0200;
        /// A
        const A = 0x1000;
        /// B
        const B = 0x2000;
        /// X
        const X = 0x4000;
        /// Y
        const Y = 0x8000;
    }
}

impl Default for GamepadButtons {
    fn default() -> Self {
        Self::empty()
    }
}

/// One controller reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GamepadState {
    /// False when no controller answered; all other fields are then zero
    pub connected: bool,
    /// Buttons held
    pub buttons: GamepadButtons,
    /// Left stick `(x, y)`
    pub left_thumb: (i16, i16),
    /// Right stick `(x, y)`
    pub right_thumb: (i16, i16),
    /// Left trigger
    pub left_trigger: u8,
    /// Right trigger
    pub right_trigger: u8,
}

fn apply_dead_zone((x, y): (i16, i16), radius: i16) -> (i16, i16) {
    let magnitude_squared = i64::from(x) * i64::from(x) + i64::from(y) * i64::from(y);
    if magnitude_squared <= i64::from(radius) * i64::from(radius) {
        (0, 0)
    } else {
        (x, y)
    }
}

fn apply_threshold(trigger: u8) -> u8 {
    if trigger <= TRIGGER_THRESHOLD {
        0
    } else {
        trigger
    }
}

fn normalize_axis(value: i16) -> f32 {
    (f32::from(value) / f32::from(i16::MAX)).clamp(-1.0, 1.0)
}

impl GamepadState {
    /// Copy with stick dead zones and trigger thresholds applied
    pub fn filtered(&self) -> Self {
        if !self.connected {
            return Self::default();
        }
        Self {
            connected: true,
            buttons: self.buttons,
            left_thumb: apply_dead_zone(self.left_thumb, LEFT_THUMB_DEADZONE),
            right_thumb: apply_dead_zone(self.right_thumb, RIGHT_THUMB_DEADZONE),
            left_trigger: apply_threshold(self.left_trigger),
            right_trigger: apply_threshold(self.right_trigger),
        }
    }

    /// Whether every button in `buttons` is held
    pub fn pressed(&self, buttons: GamepadButtons) -> bool {
        self.connected && self.buttons.contains(buttons)
    }

    /// Left stick scaled to `[-1, 1]`, dead zone applied
    pub fn left_stick(&self) -> Vec2 {
        let (x, y) = self.filtered().left_thumb;
        Vec2::new(normalize_axis(x), normalize_axis(y))
    }

    /// Right stick scaled to `[-1, 1]`, dead zone applied
    pub fn right_stick(&self) -> Vec2 {
        let (x, y) = self.filtered().right_thumb;
        Vec2::new(normalize_axis(x), normalize_axis(y))
    }
}
