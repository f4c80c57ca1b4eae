//! # Free-look Camera
//!
//! First-person camera driven by accumulated yaw, pitch and roll plus
//! per-frame movement deltas.
//!
//! ## Rotation Composition
//! Each [`Camera::update`] rebuilds the camera basis from the default axes:
//!
//! 1. **Yaw** about world up turns the default right and forward vectors.
//! 2. **Pitch** about the *yawed* right axis turns up and forward.
//! 3. **Roll** about the *pitched* forward axis turns up and right.
//!
//! Every step rotates about an axis produced by the previous step, so roll
//! always spins around the current view direction instead of a fixed world
//! axis. Angles are stored unbounded; rotation construction is periodic.
//!
//! ## Movement
//! Movement deltas are transient. They are applied along the freshly built
//! right/forward vectors during `update` and then reset to zero, so a second
//! `update` without new input leaves the position untouched.

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

const DEFAULT_RIGHT: Vec3 = Vec3::new(1.0, 0.0, 0.0);
const DEFAULT_UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);
const DEFAULT_FORWARD: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// Orthonormal camera axes produced by the last [`Camera::update`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    /// Camera-relative right direction
    pub right: Vec3,
    /// Camera-relative up direction
    pub up: Vec3,
    /// Viewing direction
    pub forward: Vec3,
}

impl Default for CameraBasis {
    fn default() -> Self {
        Self {
            right: DEFAULT_RIGHT,
            up: DEFAULT_UP,
            forward: DEFAULT_FORWARD,
        }
    }
}

/// Free-look camera with yaw → pitch → roll composition
///
/// Angles are set in degrees and stored in radians. The view matrix is only
/// meaningful after [`Camera::update`] has run; before that it is identity.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    view_matrix: Mat4,
    basis: CameraBasis,

    move_left_right: f32,
    move_forward_back: f32,

    yaw: f32,
    pitch: f32,
    roll: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// Create a camera at the origin looking down +Z with no pending movement
    pub fn new() -> Self {
        Self {
            position: Vec3::zeros(),
            view_matrix: Mat4::identity(),
            basis: CameraBasis::default(),
            move_left_right: 0.0,
            move_forward_back: 0.0,
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
        }
    }

    /// Add `degrees` to the accumulated pitch
    pub fn set_pitch(&mut self, degrees: f32) {
        self.pitch += utils::deg_to_rad(degrees);
    }

    /// Overwrite the accumulated pitch
    pub fn set_total_pitch(&mut self, degrees: f32) {
        self.pitch = utils::deg_to_rad(degrees);
    }

    /// Accumulated pitch in degrees
    pub fn pitch(&self) -> f32 {
        utils::rad_to_deg(self.pitch)
    }

    /// Add `degrees` to the accumulated yaw
    pub fn set_yaw(&mut self, degrees: f32) {
        self.yaw += utils::deg_to_rad(degrees);
    }

    /// Overwrite the accumulated yaw
    pub fn set_total_yaw(&mut self, degrees: f32) {
        self.yaw = utils::deg_to_rad(degrees);
    }

    /// Accumulated yaw in degrees
    pub fn yaw(&self) -> f32 {
        utils::rad_to_deg(self.yaw)
    }

    /// Add `degrees` to the accumulated roll
    pub fn set_roll(&mut self, degrees: f32) {
        self.roll += utils::deg_to_rad(degrees);
    }

    /// Overwrite the accumulated roll
    pub fn set_total_roll(&mut self, degrees: f32) {
        self.roll = utils::deg_to_rad(degrees);
    }

    /// Accumulated roll in degrees
    pub fn roll(&self) -> f32 {
        utils::rad_to_deg(self.roll)
    }

    /// Set the sideways movement for the next update (positive is right)
    ///
    /// Overwrites any amount set earlier in the same frame.
    pub fn set_left_right(&mut self, amount: f32) {
        self.move_left_right = amount;
    }

    /// Set the forward movement for the next update (positive is forward)
    ///
    /// Overwrites any amount set earlier in the same frame.
    pub fn set_forward_back(&mut self, amount: f32) {
        self.move_forward_back = amount;
    }

    /// Pending movement as `(left_right, forward_back)`
    pub fn pending_movement(&self) -> (f32, f32) {
        (self.move_left_right, self.move_forward_back)
    }

    /// Place the camera at an absolute position
    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Vec3::new(x, y, z);
        log::trace!("Camera position set to: {:?}", self.position);
    }

    /// Camera position in world space
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// View matrix from the most recent update
    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    /// Camera axes from the most recent update
    pub fn basis(&self) -> CameraBasis {
        self.basis
    }

    /// Rebuild the basis, apply pending movement and derive the view matrix
    pub fn update(&mut self) {
        // Yaw: about world up, affects right and forward
        let yaw_rotation = Mat4::rotation_axis(&DEFAULT_UP, self.yaw);
        let mut right = yaw_rotation.transform_vector(&DEFAULT_RIGHT);
        let mut forward = yaw_rotation.transform_vector(&DEFAULT_FORWARD);

        // Pitch: about the yawed right axis, affects up and forward
        let pitch_rotation = Mat4::rotation_axis(&right, self.pitch);
        let mut up = pitch_rotation.transform_vector(&DEFAULT_UP);
        forward = pitch_rotation.transform_vector(&forward);

        // Roll: about the pitched forward axis, affects up and right
        let roll_rotation = Mat4::rotation_axis(&forward, self.roll);
        up = roll_rotation.transform_vector(&up);
        right = roll_rotation.transform_vector(&right);

        self.position += self.move_left_right * right + self.move_forward_back * forward;
        self.move_left_right = 0.0;
        self.move_forward_back = 0.0;

        let target = self.position + forward.normalize();
        self.view_matrix = Mat4::look_at_left_handed(&self.position, &target, &up);
        self.basis = CameraBasis { right, up, forward };
    }
}
