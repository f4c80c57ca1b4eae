//! Lighting parameters shared by lit drawables

use crate::foundation::math::Vec3;
use crate::render::ObjectConstants;

/// Ambient plus one directional light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    /// Ambient colour (RGBA)
    pub ambient: [f32; 4],
    /// Direction the light travels in
    pub direction: Vec3,
    /// Directional light colour (RGBA)
    pub color: [f32; 4],
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: [0.5, 0.5, 0.5, 1.0],
            direction: Vec3::new(-1.0, -1.0, 0.0),
            color: [0.75, 0.75, 0.75, 1.0],
        }
    }
}

impl Lighting {
    /// Light vector as packed into the constant block, normalized with w = 0
    pub fn light_vector(&self) -> [f32; 4] {
        let direction = self.direction.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros);
        [direction.x, direction.y, direction.z, 0.0]
    }

    /// Write the light terms into a constant block
    pub fn apply_to(&self, constants: &mut ObjectConstants) {
        constants.light_vector = self.light_vector();
        constants.light_color = self.color;
        constants.ambient_color = self.ambient;
    }
}
