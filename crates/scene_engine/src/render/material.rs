//! Material system for rendering

/// Surface properties of one submesh
///
/// Opacity decides which render pass a submesh belongs to: exactly `1.0` is
/// opaque, anything lower is drawn in the transparent pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Material name
    pub name: String,

    /// Diffuse colour (RGBA)
    pub diffuse: [f32; 4],

    /// Specular colour (RGBA)
    pub specular: [f32; 4],

    /// Specular exponent
    pub shininess: f32,

    /// Opacity (0.0 = invisible, 1.0 = opaque)
    pub opacity: f32,
}

impl Material {
    /// Create a new white, opaque material
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            diffuse: [1.0, 1.0, 1.0, 1.0],
            specular: [0.0, 0.0, 0.0, 1.0],
            shininess: 0.0,
            opacity: 1.0,
        }
    }

    /// Set the diffuse colour
    pub fn with_diffuse(mut self, r: f32, g: f32, b: f32) -> Self {
        self.diffuse = [r, g, b, 1.0];
        self
    }

    /// Set the specular colour and exponent
    pub fn with_specular(mut self, r: f32, g: f32, b: f32, shininess: f32) -> Self {
        self.specular = [r, g, b, 1.0];
        self.shininess = shininess.max(0.0);
        self
    }

    /// Set the opacity, clamped to `[0, 1]`
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Whether this material is drawn in the opaque pass
    pub fn is_opaque(&self) -> bool {
        self.opacity >= 1.0
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new("default")
    }
}
