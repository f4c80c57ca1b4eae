//! Configuration system
//!
//! Settings for the viewport/projection, the free-look camera controls and
//! terrain generation. Any [`Config`] type can be loaded from or saved to
//! TOML or RON, chosen by file extension.

use std::path::Path;

pub use serde::{Serialize, Deserialize};

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match Format::from_path(path)? {
            Format::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Format::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Load configuration from file, or fall back to defaults when it is missing
    ///
    /// Parse errors are still reported; only a file that does not exist yields
    /// the default value.
    fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_file(path)
        } else {
            log::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match Format::from_path(path)? {
            Format::Toml => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

enum Format {
    Toml,
    Ron,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Top-level settings for a scene run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Output size and projection parameters
    pub viewport: ViewportConfig,
    /// Camera placement and input speeds
    pub camera: CameraConfig,
    /// Height-map terrain generation
    pub terrain: TerrainConfig,
}

impl Config for SceneConfig {}

/// Viewport size and perspective projection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            fov_degrees: 45.0,
            near: 1.0,
            far: 10000.0,
        }
    }
}

impl ViewportConfig {
    /// Width over height, guarding against a zero-height viewport
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Build the projection matrix for this viewport
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_lh(
            utils::deg_to_rad(self.fov_degrees),
            self.aspect_ratio(),
            self.near,
            self.far,
        )
    }
}

/// Camera start position and input speeds
///
/// Every per-frame amount is `speed * speed_scale * delta_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial camera position
    pub start_position: [f32; 3],
    /// Global multiplier applied to every speed below
    pub speed_scale: f32,
    /// Translation speed in world units per second
    pub move_speed: f32,
    /// Yaw/pitch speed in degrees per second
    pub rotate_speed: f32,
    /// Roll speed in degrees per second
    pub roll_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_position: [0.0, 50.0, -500.0],
            speed_scale: 5.0,
            move_speed: 100.0,
            rotate_speed: 20.0,
            roll_speed: 40.0,
        }
    }
}

impl CameraConfig {
    /// Start position as a vector
    pub fn start_position(&self) -> Vec3 {
        Vec3::from(self.start_position)
    }
}

/// Terrain generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Raw 16-bit little-endian height-map file
    pub height_map: String,
    /// Number of cells along each side of the grid
    pub grid_size: u32,
    /// Width of one cell in world units
    pub cell_size: f32,
    /// Height of a sample with value 1.0
    pub max_height: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            height_map: "HeightMap.raw".to_string(),
            grid_size: 1024,
            cell_size: 5.0,
            max_height: 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("scene_engine_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_toml_roundtrip() {
        let path = temp_path("roundtrip.toml");
        let mut config = SceneConfig::default();
        config.terrain.grid_size = 64;
        config.camera.speed_scale = 2.5;

        config.save_to_file(&path).unwrap();
        let loaded = SceneConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_roundtrip() {
        let path = temp_path("roundtrip.ron");
        let mut config = SceneConfig::default();
        config.viewport.width = 1920;
        config.viewport.height = 1080;

        config.save_to_file(&path).unwrap();
        let loaded = SceneConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: SceneConfig = toml::from_str("[terrain]\ngrid_size = 16\n").unwrap();

        assert_eq!(config.terrain.grid_size, 16);
        assert_eq!(config.terrain.cell_size, 5.0);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_unsupported_extension() {
        let result = SceneConfig::load_from_file(temp_path("settings.ini"));
        assert!(matches!(result, Err(ConfigError::Io(_)) | Err(ConfigError::UnsupportedFormat(_))));

        let result = SceneConfig::default().save_to_file(temp_path("settings.ini"));
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let config = SceneConfig::load_or_default(temp_path("does_not_exist.toml")).unwrap();
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn test_zero_height_viewport_aspect() {
        let viewport = ViewportConfig { height: 0, ..ViewportConfig::default() };
        assert_eq!(viewport.aspect_ratio(), 800.0);
    }
}
