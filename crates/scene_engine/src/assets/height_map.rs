//! Raw 16-bit height-map loading
//!
//! Files hold little-endian `u16` samples in row-major order with no header.
//! Each sample is scaled into `[0, 1)` by dividing by 65536.

use std::path::Path;

use thiserror::Error;

/// Height-map loading errors
#[derive(Error, Debug)]
pub enum TerrainError {
    /// The file could not be read
    #[error("Failed to read height map {path}: {source}")]
    Io {
        /// File that was requested
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Read a height map into normalized samples
pub fn load_height_map<P: AsRef<Path>>(path: P) -> Result<Vec<f32>, TerrainError> {
    let path_ref = path.as_ref();
    log::debug!("Loading height map from: {:?}", path_ref);

    let bytes = std::fs::read(path_ref).map_err(|source| TerrainError::Io {
        path: path_ref.display().to_string(),
        source,
    })?;
    let samples = decode_height_samples(&bytes);

    log::info!("Loaded {} height samples from {:?}", samples.len(), path_ref);
    Ok(samples)
}

/// Decode little-endian `u16` samples; a trailing odd byte is ignored
pub fn decode_height_samples(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|pair| f32::from(u16::from_le_bytes([pair[0], pair[1]])) / 65536.0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_are_little_endian_and_scaled() {
        let samples = decode_height_samples(&[0x00, 0x80, 0xff, 0xff, 0x00, 0x00]);
        assert_eq!(samples, vec![0.5, 65535.0 / 65536.0, 0.0]);
    }

    #[test]
    fn test_trailing_odd_byte_is_ignored() {
        assert_eq!(decode_height_samples(&[0x00, 0x40, 0x7f]).len(), 1);
        assert!(decode_height_samples(&[0x01]).is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("scene_engine_{}_height.raw", std::process::id()));
        std::fs::write(&path, [0x00, 0x40, 0x00, 0xc0]).unwrap();

        let samples = load_height_map(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(samples, vec![0.25, 0.75]);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let error = load_height_map("definitely/not/here.raw").unwrap_err();
        assert!(error.to_string().contains("definitely/not/here.raw"));
    }
}
