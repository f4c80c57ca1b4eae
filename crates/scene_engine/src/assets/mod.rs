//! Asset loading
//!
//! Only raw height maps are read from disk; meshes are built in code.

pub mod height_map;

pub use height_map::{decode_height_samples, load_height_map, TerrainError};
