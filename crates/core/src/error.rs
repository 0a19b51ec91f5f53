//! Error types for map rendering configuration and export.

use thiserror::Error;

/// Domain errors raised by the renderer.
///
/// Every variant here indicates a configuration problem that would make the
/// rendered map structurally wrong, so callers are expected to surface it
/// rather than retry.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("tile flag capacity exceeded registering `{name}` (max {max} flags)")]
    CapacityExceeded { name: String, max: usize },
    #[error("tile flag name must not be blank")]
    InvalidFlagName,
    #[error("unsupported image extension `{0}` (expected .png, .jpg or .jpeg)")]
    UnsupportedExtension(String),
    #[error("tile size must be at least 1x1, got {width}x{height}")]
    InvalidTileSize { width: u32, height: u32 },
    #[error("texture `{name}` is {width}x{height}, expected {expected_width}x{expected_height}")]
    TextureSize {
        name: String,
        width: u32,
        height: u32,
        expected_width: u32,
        expected_height: u32,
    },
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MapError>;
