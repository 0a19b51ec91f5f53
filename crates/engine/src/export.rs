//! Image export: one file per layer, encoding chosen by extension.

use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use tracing::info;

use crate::core::{MapError, Raster, Result};

/// Supported output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEncoding {
    /// Lossless, alpha preserved.
    Png,
    /// Lossy, alpha dropped.
    Jpeg,
}

impl ImageEncoding {
    /// Pick the encoding from `path`'s extension, case-insensitively.
    ///
    /// ```
    /// use std::path::Path;
    /// use dungeon_map_engine::export::ImageEncoding;
    ///
    /// assert_eq!(ImageEncoding::from_path(Path::new("map.PNG")).unwrap(), ImageEncoding::Png);
    /// assert_eq!(ImageEncoding::from_path(Path::new("map.jpeg")).unwrap(), ImageEncoding::Jpeg);
    /// assert!(ImageEncoding::from_path(Path::new("map.bmp")).is_err());
    /// ```
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(ImageEncoding::Png),
            "jpg" | "jpeg" => Ok(ImageEncoding::Jpeg),
            _ => Err(MapError::UnsupportedExtension(ext)),
        }
    }

    fn format(self) -> ImageFormat {
        match self {
            ImageEncoding::Png => ImageFormat::Png,
            ImageEncoding::Jpeg => ImageFormat::Jpeg,
        }
    }
}

/// `dir/stem.ext` becomes `dir/stem_Z=<layer>.ext`.
///
/// ```
/// use std::path::Path;
/// use dungeon_map_engine::export::layer_path;
///
/// assert_eq!(layer_path(Path::new("out/map.png"), -2), Path::new("out/map_Z=-2.png"));
/// ```
pub fn layer_path(path: &Path, layer: i32) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}_Z={layer}.{}", ext.to_string_lossy()),
        None => format!("{stem}_Z={layer}"),
    };
    path.with_file_name(name)
}

/// Encode `raster` to `path`, creating parent directories as needed.
pub fn write_raster(raster: &Raster, path: &Path, encoding: ImageEncoding) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let image = raster.to_image();
    match encoding {
        ImageEncoding::Png => image.save_with_format(path, encoding.format())?,
        ImageEncoding::Jpeg => DynamicImage::ImageRgba8(image)
            .to_rgb8()
            .save_with_format(path, encoding.format())?,
    }
    info!(
        path = %path.display(),
        width = raster.width(),
        height = raster.height(),
        "map image written"
    );
    Ok(())
}
