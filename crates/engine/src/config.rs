//! Render configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config:
//!
//! ```
//! use dungeon_map_engine::{MapConfig, SurfaceKind, DoorDrawMode};
//!
//! let json = r#"{ "tile_width": 8, "surface": "tile_grid" }"#;
//! let config: MapConfig = serde_json::from_str(json).unwrap();
//! assert_eq!(config.tile_width, 8);
//! assert_eq!(config.tile_height, 16);
//! assert_eq!(config.surface, SurfaceKind::TileGrid);
//! assert_eq!(config.door_draw_mode, DoorDrawMode::AllDoors);
//! ```

use serde::{Deserialize, Serialize};

use crate::edges::DoorDrawMode;
use crate::types::{
    Padding, Rgba, DEFAULT_BACKGROUND, DEFAULT_PLACEHOLDER_COLOR, DEFAULT_TILE_HEIGHT,
    DEFAULT_TILE_WIDTH,
};

/// Which render target each page uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    /// One flattened pixel canvas per layer.
    #[default]
    Raster,
    /// One grid of tile handles per layer, backed by the shared tile cache.
    TileGrid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Pixel width of one cell.
    pub tile_width: u32,
    /// Pixel height of one cell.
    pub tile_height: u32,
    /// Margin in cells around the layout bounds.
    pub padding: Padding,
    /// Page fill before any cell is drawn.
    pub background: Rgba,
    /// Color for revealed-but-unexplored cells.
    pub placeholder_color: Rgba,
    pub door_draw_mode: DoorDrawMode,
    pub surface: SurfaceKind,
    /// Feature tile names, registered after the built-in tiles in this order.
    pub features: Vec<String>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_width: DEFAULT_TILE_WIDTH,
            tile_height: DEFAULT_TILE_HEIGHT,
            padding: Padding::default(),
            background: DEFAULT_BACKGROUND,
            placeholder_color: DEFAULT_PLACEHOLDER_COLOR,
            door_draw_mode: DoorDrawMode::default(),
            surface: SurfaceKind::default(),
            features: Vec::new(),
        }
    }
}

impl MapConfig {
    pub fn with_surface(mut self, surface: SurfaceKind) -> Self {
        self.surface = surface;
        self
    }

    pub fn with_tile_size(mut self, width: u32, height: u32) -> Self {
        self.tile_width = width;
        self.tile_height = height;
        self
    }

    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = features.into_iter().map(Into::into).collect();
        self
    }
}
