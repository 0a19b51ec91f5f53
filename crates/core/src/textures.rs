//! Tile textures: the flag registry plus one optional image per flag.
//!
//! Every registration or texture change bumps [`TileTextures::revision`].
//! Caches of composed tiles key on bit positions, so they compare revisions
//! and rebuild from scratch when it moves.

use tracing::debug;

use crate::error::{MapError, Result};
use crate::flags::{TileFlagRegistry, TileFlags};
use crate::raster::Raster;
use crate::types::{Direction, Rgba, GRID_TILE, MAX_TILE_FLAGS};

const GRID_COLOR: Rgba = Rgba::new(255, 255, 255, 40);
const WALL_COLOR: Rgba = Rgba::opaque(235, 235, 235);
const DOOR_COLOR: Rgba = Rgba::opaque(230, 170, 60);

const FEATURE_COLORS: [Rgba; 6] = [
    Rgba::opaque(250, 220, 80),
    Rgba::opaque(90, 210, 120),
    Rgba::opaque(230, 80, 80),
    Rgba::opaque(90, 200, 230),
    Rgba::opaque(200, 120, 230),
    Rgba::opaque(240, 240, 240),
];

#[derive(Debug, Clone)]
pub struct TileTextures {
    tile_width: u32,
    tile_height: u32,
    registry: TileFlagRegistry,
    textures: Vec<Option<Raster>>,
    revision: u64,
}

impl TileTextures {
    /// An empty set for tiles of `tile_width x tile_height` pixels.
    pub fn new(tile_width: u32, tile_height: u32) -> Self {
        Self {
            tile_width,
            tile_height,
            registry: TileFlagRegistry::new(),
            textures: vec![None; MAX_TILE_FLAGS],
            revision: 0,
        }
    }

    /// Register the standard names (grid, six doors, four walls, then
    /// `features`) without assigning images.
    pub fn register_defaults<'a>(
        &mut self,
        features: impl IntoIterator<Item = &'a str>,
    ) -> Result<()> {
        self.register(GRID_TILE)?;
        for d in Direction::ALL {
            self.register(d.door_tile())?;
        }
        for d in Direction::ALL {
            if let Some(wall) = d.wall_tile() {
                self.register(wall)?;
            }
        }
        for f in features {
            self.register(f)?;
        }
        Ok(())
    }

    /// Standard names with generated images, so maps render without assets.
    pub fn with_defaults<'a>(
        tile_width: u32,
        tile_height: u32,
        features: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self> {
        if tile_width == 0 || tile_height == 0 {
            return Err(MapError::InvalidTileSize {
                width: tile_width,
                height: tile_height,
            });
        }
        let mut textures = Self::new(tile_width, tile_height);
        let features: Vec<&str> = features.into_iter().collect();
        textures.register_defaults(features.iter().copied())?;

        let (w, h) = (tile_width, tile_height);
        textures.set_texture(GRID_TILE, grid_texture(w, h))?;
        for d in Direction::ALL {
            textures.set_texture(d.door_tile(), door_texture(d, w, h))?;
            if let Some(wall) = d.wall_tile() {
                textures.set_texture(wall, wall_texture(d, w, h))?;
            }
        }
        for (i, f) in features.iter().enumerate() {
            let color = FEATURE_COLORS[i % FEATURE_COLORS.len()];
            textures.set_texture(f, feature_texture(w, h, color))?;
        }
        Ok(textures)
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    pub fn registry(&self) -> &TileFlagRegistry {
        &self.registry
    }

    /// Incremented on every change that can alter what a flag bit denotes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn register(&mut self, name: &str) -> Result<TileFlags> {
        let before = self.registry.len();
        let flag = self.registry.register(name)?;
        if self.registry.len() != before {
            self.revision += 1;
        }
        Ok(flag)
    }

    pub fn flag_of(&self, name: &str) -> TileFlags {
        self.registry.flag_of(name)
    }

    /// Assign `texture` to `name`, registering the name if needed.
    pub fn set_texture(&mut self, name: &str, texture: Raster) -> Result<TileFlags> {
        if texture.width() != self.tile_width || texture.height() != self.tile_height {
            return Err(MapError::TextureSize {
                name: name.to_string(),
                width: texture.width(),
                height: texture.height(),
                expected_width: self.tile_width,
                expected_height: self.tile_height,
            });
        }
        let flag = self.register(name)?;
        self.textures[flag.index()] = Some(texture);
        self.revision += 1;
        debug!(tile = name, bit = flag.index(), revision = self.revision, "tile texture set");
        Ok(flag)
    }

    /// Remove the image for `name`; the flag stays registered.
    pub fn clear_texture(&mut self, name: &str) {
        let flag = self.registry.flag_of(name);
        if flag.is_empty() {
            return;
        }
        if self.textures[flag.index()].take().is_some() {
            self.revision += 1;
        }
    }

    /// Image for a single-bit flag, if one is assigned.
    pub fn texture(&self, flag: TileFlags) -> Option<&Raster> {
        if flag.len() != 1 {
            return None;
        }
        self.textures[flag.index()].as_ref()
    }
}

/// One-pixel lines along the top and left edges; tiles into a grid.
pub fn grid_texture(w: u32, h: u32) -> Raster {
    let mut r = Raster::new(w, h);
    r.fill_rect(0, 0, w, 1, GRID_COLOR);
    r.fill_rect(0, 1, 1, h.saturating_sub(1), GRID_COLOR);
    r
}

fn edge_thickness(w: u32, h: u32) -> u32 {
    (w.min(h) / 8).max(1)
}

/// Rectangle `(x, y, w, h)` of the strip along a lateral edge.
fn edge_strip(direction: Direction, w: u32, h: u32) -> (i32, i32, u32, u32) {
    let t = edge_thickness(w, h);
    match direction {
        Direction::North => (0, 0, w, t),
        Direction::South => (0, (h - t) as i32, w, t),
        Direction::West => (0, 0, t, h),
        Direction::East => ((w - t) as i32, 0, t, h),
        Direction::Top | Direction::Bottom => (0, 0, 0, 0),
    }
}

/// A solid strip along one lateral edge.
pub fn wall_texture(direction: Direction, w: u32, h: u32) -> Raster {
    let mut r = Raster::new(w, h);
    let (x, y, sw, sh) = edge_strip(direction, w, h);
    r.fill_rect(x, y, sw, sh, WALL_COLOR);
    r
}

/// Lateral doors: a wall strip with a colored opening in its middle half.
/// Vertical doors: a small arrow near the top or bottom edge.
pub fn door_texture(direction: Direction, w: u32, h: u32) -> Raster {
    let mut r = Raster::new(w, h);
    match direction {
        Direction::North | Direction::South => {
            let (x, y, sw, sh) = edge_strip(direction, w, h);
            r.fill_rect(x, y, sw, sh, WALL_COLOR);
            r.fill_rect((w / 4) as i32, y, w / 2, sh, DOOR_COLOR);
        }
        Direction::East | Direction::West => {
            let (x, y, sw, sh) = edge_strip(direction, w, h);
            r.fill_rect(x, y, sw, sh, WALL_COLOR);
            r.fill_rect(x, (h / 4) as i32, sw, h / 2, DOOR_COLOR);
        }
        Direction::Top | Direction::Bottom => {
            let size = (w.min(h) / 4).max(1);
            let cx = (w / 2) as i32;
            let margin = edge_thickness(w, h) as i32;
            for i in 0..size as i32 {
                let (row, half) = if direction == Direction::Top {
                    (margin + i, i)
                } else {
                    (h as i32 - 1 - margin - i, i)
                };
                r.fill_rect(cx - half, row, (2 * half + 1) as u32, 1, DOOR_COLOR);
            }
        }
    }
    r
}

/// A filled diamond centered in the tile.
pub fn feature_texture(w: u32, h: u32, color: Rgba) -> Raster {
    let mut r = Raster::new(w, h);
    let radius = (w.min(h) / 4) as i32;
    let (cx, cy) = ((w / 2) as i32, (h / 2) as i32);
    for dy in -radius..=radius {
        let half = radius - dy.abs();
        r.fill_rect(cx - half, cy + dy, (2 * half + 1) as u32, 1, color);
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registration_order() {
        let t = TileTextures::with_defaults(8, 8, ["Save", "Boss"]).unwrap();
        let names: Vec<&str> = t.registry().names().collect();
        assert_eq!(
            names,
            [
                "Grid",
                "NorthDoor",
                "SouthDoor",
                "EastDoor",
                "WestDoor",
                "TopDoor",
                "BottomDoor",
                "NorthWall",
                "SouthWall",
                "EastWall",
                "WestWall",
                "Save",
                "Boss",
            ]
        );
        for flag in t.registry().flags_of(names.iter().copied()) {
            assert!(t.texture(flag).is_some());
        }
    }

    #[test]
    fn wrong_texture_size_is_rejected() {
        let mut t = TileTextures::new(8, 8);
        let err = t.set_texture("Grid", Raster::new(4, 8)).unwrap_err();
        assert!(matches!(err, MapError::TextureSize { width: 4, .. }));
        assert!(t.registry().is_empty());
    }

    #[test]
    fn zero_tile_size_is_rejected() {
        for (w, h) in [(0, 0), (0, 8), (8, 0)] {
            let err = TileTextures::with_defaults(w, h, ["Save"]).unwrap_err();
            assert!(matches!(
                err,
                MapError::InvalidTileSize { width, height } if (width, height) == (w, h)
            ));
        }
        assert!(TileTextures::with_defaults(1, 1, ["Save"]).is_ok());
    }

    #[test]
    fn revision_moves_on_changes_only() {
        let mut t = TileTextures::new(4, 4);
        let r0 = t.revision();
        t.register("a").unwrap();
        let r1 = t.revision();
        assert!(r1 > r0);
        t.register("a").unwrap();
        assert_eq!(t.revision(), r1);
        t.set_texture("a", Raster::new(4, 4)).unwrap();
        let r2 = t.revision();
        assert!(r2 > r1);
        t.clear_texture("a");
        assert!(t.revision() > r2);
        let r3 = t.revision();
        t.clear_texture("a");
        t.clear_texture("missing");
        assert_eq!(t.revision(), r3);
    }

    #[test]
    fn registered_flag_without_texture_has_none() {
        let mut t = TileTextures::new(4, 4);
        let flag = t.register("Plain").unwrap();
        assert!(t.texture(flag).is_none());
    }

    #[test]
    fn wall_textures_touch_their_edge() {
        let w = wall_texture(Direction::North, 8, 8);
        assert_eq!(w.get(3, 0), WALL_COLOR);
        assert_eq!(w.get(3, 7), Rgba::TRANSPARENT);
        let e = wall_texture(Direction::East, 8, 8);
        assert_eq!(e.get(7, 3), WALL_COLOR);
        assert_eq!(e.get(0, 3), Rgba::TRANSPARENT);
    }

    #[test]
    fn door_texture_differs_from_wall() {
        for d in Direction::LATERAL {
            assert_ne!(door_texture(d, 16, 16), wall_texture(d, 16, 16));
        }
        assert_ne!(
            door_texture(Direction::Top, 16, 16),
            door_texture(Direction::Bottom, 16, 16)
        );
    }
}
