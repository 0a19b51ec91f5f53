//! Tile cache - memoized composed tiles keyed by `(flags, color)`.
//!
//! A cell's appearance depends only on which tile textures it shows and its
//! display color, never on its position. The cache composes each distinct
//! [`TileKey`] once and hands out a stable [`TileId`] for it; every later
//! request for the same key returns the same id.
//!
//! # Tile layout
//!
//! ```text
//! +--------------------+   (w + 2) x (h + 2) pixels
//! |b b b b b b b b b b |   b = border, copied from the adjacent interior
//! |b i i i i i i i i b |   i = interior: color fill, then every flag's
//! |b i i i i i i i i b |       texture composited over it, lowest bit first
//! |b b b b b b b b b b |
//! +--------------------+
//! ```
//!
//! # Invalidation
//!
//! Entries are keyed by bit position. When the texture set's revision moves,
//! or its tile size changes, old bits may denote different images, so the
//! whole cache is dropped and rebuilt lazily. Ids from before the drop are
//! invalid.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::core::{Raster, TileFlags, TileTextures};
use crate::types::Rgba;

/// Cache key: the composed flag set plus the display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileKey {
    pub flags: TileFlags,
    pub color: Rgba,
}

impl TileKey {
    pub const fn new(flags: TileFlags, color: Rgba) -> Self {
        Self { flags, color }
    }
}

/// Handle to a composed tile inside one [`TileCache`] generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(u32);

impl TileId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Default)]
pub struct TileCache {
    tile_width: u32,
    tile_height: u32,
    revision: Option<u64>,
    index: FxHashMap<TileKey, TileId>,
    tiles: Vec<Raster>,
    keys: Vec<TileKey>,
}

impl TileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interior tile width in pixels (border excluded).
    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Drop every entry. The next lookup re-syncs with its texture set.
    pub fn clear(&mut self) {
        if !self.tiles.is_empty() {
            debug!(entries = self.tiles.len(), "tile cache cleared");
        }
        self.index.clear();
        self.tiles.clear();
        self.keys.clear();
        self.revision = None;
    }

    fn sync(&mut self, textures: &TileTextures) {
        let current = Some(textures.revision());
        if self.revision == current
            && self.tile_width == textures.tile_width()
            && self.tile_height == textures.tile_height()
        {
            return;
        }
        self.clear();
        self.tile_width = textures.tile_width();
        self.tile_height = textures.tile_height();
        self.revision = current;
    }

    /// The tile for `flags` drawn over `color`, composing it on a miss.
    pub fn tile_for(&mut self, textures: &TileTextures, flags: TileFlags, color: Rgba) -> TileId {
        self.sync(textures);
        let key = TileKey::new(flags, color);
        if let Some(&id) = self.index.get(&key) {
            return id;
        }

        let id = TileId(self.tiles.len() as u32);
        self.tiles.push(compose(textures, key));
        self.keys.push(key);
        self.index.insert(key, id);
        id
    }

    /// Composed tile including its 1-pixel border. Panics on a stale id.
    pub fn tile(&self, id: TileId) -> &Raster {
        &self.tiles[id.index()]
    }

    pub fn key(&self, id: TileId) -> TileKey {
        self.keys[id.index()]
    }

    /// Copy the interior of tile `id` into `dst` with its top-left at `(x, y)`.
    pub fn blit_tile(&self, id: TileId, dst: &mut Raster, x: i32, y: i32) {
        let tile = self.tile(id);
        dst.blit(tile, 1, 1, self.tile_width, self.tile_height, x, y);
    }
}

fn compose(textures: &TileTextures, key: TileKey) -> Raster {
    let mut tile = Raster::filled(
        textures.tile_width() + 2,
        textures.tile_height() + 2,
        key.color,
    );
    for flag in key.flags {
        if let Some(texture) = textures.texture(flag) {
            tile.stamp(texture, 1, 1);
        }
    }
    tile.fill_border();
    tile
}
