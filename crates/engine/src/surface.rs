//! Page surfaces: the two sinks a draw pass can write into.
//!
//! - [`PageSurface::Raster`] holds flattened pixels. Tiles are copied in as
//!   their composed interior, so a raster page is a plain image ready to
//!   encode.
//! - [`PageSurface::TileGrid`] holds one [`TileId`] per grid cell, for
//!   renderers that draw tiles straight from the cache.
//!
//! Both go through the same cell walk; only [`PageSurface::put`] differs.

use crate::core::Raster;
use crate::geometry::PageGeometry;
use crate::tile_cache::{TileCache, TileId};
use crate::types::Rgba;

/// A grid of tile handles, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    tiles: Vec<Option<TileId>>,
}

impl TileGrid {
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            tiles: vec![None; (columns as usize) * (rows as usize)],
        }
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[inline(always)]
    fn idx(&self, x: u32, y: u32) -> usize {
        debug_assert!(
            x < self.columns && y < self.rows,
            "tile ({x}, {y}) outside {}x{} grid",
            self.columns,
            self.rows
        );
        (y as usize) * (self.columns as usize) + (x as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<TileId> {
        self.tiles[self.idx(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, tile: Option<TileId>) {
        let i = self.idx(x, y);
        self.tiles[i] = tile;
    }

    pub fn clear(&mut self) {
        self.tiles.fill(None);
    }

    /// Resize and clear, keeping the allocation when possible.
    pub fn resize(&mut self, columns: u32, rows: u32) {
        self.columns = columns;
        self.rows = rows;
        self.tiles.clear();
        self.tiles.resize((columns as usize) * (rows as usize), None);
    }

    /// Occupied positions as `(x, y, tile)`.
    pub fn occupied(&self) -> impl Iterator<Item = (u32, u32, TileId)> + '_ {
        let columns = self.columns.max(1);
        self.tiles.iter().enumerate().filter_map(move |(i, t)| {
            t.map(|id| (i as u32 % columns, i as u32 / columns, id))
        })
    }

    /// Compose the grid into pixels: `background` everywhere, each occupied
    /// position replaced by its tile's interior.
    pub fn flatten(&self, cache: &TileCache, background: Rgba) -> Raster {
        let mut out = Raster::filled(
            self.columns * cache.tile_width(),
            self.rows * cache.tile_height(),
            background,
        );
        self.flatten_into(cache, &mut out);
        out
    }

    /// Copy every occupied tile's interior into `out`, leaving the rest.
    pub fn flatten_into(&self, cache: &TileCache, out: &mut Raster) {
        let (tw, th) = (cache.tile_width(), cache.tile_height());
        for (x, y, id) in self.occupied() {
            cache.blit_tile(id, out, (x * tw) as i32, (y * th) as i32);
        }
    }
}

/// Render target of one page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageSurface {
    Raster(Raster),
    TileGrid(TileGrid),
}

impl PageSurface {
    /// Reset to an empty surface sized for `geometry`.
    ///
    /// Raster pages are filled with `background`, then `texture` (if any) is
    /// repeated over it; tile grids are cleared.
    pub fn reset(&mut self, geometry: &PageGeometry, background: Rgba, texture: Option<&Raster>) {
        match self {
            PageSurface::Raster(r) => {
                if r.width() != geometry.pixel_width() || r.height() != geometry.pixel_height() {
                    r.resize(geometry.pixel_width(), geometry.pixel_height());
                }
                r.fill(background);
                if let Some(texture) = texture {
                    r.tile_repeat(texture);
                }
            }
            PageSurface::TileGrid(g) => {
                if g.columns() != geometry.columns() || g.rows() != geometry.rows() {
                    g.resize(geometry.columns(), geometry.rows());
                } else {
                    g.clear();
                }
            }
        }
    }

    /// Place tile `id` at grid position `(x, y)`.
    pub fn put(&mut self, geometry: &PageGeometry, cache: &TileCache, x: u32, y: u32, id: TileId) {
        match self {
            PageSurface::Raster(r) => {
                let (px, py) = geometry.pixel_position(x, y);
                cache.blit_tile(id, r, px, py);
            }
            PageSurface::TileGrid(g) => g.set(x, y, Some(id)),
        }
    }

    pub fn as_raster(&self) -> Option<&Raster> {
        match self {
            PageSurface::Raster(r) => Some(r),
            PageSurface::TileGrid(_) => None,
        }
    }

    pub fn as_tile_grid(&self) -> Option<&TileGrid> {
        match self {
            PageSurface::TileGrid(g) => Some(g),
            PageSurface::Raster(_) => None,
        }
    }

    pub fn is_raster(&self) -> bool {
        matches!(self, PageSurface::Raster(_))
    }
}
