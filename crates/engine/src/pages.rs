//! Page manager - one render target per layer of the bound layout.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized --bind--> Bound --resize--> Sized --draw_all--> Drawn
//!                                             ^                   |
//!                                             +-- set_texture ----+
//!                                             +-- set_map_state --+
//! ```
//!
//! [`PageManager::bind`] runs the whole chain: it recomputes layers and
//! bounds, resizes the page list to one page per layer (reusing surviving
//! pages, dropping the highest excess pages first) and redraws every page in
//! ascending layer order. There are no partial updates: after a texture or
//! visibility change, call [`PageManager::draw_all`] or
//! [`PageManager::draw_layer`] for the pages that need it.
//!
//! Pages are read-only to callers apart from their presentation tint.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::config::{MapConfig, SurfaceKind};
use crate::core::{Raster, Result, TileFlags, TileTextures};
use crate::draw::{DrawStats, MapDrawPass};
use crate::export::{layer_path, write_raster, ImageEncoding};
use crate::geometry::PageGeometry;
use crate::surface::{PageSurface, TileGrid};
use crate::tile_cache::TileCache;
use crate::types::{DoorPosition, Layout, MapState, Rgba, Uid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Uninitialized,
    Bound,
    Sized,
    Drawn,
}

/// The render target for one layer.
#[derive(Debug, Clone)]
pub struct Page {
    layer: i32,
    surface: PageSurface,
    tint: Rgba,
    version: u64,
}

impl Page {
    fn new(layer: i32, kind: SurfaceKind) -> Self {
        let surface = match kind {
            SurfaceKind::Raster => PageSurface::Raster(Raster::new(0, 0)),
            SurfaceKind::TileGrid => PageSurface::TileGrid(TileGrid::default()),
        };
        Self {
            layer,
            surface,
            tint: Rgba::WHITE,
            version: 0,
        }
    }

    pub fn layer(&self) -> i32 {
        self.layer
    }

    pub fn surface(&self) -> &PageSurface {
        &self.surface
    }

    /// Presentation multiply; white when no onion-skin is applied.
    pub fn tint(&self) -> Rgba {
        self.tint
    }

    /// Bumped every time the page is redrawn.
    pub fn version(&self) -> u64 {
        self.version
    }
}

pub struct PageManager {
    config: MapConfig,
    textures: TileTextures,
    cache: TileCache,
    background_texture: Option<Raster>,
    layout: Option<Arc<Layout>>,
    states: Option<MapState>,
    door_positions: HashMap<Uid, Vec<DoorPosition>>,
    geometry: PageGeometry,
    layers: Vec<i32>,
    pages: Vec<Page>,
    state: PageState,
}

impl PageManager {
    /// A manager with generated default textures for `config`'s tile size
    /// and features.
    pub fn new(config: MapConfig) -> Result<Self> {
        let textures = TileTextures::with_defaults(
            config.tile_width,
            config.tile_height,
            config.features.iter().map(String::as_str),
        )?;
        Ok(Self::with_textures(config, textures))
    }

    /// A manager drawing with `textures`. Their tile size wins over the
    /// config's.
    pub fn with_textures(mut config: MapConfig, textures: TileTextures) -> Self {
        config.tile_width = textures.tile_width();
        config.tile_height = textures.tile_height();
        Self {
            config,
            textures,
            cache: TileCache::new(),
            background_texture: None,
            layout: None,
            states: None,
            door_positions: HashMap::new(),
            geometry: PageGeometry::default(),
            layers: Vec::new(),
            pages: Vec::new(),
            state: PageState::Uninitialized,
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn textures(&self) -> &TileTextures {
        &self.textures
    }

    pub fn cache(&self) -> &TileCache {
        &self.cache
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn layout(&self) -> Option<&Arc<Layout>> {
        self.layout.as_ref()
    }

    pub fn map_state(&self) -> Option<&MapState> {
        self.states.as_ref()
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Layer coordinates, ascending; `layers()[i]` is the layer of page `i`.
    pub fn layers(&self) -> &[i32] {
        &self.layers
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Page bound to layer `z`.
    pub fn page(&self, z: i32) -> Option<&Page> {
        let index = self.layers.binary_search(&z).ok()?;
        self.pages.get(index)
    }

    /// Page by index. Panics when out of range.
    pub fn page_at(&self, index: usize) -> &Page {
        &self.pages[index]
    }

    /// Bind `layout` with optional fog-of-war `states`, then resize and
    /// redraw every page.
    pub fn bind(&mut self, layout: Arc<Layout>, states: Option<MapState>) -> DrawStats {
        self.layers = layout.layers();
        self.door_positions = layout.room_door_positions();
        self.geometry = PageGeometry::new(
            layout.bounds(),
            self.config.padding,
            self.config.tile_width,
            self.config.tile_height,
        );
        debug!(
            layout = %layout.name,
            rooms = layout.rooms().len(),
            layers = ?self.layers,
            columns = self.geometry.columns(),
            rows = self.geometry.rows(),
            "layout bound"
        );
        self.layout = Some(layout);
        self.states = states;
        self.state = PageState::Bound;

        self.resize(self.layers.len());
        self.draw_all()
    }

    /// Replace the fog-of-war state. Pages keep their old contents until
    /// redrawn.
    pub fn set_map_state(&mut self, states: Option<MapState>) {
        self.states = states;
        if self.state == PageState::Drawn {
            self.state = PageState::Sized;
        }
    }

    fn resize(&mut self, count: usize) {
        let before = self.pages.len();
        self.pages.truncate(count);
        for (page, &layer) in self.pages.iter_mut().zip(&self.layers) {
            page.layer = layer;
            page.tint = Rgba::WHITE;
        }
        for &layer in &self.layers[self.pages.len()..count] {
            self.pages.push(Page::new(layer, self.config.surface));
        }
        debug!(before, after = count, "pages resized");
        self.state = PageState::Sized;
    }

    /// Redraw every page in ascending layer order.
    pub fn draw_all(&mut self) -> DrawStats {
        let mut total = DrawStats::default();
        for index in 0..self.pages.len() {
            total += self.draw_page(index);
        }
        if self.state != PageState::Uninitialized {
            self.state = PageState::Drawn;
        }
        total
    }

    /// Redraw only the page for layer `z`; `None` if there is none.
    ///
    /// The manager counts as drawn again only after [`Self::draw_all`].
    pub fn draw_layer(&mut self, z: i32) -> Option<DrawStats> {
        let index = self.layers.binary_search(&z).ok()?;
        Some(self.draw_page(index))
    }

    fn draw_page(&mut self, index: usize) -> DrawStats {
        let Some(layout) = self.layout.as_deref() else {
            return DrawStats::default();
        };
        let pass = MapDrawPass {
            layout,
            states: self.states.as_ref(),
            door_positions: &self.door_positions,
            geometry: &self.geometry,
            config: &self.config,
            textures: &self.textures,
            background_texture: self.background_texture.as_ref(),
        };
        let page = &mut self.pages[index];
        let stats = pass.draw_layer(page.layer, &mut self.cache, &mut page.surface);
        page.version += 1;
        stats
    }

    /// Assign a tile texture by name, registering the name if new.
    ///
    /// Bit meanings may have changed, so the tile cache is dropped and pages
    /// need a redraw.
    pub fn set_texture(&mut self, name: &str, texture: Raster) -> Result<TileFlags> {
        let flag = self.textures.set_texture(name, texture)?;
        self.invalidate();
        Ok(flag)
    }

    /// Register a tile name without an image.
    pub fn register_tile(&mut self, name: &str) -> Result<TileFlags> {
        let before = self.textures.revision();
        let flag = self.textures.register(name)?;
        if self.textures.revision() != before {
            self.invalidate();
        }
        Ok(flag)
    }

    /// Texture repeated under the cells of raster pages.
    pub fn set_background(&mut self, texture: Option<Raster>) {
        self.background_texture = texture;
        if self.state == PageState::Drawn {
            self.state = PageState::Sized;
        }
    }

    /// Drop the tile cache along with every handle into it. Tile-grid pages
    /// come back empty until redrawn; raster pages keep their old pixels.
    fn invalidate(&mut self) {
        self.cache.clear();
        for page in &mut self.pages {
            if let PageSurface::TileGrid(grid) = &mut page.surface {
                grid.clear();
            }
        }
        debug!(revision = self.textures.revision(), "tile textures changed");
        if self.state == PageState::Drawn {
            self.state = PageState::Sized;
        }
    }

    /// Set the presentation tint of page `index`. Panics when out of range.
    pub fn set_page_tint(&mut self, index: usize, tint: Rgba) {
        self.pages[index].tint = tint;
    }

    /// Reset every page's tint to white.
    pub fn clear_tints(&mut self) {
        for page in &mut self.pages {
            page.tint = Rgba::WHITE;
        }
    }

    /// Flattened pixels of page `index`, untinted.
    ///
    /// Tile-grid pages are composed from the cache over the background, the
    /// same way a raster page is drawn.
    pub fn page_raster(&self, index: usize) -> Raster {
        match &self.pages[index].surface {
            PageSurface::Raster(r) => r.clone(),
            PageSurface::TileGrid(grid) => {
                let mut out = Raster::filled(
                    self.geometry.pixel_width(),
                    self.geometry.pixel_height(),
                    self.config.background,
                );
                if let Some(texture) = &self.background_texture {
                    out.tile_repeat(texture);
                }
                grid.flatten_into(&self.cache, &mut out);
                out
            }
        }
    }

    /// Flattened pixels of page `index` with its tint multiplied in.
    pub fn presented(&self, index: usize) -> Raster {
        let mut raster = self.page_raster(index);
        raster.multiply(self.pages[index].tint);
        raster
    }

    /// Write one image per page as `<stem>_Z=<layer><ext>` beside `path`.
    ///
    /// The extension is checked before anything is written. Returns the
    /// written paths in ascending layer order.
    pub fn save_images(&self, path: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        self.save_with(path.as_ref(), Self::page_raster)
    }

    /// Like [`Self::save_images`], with each page's tint applied.
    pub fn save_images_presented(&self, path: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        self.save_with(path.as_ref(), Self::presented)
    }

    fn save_with(&self, path: &Path, render: fn(&Self, usize) -> Raster) -> Result<Vec<PathBuf>> {
        let encoding = ImageEncoding::from_path(path)?;
        let mut written = Vec::with_capacity(self.pages.len());
        for (index, page) in self.pages.iter().enumerate() {
            let out = layer_path(path, page.layer);
            write_raster(&render(self, index), &out, encoding)?;
            written.push(out);
        }
        Ok(written)
    }
}
