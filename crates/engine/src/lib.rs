//! Map rendering engine - turns a bound layout into one page per layer.
//!
//! # Module Structure
//!
//! - [`edges`]: per-cell door/wall/open resolution and door draw modes
//! - [`tile_cache`]: memoized composed tiles keyed by `(flags, color)`
//! - [`geometry`]: page size and cell placement from layout bounds + padding
//! - [`surface`]: raster and tile-grid page sinks
//! - [`draw`]: the per-layer cell walk with fog-of-war rules
//! - [`pages`]: page lifecycle, texture changes, export
//! - [`onion`]: depth-faded page tints
//! - [`export`]: file naming and PNG/JPEG encoding
//! - [`config`]: render configuration
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use dungeon_map_engine::{MapConfig, PageManager};
//! use dungeon_map_engine::types::{Cell, Direction, Layout, Room, RoomTemplate, Uid};
//!
//! let mut template = RoomTemplate::new("closet", 1, 1);
//! template.set_cell(0, 0, Some(Cell::new().with_door(Direction::North)));
//!
//! let mut layout = Layout::new("demo");
//! layout.add_room(Room::new(Uid::new(0, 1, 0), (0, 0, 0), Arc::new(template)));
//!
//! let mut pages = PageManager::new(MapConfig::default()).unwrap();
//! let stats = pages.bind(Arc::new(layout), None);
//! assert_eq!(stats.cells_drawn, 1);
//! assert_eq!(pages.layers(), &[0]);
//! ```

pub mod config;
pub mod draw;
pub mod edges;
pub mod export;
pub mod geometry;
pub mod onion;
pub mod pages;
pub mod surface;
pub mod tile_cache;

pub use dungeon_map_core as core;
pub use dungeon_map_types as types;

pub use config::{MapConfig, SurfaceKind};
pub use draw::{CellVisibility, DrawStats, MapDrawPass};
pub use edges::{DoorDrawMode, Edge, EdgeResolver};
pub use export::ImageEncoding;
pub use geometry::PageGeometry;
pub use onion::OnionSkin;
pub use pages::{Page, PageManager, PageState};
pub use surface::{PageSurface, TileGrid};
pub use tile_cache::{TileCache, TileId, TileKey};
