//! Map draw pass - walks one layer's rooms and writes their cells to a page.
//!
//! Per non-empty template cell:
//!
//! | Room state                          | Cell        | Result                         |
//! |-------------------------------------|-------------|--------------------------------|
//! | absent                              | any         | room color, features           |
//! | present                             | visible     | room color, features           |
//! | present, fully visible              | not visible | placeholder color, no features |
//! | present, not fully visible          | not visible | skipped, nothing drawn         |
//!
//! The grid tile is always part of a drawn cell; edges come from
//! [`EdgeResolver`]. The final flag set and color go through the
//! [`TileCache`] once, and the resulting tile is handed to the page's
//! [`PageSurface`], so raster and tile-grid pages share one walk.

use std::collections::HashMap;

use rustc_hash::FxHashSet;
use tracing::{trace, warn};

use crate::config::MapConfig;
use crate::core::{Raster, TileTextures};
use crate::edges::{EdgeFlags, EdgeResolver};
use crate::geometry::PageGeometry;
use crate::surface::PageSurface;
use crate::tile_cache::TileCache;
use crate::types::{DoorPosition, Layout, MapState, RoomState, Uid, GRID_TILE};

/// Counters from one draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawStats {
    /// Cells written to the page, dimmed ones included.
    pub cells_drawn: u32,
    /// Cells drawn with the placeholder color.
    pub cells_dimmed: u32,
    /// Non-empty cells skipped as unexplored.
    pub cells_hidden: u32,
    /// Feature tiles composited onto fully visible cells.
    pub features_drawn: u32,
}

impl std::ops::AddAssign for DrawStats {
    fn add_assign(&mut self, rhs: Self) {
        self.cells_drawn += rhs.cells_drawn;
        self.cells_dimmed += rhs.cells_dimmed;
        self.cells_hidden += rhs.cells_hidden;
        self.features_drawn += rhs.features_drawn;
    }
}

/// How a cell is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellVisibility {
    Full,
    Dimmed,
    Hidden,
}

impl CellVisibility {
    pub fn of(state: Option<&RoomState>, row: u32, column: u32) -> Self {
        match state {
            None => CellVisibility::Full,
            Some(s) if s.is_cell_visible(row, column) => CellVisibility::Full,
            Some(s) if s.is_fully_visible() => CellVisibility::Dimmed,
            Some(_) => CellVisibility::Hidden,
        }
    }
}

/// Everything a draw call reads. Built once per layout bind.
#[derive(Debug, Clone, Copy)]
pub struct MapDrawPass<'a> {
    pub layout: &'a Layout,
    pub states: Option<&'a MapState>,
    pub door_positions: &'a HashMap<Uid, Vec<DoorPosition>>,
    pub geometry: &'a PageGeometry,
    pub config: &'a MapConfig,
    pub textures: &'a TileTextures,
    /// Repeated under the cells of raster pages.
    pub background_texture: Option<&'a Raster>,
}

impl MapDrawPass<'_> {
    /// Reset `surface` and draw every room on `layer` into it.
    pub fn draw_layer(
        &self,
        layer: i32,
        cache: &mut TileCache,
        surface: &mut PageSurface,
    ) -> DrawStats {
        surface.reset(self.geometry, self.config.background, self.background_texture);

        let grid = self.textures.flag_of(GRID_TILE);
        let edge_flags = EdgeFlags::from_textures(self.textures);
        let mut unknown: FxHashSet<&str> = FxHashSet::default();
        let mut stats = DrawStats::default();

        for room in self.layout.rooms().values().filter(|r| r.layer == layer) {
            let state = self.states.and_then(|s| s.room(&room.uid));
            let doors = self
                .door_positions
                .get(&room.uid)
                .map_or(&[][..], Vec::as_slice);
            let resolver = EdgeResolver::new(self.config.door_draw_mode, doors);

            for (row, column, cell) in room.template.cells() {
                let visibility = CellVisibility::of(state, row, column);
                let color = match visibility {
                    CellVisibility::Hidden => {
                        stats.cells_hidden += 1;
                        continue;
                    }
                    CellVisibility::Dimmed => {
                        stats.cells_dimmed += 1;
                        self.config.placeholder_color
                    }
                    CellVisibility::Full => room.color,
                };
                let revealed = visibility == CellVisibility::Full;

                let mut flags = grid;
                for edge in resolver.resolve_cell(&room.template, row, column, cell, revealed) {
                    flags |= edge_flags.flag(edge);
                }
                if revealed {
                    for name in &cell.features {
                        let flag = self.textures.flag_of(name);
                        if flag.is_empty() {
                            if unknown.insert(name.as_str()) {
                                warn!(
                                    feature = %name,
                                    room = %room.uid,
                                    "unregistered feature tile"
                                );
                            }
                            continue;
                        }
                        if !flags.contains(flag) {
                            stats.features_drawn += 1;
                        }
                        flags |= flag;
                    }
                }

                let (x, y) = self.geometry.cell_position(room, row, column);
                let id = cache.tile_for(self.textures, flags, color);
                surface.put(self.geometry, cache, x, y, id);
                stats.cells_drawn += 1;
            }
        }

        trace!(
            layer,
            drawn = stats.cells_drawn,
            dimmed = stats.cells_dimmed,
            hidden = stats.cells_hidden,
            features = stats.features_drawn,
            cached_tiles = cache.len(),
            "layer drawn"
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::SurfaceKind;
    use crate::core::TileFlags;
    use crate::surface::TileGrid;
    use crate::types::{
        Bounds, Cell, Direction, DoorConnection, Padding, Rgba, Room, RoomTemplate,
    };

    const COLOR: Rgba = Rgba::opaque(70, 110, 170);

    struct Fixture {
        layout: Layout,
        doors: HashMap<Uid, Vec<DoorPosition>>,
        geometry: PageGeometry,
        config: MapConfig,
        textures: TileTextures,
    }

    impl Fixture {
        fn new(layout: Layout) -> Self {
            let config = MapConfig::default()
                .with_tile_size(4, 4)
                .with_surface(SurfaceKind::TileGrid)
                .with_features(["Save"]);
            let textures = TileTextures::with_defaults(4, 4, ["Save"]).unwrap();
            let geometry = PageGeometry::new(layout.bounds(), Padding::uniform(0), 4, 4);
            let doors = layout.room_door_positions();
            Self {
                layout,
                doors,
                geometry,
                config,
                textures,
            }
        }

        fn draw(&self, states: Option<&MapState>, layer: i32) -> (TileCache, TileGrid, DrawStats) {
            let pass = MapDrawPass {
                layout: &self.layout,
                states,
                door_positions: &self.doors,
                geometry: &self.geometry,
                config: &self.config,
                textures: &self.textures,
                background_texture: None,
            };
            let mut cache = TileCache::new();
            let mut surface = PageSurface::TileGrid(TileGrid::default());
            let stats = pass.draw_layer(layer, &mut cache, &mut surface);
            let PageSurface::TileGrid(grid) = surface else {
                unreachable!()
            };
            (cache, grid, stats)
        }

        fn flags(&self, names: &[&str]) -> TileFlags {
            self.textures.registry().flags_of(names.iter().copied())
        }
    }

    fn one_cell(cell: Cell) -> Arc<RoomTemplate> {
        let mut t = RoomTemplate::new("one", 1, 1);
        t.set_cell(0, 0, Some(cell));
        Arc::new(t)
    }

    fn connected_pair() -> Layout {
        // Room A's north door connects to room B's south door; B also has an
        // east opening with no connection.
        let a = Uid::new(0, 1, 0);
        let b = Uid::new(1, 2, 0);
        let mut layout = Layout::new("pair");
        layout.add_room(
            Room::new(
                a,
                (1, 0, 0),
                one_cell(Cell::new().with_door(Direction::North).with_feature("Save")),
            )
            .with_color(COLOR),
        );
        layout.add_room(
            Room::new(
                b,
                (0, 0, 0),
                one_cell(
                    Cell::new()
                        .with_door(Direction::South)
                        .with_door(Direction::East),
                ),
            )
            .with_color(COLOR),
        );
        layout.add_connection(DoorConnection {
            from_room: a,
            from_door: DoorPosition::new(0, 0, Direction::North),
            to_room: b,
            to_door: DoorPosition::new(0, 0, Direction::South),
        });
        layout
    }

    #[test]
    fn connected_doors_and_walls_resolve_per_room() {
        let f = Fixture::new(connected_pair());
        let (cache, grid, stats) = f.draw(None, 0);
        assert_eq!(f.geometry.bounds(), Bounds::new(0, 0, 1, 2));
        assert_eq!(stats.cells_drawn, 2);

        let a = cache.key(grid.get(0, 1).unwrap());
        assert_eq!(
            a.flags,
            f.flags(&["Grid", "NorthDoor", "SouthWall", "EastWall", "WestWall", "Save"])
        );
        assert_eq!(a.color, COLOR);

        let b = cache.key(grid.get(0, 0).unwrap());
        assert_eq!(
            b.flags,
            f.flags(&["Grid", "SouthDoor", "NorthWall", "EastWall", "WestWall"])
        );
        assert_eq!(stats.features_drawn, 1);
    }

    #[test]
    fn hidden_cells_leave_no_trace() {
        let layout = connected_pair();
        let mut states = MapState::for_layout(&layout);
        let f = Fixture::new(layout);
        let (cache, grid, stats) = f.draw(Some(&states), 0);
        assert_eq!(grid.occupied().count(), 0);
        assert!(cache.is_empty());
        assert_eq!(stats.cells_hidden, 2);

        // Revealed on the map but not explored: placeholder color, no feature.
        states
            .room_mut(&Uid::new(0, 1, 0))
            .unwrap()
            .set_fully_visible(true);
        let (cache, grid, stats) = f.draw(Some(&states), 0);
        let a = cache.key(grid.get(0, 1).unwrap());
        assert_eq!(a.color, f.config.placeholder_color);
        assert!(!a.flags.contains(f.flags(&["Save"])));
        assert_eq!(stats.cells_dimmed, 1);
        assert_eq!(stats.features_drawn, 0);
        assert!(grid.get(0, 0).is_none());
    }

    #[test]
    fn missing_room_state_draws_in_full() {
        let layout = connected_pair();
        let mut states = MapState::new();
        states.insert(Uid::new(1, 2, 0), RoomState::new(1, 1));
        let f = Fixture::new(layout);
        let (cache, grid, _) = f.draw(Some(&states), 0);
        let a = cache.key(grid.get(0, 1).unwrap());
        assert_eq!(a.color, COLOR);
        assert!(a.flags.contains(f.flags(&["Save"])));
        assert!(grid.get(0, 0).is_none());
    }

    #[test]
    fn identical_cells_share_one_cache_entry() {
        let mut layout = Layout::new("hall");
        let template = Arc::new(RoomTemplate::filled("hall", 1, 5));
        layout.add_room(Room::new(Uid::new(0, 1, 0), (0, 0, 0), template.clone()));
        layout.add_room(Room::new(Uid::new(2, 3, 0), (2, 0, 0), template));
        let f = Fixture::new(layout);
        let (cache, grid, stats) = f.draw(None, 0);
        assert_eq!(stats.cells_drawn, 10);
        // West end, middle and east end.
        assert_eq!(cache.len(), 3);
        assert_eq!(grid.get(1, 0), grid.get(3, 2));
        assert_ne!(grid.get(0, 0), grid.get(1, 0));
    }

    #[test]
    fn only_the_requested_layer_is_drawn() {
        let mut layout = Layout::new("stack");
        let t = one_cell(Cell::new());
        layout.add_room(Room::new(Uid::new(0, 1, 0), (0, 0, 0), t.clone()));
        layout.add_room(Room::new(Uid::new(0, 1, 1), (0, 0, 1), t));
        let f = Fixture::new(layout);
        let (_, _, stats) = f.draw(None, 1);
        assert_eq!(stats.cells_drawn, 1);
        let (_, _, stats) = f.draw(None, 5);
        assert_eq!(stats.cells_drawn, 0);
    }

    #[test]
    fn unknown_features_are_skipped() {
        let mut layout = Layout::new("odd");
        layout.add_room(Room::new(
            Uid::new(0, 1, 0),
            (0, 0, 0),
            one_cell(Cell::new().with_feature("Mystery").with_feature("Mystery")),
        ));
        let f = Fixture::new(layout);
        let (cache, grid, stats) = f.draw(None, 0);
        assert_eq!(stats.features_drawn, 0);
        let key = cache.key(grid.get(0, 0).unwrap());
        assert_eq!(
            key.flags,
            f.flags(&["Grid", "NorthWall", "SouthWall", "EastWall", "WestWall"])
        );
    }
}
