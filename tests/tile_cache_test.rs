//! Integration tests for tile memoization across whole draw passes

use std::collections::HashSet;
use std::sync::Arc;

use dungeon_map::core::{Raster, TileFlags, TileTextures};
use dungeon_map::engine::{MapConfig, PageManager, SurfaceKind, TileKey};
use dungeon_map::types::{
    Cell, Direction, DoorConnection, DoorPosition, Layout, Rgba, Room, RoomTemplate, Uid,
};

fn tile_grid_manager(features: &[&str]) -> PageManager {
    let config = MapConfig::default()
        .with_tile_size(8, 8)
        .with_surface(SurfaceKind::TileGrid)
        .with_features(features.iter().copied());
    PageManager::new(config).unwrap()
}

fn one_cell(cell: Cell) -> Arc<RoomTemplate> {
    let mut t = RoomTemplate::new("one", 1, 1);
    t.set_cell(0, 0, Some(cell));
    Arc::new(t)
}

fn flag_names(textures: &TileTextures, flags: TileFlags) -> Vec<String> {
    flags
        .iter()
        .filter_map(|f| textures.registry().name_of(f))
        .map(str::to_string)
        .collect()
}

/// Keys of every occupied tile on every page, in grid order.
fn drawn_keys(pages: &PageManager) -> Vec<TileKey> {
    pages
        .pages()
        .iter()
        .filter_map(|p| p.surface().as_tile_grid())
        .flat_map(|g| g.occupied().map(|(_, _, id)| pages.cache().key(id)))
        .collect()
}

#[test]
fn test_north_door_and_walled_cell_flags() {
    // Room A: one cell with a north door connected to room B's south door.
    // Room C: a plain cell with no neighbors.
    let a = Uid::new(0, 1, 0);
    let b = Uid::new(1, 2, 0);
    let c = Uid::new(5, 6, 0);
    let color = Rgba::opaque(200, 40, 40);

    let mut layout = Layout::new("example");
    let north = one_cell(Cell::new().with_door(Direction::North));
    layout.add_room(Room::new(a, (1, 0, 0), north).with_color(color));
    layout.add_room(Room::new(b, (0, 0, 0), one_cell(Cell::new().with_door(Direction::South))));
    layout.add_room(Room::new(c, (0, 4, 0), one_cell(Cell::new())).with_color(color));
    layout.add_connection(DoorConnection {
        from_room: a,
        from_door: DoorPosition::new(0, 0, Direction::North),
        to_room: b,
        to_door: DoorPosition::new(0, 0, Direction::South),
    });

    let mut pages = tile_grid_manager(&["Save"]);
    pages.bind(Arc::new(layout), None);
    let names = |flags| flag_names(pages.textures(), flags);

    let grid = pages.page(0).unwrap().surface().as_tile_grid().unwrap();
    // Padding of one cell: room A sits at grid (1, 2), room C at (5, 1).
    let key_a = pages.cache().key(grid.get(1, 2).unwrap());
    assert_eq!(key_a.color, color);
    let a_names = names(key_a.flags);
    assert!(a_names.iter().any(|n| n == "Grid"));
    assert!(a_names.iter().any(|n| n == "NorthDoor"));
    assert!(!a_names.iter().any(|n| n == "NorthWall"));

    let key_c = pages.cache().key(grid.get(5, 1).unwrap());
    assert_eq!(
        names(key_c.flags),
        vec!["Grid", "NorthWall", "SouthWall", "EastWall", "WestWall"]
    );
}

#[test]
fn test_identical_cells_share_handles_across_pages() {
    // The same template on three layers, all with the default room color.
    let template = Arc::new(RoomTemplate::filled("block", 3, 4));
    let mut layout = Layout::new("tower");
    for z in 0..3 {
        layout.add_room(Room::new(Uid::new(z, z + 1, z), (0, 0, z), template.clone()));
    }

    let mut pages = tile_grid_manager(&[]);
    let stats = pages.bind(Arc::new(layout), None);
    assert_eq!(stats.cells_drawn, 36);

    let keys = drawn_keys(&pages);
    let distinct: HashSet<TileKey> = keys.iter().copied().collect();
    // Corners (4), edges (4) and interior (1).
    assert_eq!(distinct.len(), 9);
    assert_eq!(pages.cache().len(), distinct.len());

    let first = pages.page_at(0).surface().as_tile_grid().unwrap();
    let last = pages.page_at(2).surface().as_tile_grid().unwrap();
    assert_eq!(first, last, "same cells must reuse the same handles");
}

#[test]
fn test_cache_grows_at_most_once_per_distinct_key() {
    let mut template = RoomTemplate::new("mixed", 2, 2);
    template.set_cell(0, 0, Some(Cell::new().with_feature("Save")));
    template.set_cell(1, 1, Some(Cell::new().with_feature("Save")));
    let template = Arc::new(template);

    let mut layout = Layout::new("mixed");
    for i in 0..4 {
        let color = if i % 2 == 0 {
            Rgba::opaque(10, 10, 10)
        } else {
            Rgba::opaque(90, 90, 90)
        };
        let room = Room::new(Uid::new(i, i, 0), (0, i * 3, 0), template.clone());
        layout.add_room(room.with_color(color));
    }

    let mut pages = tile_grid_manager(&["Save"]);
    pages.bind(Arc::new(layout), None);
    let keys = drawn_keys(&pages);
    let distinct: HashSet<TileKey> = keys.iter().copied().collect();
    assert_eq!(keys.len(), 8);
    // Every cell is isolated, so both cells of a room share one key per color.
    assert_eq!(distinct.len(), 2);
    assert_eq!(pages.cache().len(), 2);
}

#[test]
fn test_new_texture_rebuilds_cache_on_redraw() {
    let mut layout = Layout::new("single");
    let save = one_cell(Cell::new().with_feature("Save"));
    layout.add_room(Room::new(Uid::new(0, 1, 0), (0, 0, 0), save));

    let mut pages = tile_grid_manager(&["Save"]);
    pages.bind(Arc::new(layout), None);
    let before = drawn_keys(&pages);

    let replacement = TileTextures::with_defaults(8, 8, ["Save"]).unwrap();
    let save = replacement.texture(replacement.flag_of("EastWall")).unwrap().clone();
    pages.set_texture("Save", save).unwrap();
    assert!(pages.cache().is_empty());

    pages.draw_all();
    // Same flag set and color, but composed from the new image.
    assert_eq!(drawn_keys(&pages), before);
    assert_eq!(pages.cache().len(), 1);
}

#[test]
fn test_texture_change_leaves_no_stale_handles() {
    let template = Arc::new(RoomTemplate::filled("floor", 2, 2));
    let mut layout = Layout::new("two floors");
    layout.add_room(Room::new(Uid::new(0, 1, 0), (0, 0, 0), template.clone()));
    layout.add_room(Room::new(Uid::new(1, 2, 1), (0, 0, 1), template));

    let mut pages = tile_grid_manager(&["Save"]);
    pages.bind(Arc::new(layout), None);
    let upper = pages.page_raster(1);

    pages.set_texture("Grid", Raster::new(8, 8)).unwrap();
    // Nothing on any page points into the emptied cache.
    assert!(drawn_keys(&pages).is_empty());
    let background = pages.config().background;
    for index in 0..pages.len() {
        assert!(pages.page_raster(index).pixels().iter().all(|p| *p == background));
    }

    // Refill the cache from one page only; the other stays empty.
    pages.draw_layer(0).unwrap();
    let lower = pages.page(0).unwrap().surface().as_tile_grid().unwrap();
    assert_eq!(lower.occupied().count(), 4);
    assert!(pages.page_raster(1).pixels().iter().all(|p| *p == background));
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(pages.save_images(dir.path().join("map.png")).unwrap().len(), 2);

    pages.draw_all();
    // The grid lines are gone now that their texture is blank.
    assert_ne!(pages.page_raster(1), upper);
}
