use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dungeon_map::core::TileTextures;
use dungeon_map::engine::{MapConfig, PageManager, SurfaceKind, TileCache};
use dungeon_map::types::{Cell, Direction, Layout, Rgba, Room, RoomTemplate, Uid};

/// An 8x8 grid of 6x6 rooms on four layers.
fn big_layout() -> Layout {
    let mut template = RoomTemplate::filled("chamber", 6, 6);
    template.set_cell(0, 3, Some(Cell::new().with_door(Direction::North)));
    template.set_cell(2, 2, Some(Cell::new().with_feature("Save")));
    let template = Arc::new(template);

    let mut layout = Layout::new("bench");
    for z in 0..4 {
        for r in 0..8 {
            for c in 0..8 {
                let shade = (r * 8 + c) as u8;
                layout.add_room(
                    Room::new(Uid::new(r, c, z), (r * 6, c * 6, z), template.clone())
                        .with_color(Rgba::opaque(shade, 80, 120)),
                );
            }
        }
    }
    layout
}

fn bench_bind(c: &mut Criterion) {
    let layout = Arc::new(big_layout());
    let surfaces = [
        ("bind_raster", SurfaceKind::Raster),
        ("bind_tile_grid", SurfaceKind::TileGrid),
    ];
    for (name, surface) in surfaces {
        let config = MapConfig::default()
            .with_surface(surface)
            .with_features(["Save"]);
        let mut pages = PageManager::new(config).unwrap();
        c.bench_function(name, |b| {
            b.iter(|| {
                pages.bind(black_box(layout.clone()), None);
            })
        });
    }
}

fn bench_redraw_layer(c: &mut Criterion) {
    let config = MapConfig::default().with_features(["Save"]);
    let mut pages = PageManager::new(config).unwrap();
    pages.bind(Arc::new(big_layout()), None);

    c.bench_function("redraw_one_layer", |b| {
        b.iter(|| {
            pages.draw_layer(black_box(2));
        })
    });
}

fn bench_tile_lookup(c: &mut Criterion) {
    let textures = TileTextures::with_defaults(16, 16, ["Save"]).unwrap();
    let flags = textures.flag_of("Grid") | textures.flag_of("NorthWall") | textures.flag_of("Save");
    let mut cache = TileCache::new();
    cache.tile_for(&textures, flags, Rgba::WHITE);

    c.bench_function("tile_cache_hit", |b| {
        b.iter(|| {
            cache.tile_for(&textures, black_box(flags), black_box(Rgba::WHITE));
        })
    });
}

criterion_group!(benches, bench_bind, bench_redraw_layer, bench_tile_lookup);
criterion_main!(benches);
