//! Page geometry: where a room cell lands on a page.
//!
//! Every page of a layout shares one size, derived from the layout-wide
//! bounds (all layers) plus padding, so pages stack pixel-aligned no matter
//! which layer a room sits on.

use crate::types::{Bounds, Padding, Room};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageGeometry {
    bounds: Bounds,
    padding: Padding,
    tile_width: u32,
    tile_height: u32,
}

impl PageGeometry {
    pub fn new(bounds: Bounds, padding: Padding, tile_width: u32, tile_height: u32) -> Self {
        Self {
            bounds,
            padding,
            tile_width,
            tile_height,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    /// Page width in cells.
    pub fn columns(&self) -> u32 {
        self.bounds.width + self.padding.horizontal()
    }

    /// Page height in cells.
    pub fn rows(&self) -> u32 {
        self.bounds.height + self.padding.vertical()
    }

    pub fn pixel_width(&self) -> u32 {
        self.columns() * self.tile_width
    }

    pub fn pixel_height(&self) -> u32 {
        self.rows() * self.tile_height
    }

    /// Grid position `(x, y)` of template cell `(row, column)` of `room`.
    pub fn cell_position(&self, room: &Room, row: u32, column: u32) -> (u32, u32) {
        let x = room.column as i64 - self.bounds.x as i64
            + column as i64
            + self.padding.left as i64;
        let y = room.row as i64 - self.bounds.y as i64 + row as i64 + self.padding.top as i64;
        debug_assert!(
            x >= 0 && y >= 0 && x < self.columns() as i64 && y < self.rows() as i64,
            "cell ({row}, {column}) of {} lands outside the page",
            room.uid
        );
        (x as u32, y as u32)
    }

    /// Top-left pixel of grid position `(x, y)`.
    pub fn pixel_position(&self, x: u32, y: u32) -> (i32, i32) {
        ((x * self.tile_width) as i32, (y * self.tile_height) as i32)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::types::{RoomTemplate, Uid};

    #[test]
    fn size_includes_padding() {
        let g = PageGeometry::new(Bounds::new(-3, 2, 10, 4), Padding::uniform(1), 16, 8);
        assert_eq!((g.columns(), g.rows()), (12, 6));
        assert_eq!((g.pixel_width(), g.pixel_height()), (192, 48));
    }

    #[test]
    fn cell_positions_are_offset_by_bounds_and_padding() {
        let g = PageGeometry::new(Bounds::new(-3, 2, 10, 4), Padding::uniform(1), 16, 8);
        let room = crate::types::Room::new(
            Uid::new(0, 1, 0),
            (2, -3, 0),
            Arc::new(RoomTemplate::filled("r", 2, 2)),
        );
        assert_eq!(g.cell_position(&room, 0, 0), (1, 1));
        assert_eq!(g.cell_position(&room, 1, 1), (2, 2));
        assert_eq!(g.pixel_position(2, 2), (32, 16));
    }
}
