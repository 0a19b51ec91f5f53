//! Layout data model: rooms, templates, cells and door connections.
//!
//! A [`Layout`] is produced by the layout generator and is immutable once
//! generation completes. The renderer only reads it.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Direction, Directions, Rgba, Uid, DEFAULT_ROOM_COLOR};

/// One grid square of a room template.
///
/// An absent cell (`None` in the template) has no floor. A present cell may
/// declare door openings and carry named features such as save points.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub doors: Directions,
    #[serde(default)]
    pub features: Vec<String>,
}

impl Cell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_door(mut self, direction: Direction) -> Self {
        self.doors.insert(direction);
        self
    }

    pub fn with_feature(mut self, name: impl Into<String>) -> Self {
        self.features.push(name.into());
        self
    }

    pub fn has_door(&self, direction: Direction) -> bool {
        self.doors.contains(direction)
    }
}

/// A fixed-size 2D grid of optional cells, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TemplateData", into = "TemplateData")]
pub struct RoomTemplate {
    pub name: String,
    rows: u32,
    columns: u32,
    cells: Vec<Option<Cell>>,
}

#[derive(Serialize, Deserialize)]
struct TemplateData {
    #[serde(default)]
    name: String,
    rows: u32,
    columns: u32,
    cells: Vec<Option<Cell>>,
}

impl TryFrom<TemplateData> for RoomTemplate {
    type Error = String;

    fn try_from(value: TemplateData) -> Result<Self, Self::Error> {
        let expected = (value.rows as usize) * (value.columns as usize);
        if value.cells.len() != expected {
            return Err(format!(
                "template `{}` is {}x{} but has {} cells",
                value.name,
                value.rows,
                value.columns,
                value.cells.len()
            ));
        }
        Ok(Self {
            name: value.name,
            rows: value.rows,
            columns: value.columns,
            cells: value.cells,
        })
    }
}

impl From<RoomTemplate> for TemplateData {
    fn from(value: RoomTemplate) -> Self {
        Self {
            name: value.name,
            rows: value.rows,
            columns: value.columns,
            cells: value.cells,
        }
    }
}

impl RoomTemplate {
    /// Create a template with every cell empty.
    pub fn new(name: impl Into<String>, rows: u32, columns: u32) -> Self {
        Self {
            name: name.into(),
            rows,
            columns,
            cells: vec![None; (rows as usize) * (columns as usize)],
        }
    }

    /// Create a template with every cell present and plain.
    pub fn filled(name: impl Into<String>, rows: u32, columns: u32) -> Self {
        let mut template = Self::new(name, rows, columns);
        template.cells.fill(Some(Cell::new()));
        template
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    #[inline(always)]
    fn index(&self, row: i32, column: i32) -> Option<usize> {
        if row < 0 || column < 0 || row >= self.rows as i32 || column >= self.columns as i32 {
            return None;
        }
        Some((row as usize) * (self.columns as usize) + (column as usize))
    }

    /// Cell at `(row, column)`; `None` when off-grid or empty.
    pub fn cell(&self, row: i32, column: i32) -> Option<&Cell> {
        self.index(row, column)
            .and_then(|i| self.cells[i].as_ref())
    }

    /// Replace the cell at `(row, column)`.
    ///
    /// Panics when the position is outside the template.
    pub fn set_cell(&mut self, row: u32, column: u32, cell: Option<Cell>) {
        assert!(
            row < self.rows && column < self.columns,
            "cell ({row}, {column}) outside {}x{} template",
            self.rows,
            self.columns
        );
        let i = (row as usize) * (self.columns as usize) + (column as usize);
        self.cells[i] = cell;
    }

    /// Iterate the present cells as `(row, column, cell)`.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, &Cell)> + '_ {
        let columns = self.columns as usize;
        self.cells.iter().enumerate().filter_map(move |(i, c)| {
            c.as_ref()
                .map(|cell| ((i / columns) as u32, (i % columns) as u32, cell))
        })
    }
}

/// A room instance placed on the layout lattice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub uid: Uid,
    pub row: i32,
    pub column: i32,
    pub layer: i32,
    #[serde(default = "default_room_color")]
    pub color: Rgba,
    pub template: Arc<RoomTemplate>,
}

fn default_room_color() -> Rgba {
    DEFAULT_ROOM_COLOR
}

impl Room {
    pub fn new(uid: Uid, position: (i32, i32, i32), template: Arc<RoomTemplate>) -> Self {
        Self {
            uid,
            row: position.0,
            column: position.1,
            layer: position.2,
            color: DEFAULT_ROOM_COLOR,
            template,
        }
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }
}

/// A door opening at a local cell position and direction of one room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DoorPosition {
    pub row: u32,
    pub column: u32,
    pub direction: Direction,
}

impl DoorPosition {
    pub const fn new(row: u32, column: u32, direction: Direction) -> Self {
        Self {
            row,
            column,
            direction,
        }
    }

    /// True when this door sits at the given local cell and faces `direction`.
    pub fn matches(&self, row: u32, column: u32, direction: Direction) -> bool {
        self.row == row && self.column == column && self.direction == direction
    }
}

/// A realized connection between a door of one room and a door of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DoorConnection {
    pub from_room: Uid,
    pub from_door: DoorPosition,
    pub to_room: Uid,
    pub to_door: DoorPosition,
}

/// Axis-aligned rectangle in lattice cells.
///
/// `x` is the minimum column, `y` the minimum row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        let span = |lo: i32, hi: i64| u32::try_from(hi - lo as i64).unwrap_or(u32::MAX);
        Bounds::new(x0, y0, span(x0, x1), span(y0, y1))
    }

    /// One past the last column, widened so it cannot overflow.
    pub const fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// One past the last row, widened so it cannot overflow.
    pub const fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }
}

/// A generated layout: rooms keyed by id plus their door connections.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "LayoutData", into = "LayoutData")]
pub struct Layout {
    pub name: String,
    rooms: BTreeMap<Uid, Room>,
    connections: Vec<DoorConnection>,
}

/// Serialized form: rooms as a list, since JSON keys must be strings.
#[derive(Serialize, Deserialize)]
struct LayoutData {
    #[serde(default)]
    name: String,
    rooms: Vec<Room>,
    #[serde(default)]
    connections: Vec<DoorConnection>,
}

impl From<LayoutData> for Layout {
    fn from(value: LayoutData) -> Self {
        let mut layout = Layout::new(value.name);
        for room in value.rooms {
            layout.add_room(room);
        }
        layout.connections = value.connections;
        layout
    }
}

impl From<Layout> for LayoutData {
    fn from(value: Layout) -> Self {
        Self {
            name: value.name,
            rooms: value.rooms.into_values().collect(),
            connections: value.connections,
        }
    }
}

impl Layout {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rooms: BTreeMap::new(),
            connections: Vec::new(),
        }
    }

    /// Insert a room, replacing any room with the same id.
    pub fn add_room(&mut self, room: Room) {
        self.rooms.insert(room.uid, room);
    }

    pub fn add_connection(&mut self, connection: DoorConnection) {
        self.connections.push(connection);
    }

    /// Rooms in id order.
    pub fn rooms(&self) -> &BTreeMap<Uid, Room> {
        &self.rooms
    }

    pub fn room(&self, uid: &Uid) -> Option<&Room> {
        self.rooms.get(uid)
    }

    pub fn connections(&self) -> &[DoorConnection] {
        &self.connections
    }

    /// Bounding rectangle of every room on every layer, in cells.
    pub fn bounds(&self) -> Bounds {
        self.rooms.values().fold(Bounds::default(), |acc, room| {
            let rect = Bounds::new(
                room.column,
                room.row,
                room.template.columns(),
                room.template.rows(),
            );
            acc.union(&rect)
        })
    }

    /// Distinct layer coordinates, ascending.
    pub fn layers(&self) -> Vec<i32> {
        let set: BTreeSet<i32> = self.rooms.values().map(|r| r.layer).collect();
        set.into_iter().collect()
    }

    /// Door positions that take part in a realized connection, per room.
    pub fn room_door_positions(&self) -> HashMap<Uid, Vec<DoorPosition>> {
        let mut map: HashMap<Uid, Vec<DoorPosition>> = HashMap::new();
        for c in &self.connections {
            map.entry(c.from_room).or_default().push(c.from_door);
            map.entry(c.to_room).or_default().push(c.to_door);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(uid: Uid, pos: (i32, i32, i32), rows: u32, cols: u32) -> Room {
        Room::new(uid, pos, Arc::new(RoomTemplate::filled("t", rows, cols)))
    }

    #[test]
    fn template_cell_lookup_handles_off_grid() {
        let mut t = RoomTemplate::new("t", 2, 3);
        t.set_cell(1, 2, Some(Cell::new().with_feature("Save")));
        assert!(t.cell(1, 2).is_some());
        assert!(t.cell(0, 0).is_none());
        assert!(t.cell(-1, 0).is_none());
        assert!(t.cell(2, 0).is_none());
        assert!(t.cell(0, 3).is_none());
        assert_eq!(t.cells().count(), 1);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn template_set_cell_out_of_range_panics() {
        let mut t = RoomTemplate::new("t", 1, 1);
        t.set_cell(1, 0, None);
    }

    #[test]
    fn bounds_cover_all_layers() {
        let mut layout = Layout::new("l");
        layout.add_room(room(Uid::new(1, 1, 0), (0, 0, 0), 2, 2));
        layout.add_room(room(Uid::new(2, 2, 1), (-3, 5, 1), 1, 4));
        assert_eq!(layout.bounds(), Bounds::new(0, -3, 9, 5));
        assert_eq!(layout.layers(), vec![0, 1]);
    }

    #[test]
    fn bounds_union_near_integer_limits() {
        let high = Bounds::new(i32::MAX - 1, i32::MAX - 2, 4, 8);
        let low = Bounds::new(i32::MIN, 0, 2, 1);
        let u = high.union(&low);
        assert_eq!((u.x, u.y), (i32::MIN, 0));
        assert_eq!(u.width, u32::MAX);
        assert_eq!(u.height, i32::MAX as u32 + 6);
        assert_eq!(high.right(), i32::MAX as i64 + 3);

        let near = Bounds::new(i32::MAX - 3, -5, 3, 2);
        assert_eq!(
            high.union(&near),
            Bounds::new(i32::MAX - 3, -5, 6, i32::MAX as u32 + 11)
        );
    }

    #[test]
    fn empty_layout_has_zero_bounds() {
        let layout = Layout::new("empty");
        assert!(layout.bounds().is_empty());
        assert!(layout.layers().is_empty());
    }

    #[test]
    fn door_positions_collect_both_ends() {
        let a = Uid::new(1, 2, 0);
        let b = Uid::new(2, 3, 0);
        let mut layout = Layout::new("l");
        layout.add_connection(DoorConnection {
            from_room: a,
            from_door: DoorPosition::new(0, 0, Direction::East),
            to_room: b,
            to_door: DoorPosition::new(0, 0, Direction::West),
        });
        let map = layout.room_door_positions();
        assert!(map[&a][0].matches(0, 0, Direction::East));
        assert!(map[&b][0].matches(0, 0, Direction::West));
        assert!(!map[&b][0].matches(0, 0, Direction::East));
    }

    #[test]
    fn layout_json_roundtrip_keeps_rooms_keyed() {
        let mut layout = Layout::new("l");
        layout.add_room(room(Uid::new(1, 1, 0), (0, 0, 0), 1, 1));
        let json = serde_json::to_string(&layout).unwrap();
        let back: Layout = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layout);
        assert!(back.room(&Uid::new(1, 1, 0)).is_some());
    }

    #[test]
    fn template_cell_count_must_match_size() {
        let bad = r#"{ "name": "t", "rows": 2, "columns": 2, "cells": [null, {}] }"#;
        let err = serde_json::from_str::<RoomTemplate>(bad).unwrap_err();
        assert!(err.to_string().contains("has 2 cells"));

        let good = r#"{ "rows": 1, "columns": 2, "cells": [null, { "doors": ["North"] }] }"#;
        let t: RoomTemplate = serde_json::from_str(good).unwrap();
        assert!(t.cell(0, 1).unwrap().has_door(Direction::North));
    }
}
