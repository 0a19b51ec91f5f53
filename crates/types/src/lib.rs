//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the map renderer.
//! All types are plain data with no rendering logic, making them usable by the
//! layout generator, the game-state system and the renderer alike.
//!
//! # Coordinates
//!
//! Rooms sit on an integer lattice `(row, column, layer)` measured in cells:
//!
//! - **Row** grows downward (north is row - 1)
//! - **Column** grows to the right (east is column + 1)
//! - **Layer** is the vertical floor coordinate (top is layer + 1)
//!
//! A cell's world position is the room position plus the cell's local
//! `(row, column)` inside the room template.
//!
//! # Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_TILE_WIDTH` | 16 | Pixel width of one cell |
//! | `DEFAULT_TILE_HEIGHT` | 16 | Pixel height of one cell |
//! | `DEFAULT_PADDING` | 1 | Cells of margin around the layout bounds |
//! | `MAX_TILE_FLAGS` | 64 | Width of the tile-flag bitmask |
//!
//! # Examples
//!
//! ```
//! use dungeon_map_types::{Direction, Directions, Rgba};
//!
//! let doors = Directions::from_iter([Direction::North, Direction::Top]);
//! assert!(doors.contains(Direction::North));
//! assert!(!doors.contains(Direction::South));
//!
//! assert_eq!(Direction::North.opposite(), Direction::South);
//! assert!(Direction::Bottom.is_vertical());
//!
//! let c = Rgba::from_hex("#ff8000").unwrap();
//! assert_eq!(c, Rgba::new(255, 128, 0, 255));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod layout;
pub mod visibility;

pub use layout::{Bounds, Cell, DoorConnection, DoorPosition, Layout, Room, RoomTemplate};
pub use visibility::{MapState, RoomState};

/// Default pixel width of a single cell tile.
pub const DEFAULT_TILE_WIDTH: u32 = 16;

/// Default pixel height of a single cell tile.
pub const DEFAULT_TILE_HEIGHT: u32 = 16;

/// Default margin (in cells) around the layout bounding rectangle.
pub const DEFAULT_PADDING: u32 = 1;

/// Maximum number of distinct tile flags (bits in the mask).
pub const MAX_TILE_FLAGS: usize = 64;

/// Page background when nothing else is configured.
pub const DEFAULT_BACKGROUND: Rgba = Rgba::new(0, 0, 0, 0);

/// Color used for cells that are revealed but not yet explored.
pub const DEFAULT_PLACEHOLDER_COLOR: Rgba = Rgba::new(90, 90, 100, 255);

/// Room color used when a layout does not specify one.
pub const DEFAULT_ROOM_COLOR: Rgba = Rgba::new(70, 110, 170, 255);

/// Name of the grid overlay tile.
pub const GRID_TILE: &str = "Grid";

/// The six directions a cell edge can face.
///
/// `North`/`South`/`East`/`West` are lateral and may produce walls or doors.
/// `Top`/`Bottom` connect layers and only ever produce doors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Top,
    Bottom,
}

impl Direction {
    /// All six directions, in tile registration order.
    pub const ALL: [Direction; 6] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::Top,
        Direction::Bottom,
    ];

    /// The four lateral directions.
    pub const LATERAL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Stable index in `0..6`.
    pub const fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
            Direction::Top => 4,
            Direction::Bottom => 5,
        }
    }

    /// `(row, column, layer)` step toward the neighbor in this direction.
    pub const fn offset(self) -> (i32, i32, i32) {
        match self {
            Direction::North => (-1, 0, 0),
            Direction::South => (1, 0, 0),
            Direction::East => (0, 1, 0),
            Direction::West => (0, -1, 0),
            Direction::Top => (0, 0, 1),
            Direction::Bottom => (0, 0, -1),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
            Direction::Top => Direction::Bottom,
            Direction::Bottom => Direction::Top,
        }
    }

    /// True for `Top` and `Bottom`.
    pub const fn is_vertical(self) -> bool {
        matches!(self, Direction::Top | Direction::Bottom)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::South => "South",
            Direction::East => "East",
            Direction::West => "West",
            Direction::Top => "Top",
            Direction::Bottom => "Bottom",
        }
    }

    /// Name of the door tile for this direction (e.g. `NorthDoor`).
    pub const fn door_tile(self) -> &'static str {
        match self {
            Direction::North => "NorthDoor",
            Direction::South => "SouthDoor",
            Direction::East => "EastDoor",
            Direction::West => "WestDoor",
            Direction::Top => "TopDoor",
            Direction::Bottom => "BottomDoor",
        }
    }

    /// Name of the wall tile for this direction, `None` for `Top`/`Bottom`.
    pub const fn wall_tile(self) -> Option<&'static str> {
        match self {
            Direction::North => Some("NorthWall"),
            Direction::South => Some("SouthWall"),
            Direction::East => Some("EastWall"),
            Direction::West => Some("WestWall"),
            Direction::Top | Direction::Bottom => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A compact set of directions (one bit per direction).
///
/// Serialized as a list of direction names so layout files stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Direction>", into = "Vec<Direction>")]
pub struct Directions(u8);

impl Directions {
    pub const NONE: Directions = Directions(0);

    pub const fn contains(self, direction: Direction) -> bool {
        self.0 & (1 << direction.index()) != 0
    }

    pub fn insert(&mut self, direction: Direction) {
        self.0 |= 1 << direction.index();
    }

    pub fn remove(&mut self, direction: Direction) {
        self.0 &= !(1 << direction.index());
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<Direction> for Directions {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut set = Directions::NONE;
        for d in iter {
            set.insert(d);
        }
        set
    }
}

impl From<Vec<Direction>> for Directions {
    fn from(value: Vec<Direction>) -> Self {
        value.into_iter().collect()
    }
}

impl From<Directions> for Vec<Direction> {
    fn from(value: Directions) -> Self {
        value.iter().collect()
    }
}

/// 8-bit straight-alpha RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub const fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    ///
    /// # Examples
    ///
    /// ```
    /// use dungeon_map_types::Rgba;
    ///
    /// assert_eq!(Rgba::from_hex("102030"), Some(Rgba::new(16, 32, 48, 255)));
    /// assert_eq!(Rgba::from_hex("#10203080"), Some(Rgba::new(16, 32, 48, 128)));
    /// assert_eq!(Rgba::from_hex("#xyz"), None);
    /// ```
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(s.get(i..i + 2)?, 16).ok();
        match s.len() {
            6 => Some(Self::opaque(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub const fn from_array(v: [u8; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl TryFrom<String> for Rgba {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgba::from_hex(&value).ok_or_else(|| format!("invalid color: {value:?}"))
    }
}

impl From<Rgba> for String {
    fn from(value: Rgba) -> Self {
        value.to_hex()
    }
}

/// Composite room identifier: two generator node ids plus the layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Uid {
    pub a: i32,
    pub b: i32,
    pub layer: i32,
}

impl Uid {
    pub const fn new(a: i32, b: i32, layer: i32) -> Self {
        Self { a, b, layer }
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uid({}, {}, {})", self.a, self.b, self.layer)
    }
}

/// Margin, in cells, added around the layout bounds on every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Padding {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Padding {
    pub const fn uniform(value: u32) -> Self {
        Self {
            top: value,
            bottom: value,
            left: value,
            right: value,
        }
    }

    pub const fn horizontal(&self) -> u32 {
        self.left + self.right
    }

    pub const fn vertical(&self) -> u32 {
        self.top + self.bottom
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self::uniform(DEFAULT_PADDING)
    }
}
