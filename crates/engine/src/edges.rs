//! Cell edge resolution: door, wall, or nothing for each of six directions.
//!
//! The rule, evaluated independently per direction:
//!
//! 1. A door is drawn when the draw mode shows doors in that direction, the
//!    cell declares an opening there, and the room has a realized connection
//!    at that cell and direction.
//! 2. Otherwise a lateral edge with no neighbor cell (off-grid or empty) gets
//!    a wall.
//! 3. Otherwise nothing is drawn; the two cells are open to each other.
//!
//! `Top` and `Bottom` never produce a wall. Vertical connectivity is
//! door-or-nothing, so a dead-end vertical opening simply draws nothing.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::core::{TileFlags, TileTextures};
use crate::types::{Cell, Direction, DoorPosition, RoomTemplate};

/// Which door openings are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorDrawMode {
    /// Every connected door in all six directions.
    #[default]
    AllDoors,
    /// No doors; connected openings fall through to wall/open resolution.
    NoDoors,
    /// Only north/south/east/west doors.
    LateralDoors,
    /// Only top/bottom doors.
    VerticalDoors,
    /// Connected doors, but only on explored (full color) cells.
    RevealedDoors,
}

impl DoorDrawMode {
    /// Whether a door facing `direction` may be drawn on a cell whose
    /// explored state is `revealed`.
    pub fn permits(self, direction: Direction, revealed: bool) -> bool {
        match self {
            DoorDrawMode::AllDoors => true,
            DoorDrawMode::NoDoors => false,
            DoorDrawMode::LateralDoors => !direction.is_vertical(),
            DoorDrawMode::VerticalDoors => direction.is_vertical(),
            DoorDrawMode::RevealedDoors => revealed,
        }
    }
}

/// Resolved content of one cell edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    None,
    Door(Direction),
    Wall(Direction),
}

impl Edge {
    pub fn tile_name(self) -> Option<&'static str> {
        match self {
            Edge::None => None,
            Edge::Door(d) => Some(d.door_tile()),
            Edge::Wall(d) => d.wall_tile(),
        }
    }
}

/// Door and wall flags looked up once per draw pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeFlags {
    door: [TileFlags; 6],
    wall: [TileFlags; 6],
}

impl EdgeFlags {
    pub fn from_textures(textures: &TileTextures) -> Self {
        let mut door = [TileFlags::EMPTY; 6];
        let mut wall = [TileFlags::EMPTY; 6];
        for d in Direction::ALL {
            door[d.index()] = textures.flag_of(d.door_tile());
            if let Some(name) = d.wall_tile() {
                wall[d.index()] = textures.flag_of(name);
            }
        }
        Self { door, wall }
    }

    pub fn flag(&self, edge: Edge) -> TileFlags {
        match edge {
            Edge::None => TileFlags::EMPTY,
            Edge::Door(d) => self.door[d.index()],
            Edge::Wall(d) => self.wall[d.index()],
        }
    }
}

/// Resolves edges for the cells of one room.
#[derive(Debug, Clone, Copy)]
pub struct EdgeResolver<'a> {
    mode: DoorDrawMode,
    doors: &'a [DoorPosition],
}

impl<'a> EdgeResolver<'a> {
    /// `doors` are the room's door positions with a realized connection.
    pub fn new(mode: DoorDrawMode, doors: &'a [DoorPosition]) -> Self {
        Self { mode, doors }
    }

    fn connected(&self, row: u32, column: u32, direction: Direction) -> bool {
        self.doors.iter().any(|d| d.matches(row, column, direction))
    }

    /// Resolve a single edge of the cell at local `(row, column)`.
    ///
    /// `neighbor` is the adjacent cell in `direction`, or `None` when off-grid
    /// or empty.
    pub fn resolve(
        &self,
        cell: &Cell,
        row: u32,
        column: u32,
        neighbor: Option<&Cell>,
        direction: Direction,
        revealed: bool,
    ) -> Edge {
        if self.mode.permits(direction, revealed)
            && cell.has_door(direction)
            && self.connected(row, column, direction)
        {
            return Edge::Door(direction);
        }
        if direction.is_vertical() {
            return Edge::None;
        }
        match neighbor {
            None => Edge::Wall(direction),
            Some(_) => Edge::None,
        }
    }

    /// Resolve all six edges of a template cell, keeping only drawn ones.
    pub fn resolve_cell(
        &self,
        template: &RoomTemplate,
        row: u32,
        column: u32,
        cell: &Cell,
        revealed: bool,
    ) -> ArrayVec<Edge, 6> {
        let mut edges = ArrayVec::new();
        for direction in Direction::ALL {
            let (dr, dc, _) = direction.offset();
            let neighbor = if direction.is_vertical() {
                None
            } else {
                template.cell(row as i32 + dr, column as i32 + dc)
            };
            let edge = self.resolve(cell, row, column, neighbor, direction, revealed);
            if edge != Edge::None {
                edges.push(edge);
            }
        }
        edges
    }
}
