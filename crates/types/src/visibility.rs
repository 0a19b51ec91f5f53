//! Fog-of-war state: which rooms and cells the player has seen.
//!
//! Owned by the game-state system; the renderer only reads it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Layout, Uid};

/// Per-room visibility: a room-wide flag plus one bit per template cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RoomStateData", into = "RoomStateData")]
pub struct RoomState {
    fully_visible: bool,
    rows: u32,
    columns: u32,
    visible_cells: Vec<u64>,
}

/// Serialized form; cell bits are packed 64 per word, row-major.
#[derive(Serialize, Deserialize)]
struct RoomStateData {
    #[serde(default)]
    fully_visible: bool,
    rows: u32,
    columns: u32,
    #[serde(default)]
    visible_cells: Vec<u64>,
}

impl TryFrom<RoomStateData> for RoomState {
    type Error = String;

    fn try_from(value: RoomStateData) -> Result<Self, Self::Error> {
        let mut state = RoomState::new(value.rows, value.columns);
        if value.visible_cells.len() > state.visible_cells.len() {
            return Err(format!(
                "{} visibility words for a {}x{} room",
                value.visible_cells.len(),
                value.rows,
                value.columns
            ));
        }
        state.fully_visible = value.fully_visible;
        state.visible_cells[..value.visible_cells.len()].copy_from_slice(&value.visible_cells);
        Ok(state)
    }
}

impl From<RoomState> for RoomStateData {
    fn from(value: RoomState) -> Self {
        Self {
            fully_visible: value.fully_visible,
            rows: value.rows,
            columns: value.columns,
            visible_cells: value.visible_cells,
        }
    }
}

impl RoomState {
    /// A state with nothing revealed, sized to a `rows x columns` template.
    pub fn new(rows: u32, columns: u32) -> Self {
        let bits = (rows as usize) * (columns as usize);
        Self {
            fully_visible: false,
            rows,
            columns,
            visible_cells: vec![0; bits.div_ceil(64)],
        }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn is_fully_visible(&self) -> bool {
        self.fully_visible
    }

    pub fn set_fully_visible(&mut self, value: bool) {
        self.fully_visible = value;
    }

    #[inline(always)]
    fn bit(&self, row: u32, column: u32) -> (usize, u64) {
        debug_assert!(
            row < self.rows && column < self.columns,
            "cell ({row}, {column}) outside {}x{} room state",
            self.rows,
            self.columns
        );
        let i = (row as usize) * (self.columns as usize) + (column as usize);
        (i / 64, 1u64 << (i % 64))
    }

    /// Whether the cell at `(row, column)` has been explored.
    pub fn is_cell_visible(&self, row: u32, column: u32) -> bool {
        if row >= self.rows || column >= self.columns {
            return false;
        }
        let (word, mask) = self.bit(row, column);
        self.visible_cells[word] & mask != 0
    }

    /// Mark a cell explored (or not). Panics when out of range.
    pub fn set_cell_visible(&mut self, row: u32, column: u32, value: bool) {
        assert!(
            row < self.rows && column < self.columns,
            "cell ({row}, {column}) outside {}x{} room state",
            self.rows,
            self.columns
        );
        let (word, mask) = self.bit(row, column);
        if value {
            self.visible_cells[word] |= mask;
        } else {
            self.visible_cells[word] &= !mask;
        }
    }

    /// Number of explored cells.
    pub fn visible_cell_count(&self) -> u32 {
        self.visible_cells.iter().map(|w| w.count_ones()).sum()
    }
}

/// Visibility for every room of a layout.
///
/// A room without an entry has no fog of war and is drawn in full.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MapState {
    #[serde(with = "room_entries")]
    rooms: HashMap<Uid, RoomState>,
}

impl MapState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A state with one hidden `RoomState` per room of `layout`.
    pub fn for_layout(layout: &Layout) -> Self {
        let rooms = layout
            .rooms()
            .values()
            .map(|r| {
                (
                    r.uid,
                    RoomState::new(r.template.rows(), r.template.columns()),
                )
            })
            .collect();
        Self { rooms }
    }

    pub fn room(&self, uid: &Uid) -> Option<&RoomState> {
        self.rooms.get(uid)
    }

    pub fn room_mut(&mut self, uid: &Uid) -> Option<&mut RoomState> {
        self.rooms.get_mut(uid)
    }

    pub fn insert(&mut self, uid: Uid, state: RoomState) {
        self.rooms.insert(uid, state);
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

mod room_entries {
    use std::collections::HashMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::RoomState;
    use crate::Uid;

    #[derive(Serialize, Deserialize)]
    struct Entry {
        uid: Uid,
        #[serde(flatten)]
        state: RoomState,
    }

    pub(super) fn serialize<S: Serializer>(
        rooms: &HashMap<Uid, RoomState>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        let mut entries: Vec<Entry> = rooms
            .iter()
            .map(|(uid, state)| Entry {
                uid: *uid,
                state: state.clone(),
            })
            .collect();
        entries.sort_by_key(|e| e.uid);
        entries.serialize(s)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<HashMap<Uid, RoomState>, D::Error> {
        let entries = Vec::<Entry>::deserialize(d)?;
        Ok(entries.into_iter().map(|e| (e.uid, e.state)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_hides_everything() {
        let s = RoomState::new(3, 30);
        assert!(!s.is_fully_visible());
        for r in 0..3 {
            for c in 0..30 {
                assert!(!s.is_cell_visible(r, c));
            }
        }
        assert_eq!(s.visible_cell_count(), 0);
    }

    #[test]
    fn cell_bits_span_words() {
        let mut s = RoomState::new(3, 30);
        s.set_cell_visible(2, 29, true);
        s.set_cell_visible(2, 5, true);
        assert!(s.is_cell_visible(2, 29));
        assert!(s.is_cell_visible(2, 5));
        assert!(!s.is_cell_visible(1, 29));
        s.set_cell_visible(2, 5, false);
        assert_eq!(s.visible_cell_count(), 1);
    }

    #[test]
    fn out_of_range_query_is_not_visible() {
        let s = RoomState::new(1, 1);
        assert!(!s.is_cell_visible(5, 5));
    }

    #[test]
    fn map_state_json_roundtrip() {
        let mut m = MapState::new();
        let mut s = RoomState::new(2, 2);
        s.set_fully_visible(true);
        s.set_cell_visible(1, 1, true);
        m.insert(Uid::new(1, 2, 0), s);
        let json = serde_json::to_string(&m).unwrap();
        let back: MapState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn short_bit_lists_are_padded_and_long_ones_rejected() {
        let s: RoomState =
            serde_json::from_str(r#"{ "rows": 10, "columns": 10, "visible_cells": [1] }"#).unwrap();
        assert!(s.is_cell_visible(0, 0));
        assert!(!s.is_cell_visible(9, 9));

        let err = serde_json::from_str::<RoomState>(
            r#"{ "rows": 1, "columns": 1, "visible_cells": [1, 2] }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("visibility words"));
    }
}
