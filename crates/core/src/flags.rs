//! Tile flags - one bit per named overlay texture.
//!
//! Feature names are authored content, so the set of flags is assigned at
//! runtime by a [`TileFlagRegistry`] rather than by a compile-time enum. Bits
//! are handed out in first-registration order; the order itself carries no
//! meaning beyond keeping bit assignment stable for a given configuration.
//!
//! # Examples
//!
//! ```
//! use dungeon_map_core::flags::{TileFlagRegistry, TileFlags};
//!
//! let mut registry = TileFlagRegistry::new();
//! let grid = registry.register("Grid").unwrap();
//! let save = registry.register("Save").unwrap();
//! assert_eq!(registry.register("Grid").unwrap(), grid);
//!
//! let set = grid | save;
//! let names: Vec<_> = set.iter().filter_map(|f| registry.name_of(f)).collect();
//! assert_eq!(names, ["Grid", "Save"]);
//!
//! assert_eq!(registry.flag_of("Unknown"), TileFlags::EMPTY);
//! ```

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use rustc_hash::FxHashMap;

use crate::error::{MapError, Result};
use crate::types::MAX_TILE_FLAGS;

/// A set of tile flags packed into a `u64`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct TileFlags(u64);

impl TileFlags {
    pub const EMPTY: TileFlags = TileFlags(0);

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    /// The single-bit flag for bit `index`. Panics when `index >= 64`.
    pub const fn bit(index: usize) -> Self {
        assert!(index < MAX_TILE_FLAGS, "tile flag index out of range");
        Self(1 << index)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: TileFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Bit index of a single-bit flag.
    pub const fn index(self) -> usize {
        self.0.trailing_zeros() as usize
    }

    /// Iterate the set bits, lowest first, as single-bit flags.
    pub fn iter(self) -> FlagIter {
        FlagIter(self.0)
    }
}

impl BitOr for TileFlags {
    type Output = TileFlags;

    fn bitor(self, rhs: Self) -> Self::Output {
        TileFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for TileFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for TileFlags {
    type Output = TileFlags;

    fn bitand(self, rhs: Self) -> Self::Output {
        TileFlags(self.0 & rhs.0)
    }
}

impl fmt::Debug for TileFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TileFlags({:#x})", self.0)
    }
}

impl IntoIterator for TileFlags {
    type Item = TileFlags;
    type IntoIter = FlagIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over set bits, isolating the lowest set bit each step.
#[derive(Debug, Clone)]
pub struct FlagIter(u64);

impl Iterator for FlagIter {
    type Item = TileFlags;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            return None;
        }
        let lowest = self.0 & self.0.wrapping_neg();
        self.0 &= self.0 - 1;
        Some(TileFlags(lowest))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for FlagIter {}

/// Assigns each tile name a unique bit.
#[derive(Debug, Clone, Default)]
pub struct TileFlagRegistry {
    names: Vec<String>,
    lookup: FxHashMap<String, usize>,
}

impl TileFlagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`, returning its flag.
    ///
    /// Registering a known name returns the existing flag without mutating
    /// the registry. Blank names and registering past 64 flags are errors.
    pub fn register(&mut self, name: &str) -> Result<TileFlags> {
        if name.trim().is_empty() {
            return Err(MapError::InvalidFlagName);
        }
        if let Some(&index) = self.lookup.get(name) {
            return Ok(TileFlags::bit(index));
        }
        if self.names.len() >= MAX_TILE_FLAGS {
            return Err(MapError::CapacityExceeded {
                name: name.to_string(),
                max: MAX_TILE_FLAGS,
            });
        }

        let index = self.names.len();
        self.names.push(name.to_string());
        self.lookup.insert(name.to_string(), index);
        Ok(TileFlags::bit(index))
    }

    /// Flag for `name`; empty for unknown or blank names.
    pub fn flag_of(&self, name: &str) -> TileFlags {
        self.lookup
            .get(name)
            .map_or(TileFlags::EMPTY, |&i| TileFlags::bit(i))
    }

    /// Name of a single-bit flag; `None` when unassigned or not a single bit.
    pub fn name_of(&self, flag: TileFlags) -> Option<&str> {
        if flag.len() != 1 {
            return None;
        }
        self.names.get(flag.index()).map(String::as_str)
    }

    /// Combined flags for a list of names, skipping unknown ones.
    pub fn flags_of<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> TileFlags {
        names
            .into_iter()
            .fold(TileFlags::EMPTY, |acc, n| acc | self.flag_of(n))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Registered names in bit order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
