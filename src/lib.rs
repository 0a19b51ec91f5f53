//! Dungeon map renderer (workspace facade crate).
//!
//! The implementation lives in dedicated crates under `crates/`; this
//! package re-exports them under short names and adds the file-based
//! configuration used by the `dungeon-map` binary.

pub mod config;

pub use dungeon_map_core as core;
pub use dungeon_map_engine as engine;
pub use dungeon_map_term as term;
pub use dungeon_map_types as types;
