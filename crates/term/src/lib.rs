//! Terminal preview of rendered map pages.
//!
//! Pages are sampled into a character framebuffer using half blocks (two
//! pixels per cell) and flushed through crossterm. No widget toolkit is
//! involved; the framebuffer is the whole rendering model.
//!
//! - [`fb`]: framebuffer, cell and color types
//! - [`page_view`]: pure raster-to-framebuffer sampling
//! - [`renderer`]: terminal setup/teardown and full or diffed flushes

pub mod fb;
pub mod page_view;
pub mod renderer;

pub use dungeon_map_core as core;
pub use dungeon_map_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use page_view::{PageView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
