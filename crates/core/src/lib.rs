//! Core rendering primitives - pure, deterministic, and testable
//!
//! This crate holds the leaf algorithms of the map renderer. It has no notion
//! of rooms or pages; it only knows pixels, colors and tile flags.
//!
//! # Module Structure
//!
//! - [`color`]: source-over alpha compositing, interpolation, tinting
//! - [`raster`]: RGBA pixel buffer with fill, border-bleed, tile-repeat and stamp
//! - [`flags`]: 64-bit tile flag sets and the name-to-bit registry
//! - [`textures`]: registry plus per-flag images, with generated defaults
//! - [`gradient`]: piecewise-linear color gradients
//! - [`error`]: configuration and export errors
//!
//! # Example
//!
//! ```
//! use dungeon_map_core::{Raster, TileTextures};
//! use dungeon_map_core::types::Rgba;
//!
//! let textures = TileTextures::with_defaults(16, 16, ["Save"]).unwrap();
//! let wall = textures.flag_of("NorthWall");
//!
//! let mut tile = Raster::filled(16, 16, Rgba::opaque(40, 60, 90));
//! if let Some(texture) = textures.texture(wall) {
//!     tile.stamp(texture, 0, 0);
//! }
//! assert_ne!(tile.get(8, 0), Rgba::opaque(40, 60, 90));
//! ```

pub mod color;
pub mod error;
pub mod flags;
pub mod gradient;
pub mod raster;
pub mod textures;

pub use dungeon_map_types as types;

pub use error::{MapError, Result};
pub use flags::{TileFlagRegistry, TileFlags};
pub use gradient::{Gradient, GradientStop};
pub use raster::Raster;
pub use textures::TileTextures;
