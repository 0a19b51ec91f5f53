//! Onion-skin colorizer - fades pages by their distance from a focus depth.
//!
//! For a focus depth `d` and draw-depth scale `s`, the page on layer `z` gets
//!
//! ```text
//! t    = clamp((z - d) / (2s) + 0.5, 0, 1)
//! tint = gradient(t)
//! ```
//!
//! `d` is first clamped to the manager's layer range. With the default
//! gradient, the focus layer sits at `t = 0.5` (opaque white) and layers
//! `s` or more away fade to transparent. A non-positive or NaN `s` collapses
//! the fade to a step: below the focus `t = 0`, above it `t = 1`.
//!
//! The tint is a presentation multiply stored on each page; surfaces and the
//! tile cache are never touched.

use serde::{Deserialize, Serialize};

use crate::core::Gradient;
use crate::pages::PageManager;

/// Gradient position for layer `z` seen from depth `d` with scale `s`.
///
/// ```
/// use dungeon_map_engine::onion::onion_t;
///
/// assert_eq!(onion_t(2.0, 2.0, 1.0), 0.5);
/// assert_eq!(onion_t(3.0, 2.0, 1.0), 1.0);
/// assert_eq!(onion_t(0.0, 2.0, 1.0), 0.0);
/// ```
pub fn onion_t(z: f32, d: f32, s: f32) -> f32 {
    if s == f32::INFINITY {
        return 0.5;
    }
    if s.is_nan() || s <= 0.0 {
        return if z < d {
            0.0
        } else if z > d {
            1.0
        } else {
            0.5
        };
    }
    let t = (z - d) / (2.0 * s) + 0.5;
    if t.is_nan() {
        0.5
    } else {
        t.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnionSkin {
    pub gradient: Gradient,
    /// Layers this far from the focus reach the gradient's ends.
    pub depth_scale: f32,
}

impl Default for OnionSkin {
    fn default() -> Self {
        Self {
            gradient: Gradient::onion_default(),
            depth_scale: 1.0,
        }
    }
}

impl OnionSkin {
    pub fn new(gradient: Gradient, depth_scale: f32) -> Self {
        Self {
            gradient,
            depth_scale,
        }
    }

    /// `depth` clamped to `[min layer, max layer]`; `None` without layers.
    pub fn effective_depth(layers: &[i32], depth: f32) -> Option<f32> {
        let (min, max) = (*layers.first()? as f32, *layers.last()? as f32);
        Some(if depth.is_nan() {
            min
        } else {
            depth.clamp(min, max)
        })
    }

    /// Tint every page of `pages` for focus `depth`.
    ///
    /// Returns the clamped depth actually used, or `None` when there are no
    /// pages.
    pub fn apply(&self, pages: &mut PageManager, depth: f32) -> Option<f32> {
        let d = Self::effective_depth(pages.layers(), depth)?;
        for index in 0..pages.len() {
            let z = pages.page_at(index).layer() as f32;
            let tint = self.gradient.evaluate(onion_t(z, d, self.depth_scale));
            pages.set_page_tint(index, tint);
        }
        Some(d)
    }
}
