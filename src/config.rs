//! File-based configuration for the `dungeon-map` binary.
//!
//! A config file is JSON. Every field is optional:
//!
//! ```json
//! {
//!   "map": { "tile_width": 16, "tile_height": 16, "features": ["Save", "Boss"] },
//!   "textures": { "Save": "tiles/save.png", "NorthWall": "tiles/wall_n.png" },
//!   "background_texture": "tiles/rock.png",
//!   "onion": { "depth_scale": 1.5, "depth": 0 }
//! }
//! ```
//!
//! Relative texture paths are resolved against the config file's directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::core::{Gradient, Raster};
use crate::engine::{MapConfig, OnionSkin, PageManager};
use crate::types::{Layout, MapState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnionConfig {
    pub gradient: Gradient,
    pub depth_scale: f32,
    /// Focus depth used when the command line gives none.
    pub depth: Option<f32>,
}

impl Default for OnionConfig {
    fn default() -> Self {
        let skin = OnionSkin::default();
        Self {
            gradient: skin.gradient,
            depth_scale: skin.depth_scale,
            depth: None,
        }
    }
}

impl OnionConfig {
    pub fn skin(&self) -> OnionSkin {
        OnionSkin::new(self.gradient.clone(), self.depth_scale)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub map: MapConfig,
    /// Texture image per tile name; unknown names are registered.
    pub textures: BTreeMap<String, PathBuf>,
    pub background_texture: Option<PathBuf>,
    pub onion: OnionConfig,
}

impl ExportConfig {
    /// Read a config file, resolving relative paths against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config: Self = read_json(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.resolve_paths(base);
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        for p in self.textures.values_mut() {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
        if let Some(p) = &mut self.background_texture {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
    }

    /// A page manager with default textures, overridden by the configured
    /// texture files.
    pub fn build_manager(&self) -> Result<PageManager> {
        let mut pages = PageManager::new(self.map.clone()).context("building tile textures")?;
        for (name, path) in &self.textures {
            let texture = Raster::open(path)
                .with_context(|| format!("loading texture `{name}` from {}", path.display()))?;
            pages
                .set_texture(name, texture)
                .with_context(|| format!("assigning texture `{name}`"))?;
        }
        if let Some(path) = &self.background_texture {
            let texture = Raster::open(path)
                .with_context(|| format!("loading background texture {}", path.display()))?;
            pages.set_background(Some(texture));
        }
        Ok(pages)
    }
}

pub fn load_layout(path: &Path) -> Result<Layout> {
    read_json(path)
}

pub fn load_map_state(path: &Path) -> Result<MapState> {
    read_json(path)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}
