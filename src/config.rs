use std::{fs, path::Path};

use serde::Deserialize;

use crate::{
    Result,
    catalog::{Catalog, CatalogEntry},
    graph::Rect,
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// canvas bounds in client space
    pub canvas: CanvasConfig,
    /// projector geometry
    pub layout: LayoutConfig,
    /// placement of programmatically added nodes
    pub palette: PaletteConfig,
    /// simulated deploy settings
    pub deploy: DeployConfig,
    /// id allocation strategy
    pub id_strategy: IdStrategy,
    /// extra node types, layered over the builtin catalog
    pub catalog: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct CanvasConfig {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// assumed node width, edges anchor at its horizontal center
    pub node_width: f64,
    /// assumed node height, outgoing edges anchor at the bottom
    pub node_height: f64,
    /// vertical offset of the bezier control points
    pub curve_offset: f64,
    /// radius of the delete handle drawn at an edge midpoint
    pub handle_radius: f64,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct PaletteConfig {
    /// x of nodes added without a drop point
    pub spawn_x: f64,
    /// nodes added without a drop point stack at `node_count * spawn_row_height`
    pub spawn_row_height: f64,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct DeployConfig {
    /// simulated deploy latency in milliseconds
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    #[default]
    Sequential,
    Random,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: 1200.0,
            height: 800.0,
        }
    }
}

impl CanvasConfig {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 300.0,
            node_height: 50.0,
            curve_offset: 50.0,
            handle_radius: 8.0,
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            spawn_x: 50.0,
            spawn_row_height: 120.0,
        }
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            delay_ms: 3000,
        }
    }
}

impl Config {
    pub fn create<T: AsRef<Path>>(path: T) -> Result<Self> {
        let data = fs::read_to_string(path.as_ref())?;

        Self::load_from_str(data.as_str())
    }

    pub fn load_from_str(toml_str: &str) -> Result<Self> {
        let config = toml::from_str::<Config>(toml_str)?;
        Ok(config)
    }

    /// Builtin catalog with the configured entries layered on top.
    pub fn build_catalog(&self) -> Result<Catalog> {
        let mut catalog = Catalog::builtin();
        for entry in &self.catalog {
            catalog = catalog.with_entry(entry.clone())?;
        }
        Ok(catalog)
    }
}
