use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Panel configuration: query shape and presentation knobs. Loadable from a
/// JSON file; every field has a default so a partial file is fine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Membership role treated as the group's manager.
    #[serde(default = "default_manager_role")]
    pub manager_role: String,
    /// Results requested per content query; the panel shows the latest item.
    #[serde(default = "default_items_per_query")]
    pub items_per_query: usize,
    /// Measured width of the name container, in pixels.
    #[serde(default = "default_name_width_px")]
    pub name_width_px: u32,
    /// Fixed reserve (icon, size, padding) subtracted from the container
    /// width before truncating the name.
    #[serde(default = "default_name_width_reserve_px")]
    pub name_width_reserve_px: u32,
    /// Approximate glyph width used to turn the pixel budget into characters.
    #[serde(default = "default_glyph_width_px")]
    pub glyph_width_px: u32,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_manager_role() -> String {
    "Manager".to_string()
}
fn default_items_per_query() -> usize {
    1
}
fn default_name_width_px() -> u32 {
    360
}
fn default_name_width_reserve_px() -> u32 {
    80
}
fn default_glyph_width_px() -> u32 {
    7
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manager_role: default_manager_role(),
            items_per_query: default_items_per_query(),
            name_width_px: default_name_width_px(),
            name_width_reserve_px: default_name_width_reserve_px(),
            glyph_width_px: default_glyph_width_px(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Pixel budget left for the content name after the fixed reserve.
    pub fn name_budget_px(&self) -> u32 {
        self.name_width_px.saturating_sub(self.name_width_reserve_px)
    }

    pub fn validate(&self) -> Result<()> {
        if self.manager_role.trim().is_empty() {
            anyhow::bail!("manager_role must not be empty");
        }
        if self.items_per_query == 0 {
            anyhow::bail!("items_per_query must be > 0");
        }
        if self.glyph_width_px == 0 {
            anyhow::bail!("glyph_width_px must be > 0");
        }
        if self.name_width_px <= self.name_width_reserve_px {
            anyhow::bail!("name_width_px must exceed name_width_reserve_px");
        }
        Ok(())
    }
}
