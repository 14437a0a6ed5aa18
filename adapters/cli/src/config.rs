//! Optional TOML configuration for the command-line adapter.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use serde::Deserialize;
use terrain_route_core::{validate_grid_size, DEFAULT_GRID_SIZE};
use terrain_route_rendering::DEFAULT_REVEAL_CADENCE;

/// File picked up from the working directory when no `--config` is given.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "terrain-route.toml";

/// Settings read from `terrain-route.toml`. Every key is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RouteConfig {
    /// Grid defaults.
    pub(crate) grid: GridConfig,
    /// Path reveal timing.
    pub(crate) animation: AnimationConfig,
    /// Output preferences.
    pub(crate) render: RenderConfig,
}

/// Grid defaults.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GridConfig {
    /// Edge length used for new maps and for documents without a size.
    pub(crate) default_size: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_GRID_SIZE,
        }
    }
}

/// Path reveal timing.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct AnimationConfig {
    /// Milliseconds between two revealed path cells.
    pub(crate) cadence_ms: u64,
}

impl AnimationConfig {
    /// Cadence as a duration.
    #[must_use]
    pub(crate) fn cadence(&self) -> Duration {
        Duration::from_millis(self.cadence_ms)
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            cadence_ms: DEFAULT_REVEAL_CADENCE.as_millis() as u64,
        }
    }
}

/// Output preferences.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RenderConfig {
    /// Whether `find` draws the grid below the explanation.
    pub(crate) show_grid: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { show_grid: true }
    }
}

impl RouteConfig {
    /// Loads the explicit configuration file, or the default file when it exists.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        Self::parse(&text)
            .with_context(|| format!("invalid configuration {}", path.display()))
    }

    /// Parses and validates configuration text.
    pub(crate) fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        let _ = validate_grid_size(config.grid.default_size)?;
        Ok(config)
    }
}
