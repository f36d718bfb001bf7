use crate::error::{Error, Result};
use crate::region::ReferencePoint;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default initial clip box margin, as a multiple of the extent of domain and points.
pub const DEFAULT_PADDING: f64 = 10.0;

/// Tuning knobs of the tessellation.
///
/// Every field has a default, so a configuration file only needs to name what it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TessellationConfig {
    /// Grid bins per axis. `None` picks `cbrt(N)` for `N` points.
    pub grid_resolution: Option<usize>,
    /// Initial margin around domain and points, in multiples of their extent. The clip box
    /// grows past it whenever a Voronoi vertex lies outside, so this only trades clipping
    /// work against enlargement rounds.
    pub padding: f64,
    /// Reference point for snapping vertices at infinity.
    pub reference_point: ReferencePoint,
}

impl Default for TessellationConfig {
    fn default() -> Self {
        Self {
            grid_resolution: None,
            padding: DEFAULT_PADDING,
            reference_point: ReferencePoint::default(),
        }
    }
}

impl TessellationConfig {
    /// Reads a JSON configuration file.
    pub fn read(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.padding.is_finite() && self.padding >= 0.0) {
            return Err(Error::InvalidConfig(format!("padding must be non-negative, got {}", self.padding)));
        }
        if self.grid_resolution == Some(0) {
            return Err(Error::InvalidConfig("grid resolution must be at least 1".into()));
        }
        Ok(())
    }
}
