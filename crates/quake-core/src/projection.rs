//! Mapping geographic points onto grid cells.
//!
//! The dataset pipeline only depends on the [`CellProjector`] trait. [`RegularGrid`]
//! is the projector used by the CLI: a fixed-size lon/lat grid anchored at an
//! origin.

use serde::{Deserialize, Serialize};

use crate::cell::{CellId, TargetCell};
use crate::error::{QuakeError, QuakeResult};

/// Result of projecting a point: its cell and that cell's center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellProjection {
    pub cell: CellId,
    pub lon_center: f64,
    pub lat_center: f64,
}

impl From<CellProjection> for TargetCell {
    fn from(p: CellProjection) -> Self {
        TargetCell {
            cell: p.cell,
            lon_cell: p.lon_center,
            lat_cell: p.lat_center,
        }
    }
}

/// Deterministic, side-effect free point-to-cell mapping.
pub trait CellProjector: Send + Sync {
    fn project(&self, lon: f64, lat: f64) -> CellProjection;
}

/// Regular lon/lat grid with square cells of `cell_size_deg` degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegularGrid {
    #[serde(default)]
    pub lon_origin: f64,
    #[serde(default)]
    pub lat_origin: f64,
    #[serde(default = "default_cell_size")]
    pub cell_size_deg: f64,
}

fn default_cell_size() -> f64 {
    0.5
}

impl Default for RegularGrid {
    fn default() -> Self {
        Self {
            lon_origin: 0.0,
            lat_origin: 0.0,
            cell_size_deg: default_cell_size(),
        }
    }
}

impl RegularGrid {
    pub fn new(lon_origin: f64, lat_origin: f64, cell_size_deg: f64) -> QuakeResult<Self> {
        let grid = Self {
            lon_origin,
            lat_origin,
            cell_size_deg,
        };
        grid.validate()?;
        Ok(grid)
    }

    pub fn validate(&self) -> QuakeResult<()> {
        if !(self.cell_size_deg.is_finite() && self.cell_size_deg > 0.0) {
            return Err(QuakeError::Validation(format!(
                "grid cell_size_deg must be a positive number, got {}",
                self.cell_size_deg
            )));
        }
        if !self.lon_origin.is_finite() || !self.lat_origin.is_finite() {
            return Err(QuakeError::Validation(
                "grid origin must be finite".to_string(),
            ));
        }
        Ok(())
    }

    fn axis_index(&self, value: f64, origin: f64) -> i32 {
        ((value - origin) / self.cell_size_deg).floor() as i32
    }

    fn axis_center(&self, index: i32, origin: f64) -> f64 {
        origin + (index as f64 + 0.5) * self.cell_size_deg
    }
}

impl CellProjector for RegularGrid {
    fn project(&self, lon: f64, lat: f64) -> CellProjection {
        let x = self.axis_index(lon, self.lon_origin);
        let y = self.axis_index(lat, self.lat_origin);
        CellProjection {
            cell: CellId::new(x, y),
            lon_center: self.axis_center(x, self.lon_origin),
            lat_center: self.axis_center(y, self.lat_origin),
        }
    }
}
