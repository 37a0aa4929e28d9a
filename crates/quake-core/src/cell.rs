use serde::{Deserialize, Serialize};

/// Integer coordinates of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId {
    pub x: i32,
    pub y: i32,
}

impl CellId {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        CellId { x, y }
    }

    /// Cells within `radius` of this one.
    ///
    /// Radius 0 is the cell itself. For `radius > 0` the block spans
    /// `[x - radius, x + radius)` by `[y - radius, y + radius)`, so the upper
    /// bound is excluded and each axis holds `2 * radius` cells.
    ///
    /// Bounds saturate at the `i32` limits instead of wrapping.
    pub fn neighborhood(self, radius: u32) -> Neighborhood {
        let r = i32::try_from(radius).unwrap_or(i32::MAX);
        if r == 0 {
            Neighborhood {
                x_range: self.x..self.x.saturating_add(1),
                y_range: self.y..self.y.saturating_add(1),
            }
        } else {
            Neighborhood {
                x_range: self.x.saturating_sub(r)..self.x.saturating_add(r),
                y_range: self.y.saturating_sub(r)..self.y.saturating_add(r),
            }
        }
    }
}

impl std::fmt::Display for CellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Rectangular block of cells produced by [`CellId::neighborhood`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighborhood {
    pub x_range: std::ops::Range<i32>,
    pub y_range: std::ops::Range<i32>,
}

impl Neighborhood {
    pub fn contains(&self, cell: CellId) -> bool {
        self.x_range.contains(&cell.x) && self.y_range.contains(&cell.y)
    }

    pub fn len(&self) -> usize {
        self.x_range.len().saturating_mul(self.y_range.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cells(&self) -> impl Iterator<Item = CellId> + '_ {
        self.x_range
            .clone()
            .flat_map(move |x| self.y_range.clone().map(move |y| CellId::new(x, y)))
    }
}

/// A cell selected for sampling, together with its canonical center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetCell {
    pub cell: CellId,
    pub lon_cell: f64,
    pub lat_cell: f64,
}
