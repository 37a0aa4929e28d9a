//! Typed feature schema.
//!
//! Every feature column is a `(FeatureKind, depth, radius)` triple. The schema is
//! generated once from the configured depth and radius lists; samples store their
//! values group by group and columns are resolved through [`FeatureSchema`] rather
//! than by name.

use serde::{Deserialize, Serialize};

/// Summary statistic computed over the magnitudes of a neighborhood window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    CountEarthquakes,
    MeanMagn,
    MinMagn,
    MaxMagn,
    StdMagn,
}

impl FeatureKind {
    pub const ALL: [FeatureKind; 5] = [
        FeatureKind::CountEarthquakes,
        FeatureKind::MeanMagn,
        FeatureKind::MinMagn,
        FeatureKind::MaxMagn,
        FeatureKind::StdMagn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKind::CountEarthquakes => "count_earthquakes",
            FeatureKind::MeanMagn => "mean_magn",
            FeatureKind::MinMagn => "min_magn",
            FeatureKind::MaxMagn => "max_magn",
            FeatureKind::StdMagn => "std_magn",
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        match self {
            FeatureKind::CountEarthquakes => 0,
            FeatureKind::MeanMagn => 1,
            FeatureKind::MinMagn => 2,
            FeatureKind::MaxMagn => 3,
            FeatureKind::StdMagn => 4,
        }
    }
}

/// One (depth, radius) window: `depth_days` of history over a `radius` neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureGroup {
    pub depth_days: u32,
    pub radius: u32,
}

/// Fully qualified feature column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureColumn {
    pub kind: FeatureKind,
    pub group: FeatureGroup,
    /// Position of `group` in [`FeatureSchema::groups`].
    pub group_index: usize,
}

impl FeatureColumn {
    /// Column header, e.g. `mean_magn_365_rad3`.
    pub fn name(&self) -> String {
        format!(
            "{}_{}_rad{}",
            self.kind.as_str(),
            self.group.depth_days,
            self.group.radius
        )
    }
}

/// The five statistics of one group, indexed by [`FeatureKind::index`].
///
/// All zeros means "no event observed in the window".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupValues(pub [f64; 5]);

impl GroupValues {
    #[inline]
    pub fn get(&self, kind: FeatureKind) -> f64 {
        self.0[kind.index()]
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }
}

/// Statistics over a non-empty set of magnitudes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnitudeStats {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation (n - 1 denominator); NaN when `count == 1`.
    pub std: f64,
}

impl MagnitudeStats {
    /// Returns `None` for an empty slice.
    pub fn from_magnitudes(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let count = values.len();
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in values {
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }
        let mean = sum / count as f64;
        let std = if count < 2 {
            f64::NAN
        } else {
            let ss: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
            (ss / (count - 1) as f64).sqrt()
        };
        Some(Self {
            count,
            mean,
            min,
            max,
            std,
        })
    }

    pub fn to_values(&self) -> GroupValues {
        GroupValues([
            self.count as f64,
            self.mean,
            self.min,
            self.max,
            self.std,
        ])
    }
}

/// Depth × radius product and the column layout derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    depths: Vec<u32>,
    radii: Vec<u32>,
}

impl FeatureSchema {
    pub fn new(depths: Vec<u32>, radii: Vec<u32>) -> Self {
        Self { depths, radii }
    }

    pub fn depths(&self) -> &[u32] {
        &self.depths
    }

    pub fn radii(&self) -> &[u32] {
        &self.radii
    }

    /// Groups in depth-major order; sample values are stored in this order.
    pub fn groups(&self) -> Vec<FeatureGroup> {
        self.depths
            .iter()
            .flat_map(|&depth_days| {
                self.radii
                    .iter()
                    .map(move |&radius| FeatureGroup { depth_days, radius })
            })
            .collect()
    }

    pub fn num_groups(&self) -> usize {
        self.depths.len() * self.radii.len()
    }

    pub fn num_columns(&self) -> usize {
        self.num_groups() * FeatureKind::ALL.len()
    }

    /// Output column order: feature kind, then depth, then radius.
    pub fn columns(&self) -> Vec<FeatureColumn> {
        let mut columns = Vec::with_capacity(self.num_columns());
        for kind in FeatureKind::ALL {
            for (d, &depth_days) in self.depths.iter().enumerate() {
                for (r, &radius) in self.radii.iter().enumerate() {
                    columns.push(FeatureColumn {
                        kind,
                        group: FeatureGroup { depth_days, radius },
                        group_index: d * self.radii.len() + r,
                    });
                }
            }
        }
        columns
    }
}
