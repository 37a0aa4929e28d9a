//! Dataset presets and their resolution into an explicit [`DatasetConfig`].
//!
//! A preset file holds shared `defaults` plus named `presets`. Each preset names
//! the catalog, the magnitude thresholds and the window step; everything else
//! falls back to the defaults. Resolution validates every field up front so a
//! bad preset aborts before the catalog is read.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{QuakeError, QuakeResult};
use crate::features::FeatureSchema;
use crate::projection::RegularGrid;

pub const DEFAULT_DEPTHS: [u32; 8] = [60, 90, 180, 365, 3 * 365, 5 * 365, 7 * 365, 10 * 365];
pub const DEFAULT_RADII: [u32; 3] = [0, 3, 5];
/// Largest radius whose neighborhood bounds fit in `i32` cell coordinates.
pub const MAX_RADIUS: u32 = i32::MAX as u32;

/// Train or test date-range policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMode {
    /// Dates start `train_warmup_years` after the first event and stop
    /// `train_tail_days` before the last one.
    Train,
    /// Dates cover the trailing `test_window_days` of the catalog.
    Test,
}

impl SplitMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitMode::Train => "train",
            SplitMode::Test => "test",
        }
    }

    /// Presets named like `*_test` are evaluation sets.
    pub fn infer_from_name(name: &str) -> Self {
        if name.contains("test") {
            SplitMode::Test
        } else {
            SplitMode::Train
        }
    }
}

impl std::str::FromStr for SplitMode {
    type Err = QuakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "train" => Ok(SplitMode::Train),
            "test" => Ok(SplitMode::Test),
            other => Err(QuakeError::Config(format!(
                "unknown mode '{other}'; use train or test"
            ))),
        }
    }
}

/// Forward label window in days after the sample date, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelHorizon {
    pub min_days: u32,
    pub max_days: u32,
}

impl Default for LabelHorizon {
    fn default() -> Self {
        Self {
            min_days: 10,
            max_days: 50,
        }
    }
}

/// Column names and delimiter of the source catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogColumns {
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default = "default_time_col")]
    pub time: String,
    #[serde(default = "default_lat_col")]
    pub lat: String,
    #[serde(default = "default_lon_col")]
    pub lon: String,
    #[serde(default = "default_magnitude_col")]
    pub magnitude: String,
    #[serde(default = "default_class_col")]
    pub class: String,
}

fn default_delimiter() -> String {
    " ".to_string()
}
fn default_time_col() -> String {
    "time".to_string()
}
fn default_lat_col() -> String {
    "LAT".to_string()
}
fn default_lon_col() -> String {
    "LONG".to_string()
}
fn default_magnitude_col() -> String {
    "MAG".to_string()
}
fn default_class_col() -> String {
    "Class".to_string()
}

impl Default for CatalogColumns {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            time: default_time_col(),
            lat: default_lat_col(),
            lon: default_lon_col(),
            magnitude: default_magnitude_col(),
            class: default_class_col(),
        }
    }
}

impl CatalogColumns {
    pub fn delimiter_byte(&self) -> QuakeResult<u8> {
        match self.delimiter.as_bytes() {
            [b] => Ok(*b),
            _ if self.delimiter == "\\t" => Ok(b'\t'),
            _ => Err(QuakeError::Validation(format!(
                "catalog delimiter must be a single byte, got '{}'",
                self.delimiter
            ))),
        }
    }
}

/// Shared settings applied to every preset unless the preset overrides them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresetDefaults {
    pub feature_min_magnitude: Option<f64>,
    pub label_horizon: Option<LabelHorizon>,
    pub feature_gap_days: Option<u32>,
    pub depths: Option<Vec<u32>>,
    pub radii: Option<Vec<u32>>,
    pub test_window_days: Option<u32>,
    pub train_tail_days: Option<u32>,
    pub train_warmup_years: Option<u32>,
    pub output_dir: Option<PathBuf>,
    pub grid: Option<RegularGrid>,
    pub catalog: Option<CatalogColumns>,
}

/// A named dataset variant as written in the preset file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetSpec {
    pub source: PathBuf,
    pub min_magnitude: f64,
    pub class_threshold: f64,
    pub window_days_step: u32,
    pub mode: Option<SplitMode>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub feature_min_magnitude: Option<f64>,
    pub depths: Option<Vec<u32>>,
    pub radii: Option<Vec<u32>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresetFile {
    #[serde(default)]
    pub defaults: PresetDefaults,
    #[serde(default)]
    pub presets: BTreeMap<String, PresetSpec>,
}

impl PresetFile {
    pub fn names(&self) -> Vec<&str> {
        self.presets.keys().map(String::as_str).collect()
    }
}

/// Fully resolved, validated configuration for one dataset build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub name: String,
    pub source: PathBuf,
    /// Threshold for the label table.
    pub min_magnitude: f64,
    /// Threshold for the feature table.
    pub feature_min_magnitude: f64,
    /// Catalog rows with `class > class_threshold` define the target cells.
    pub class_threshold: f64,
    pub window_days_step: u32,
    pub mode: SplitMode,
    pub label_horizon: LabelHorizon,
    /// Days excluded right before the sample date from every feature window.
    pub feature_gap_days: u32,
    pub depths: Vec<u32>,
    pub radii: Vec<u32>,
    pub test_window_days: u32,
    pub train_tail_days: u32,
    pub train_warmup_years: u32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub output_dir: PathBuf,
    pub grid: RegularGrid,
    pub catalog: CatalogColumns,
}

impl DatasetConfig {
    pub fn schema(&self) -> FeatureSchema {
        FeatureSchema::new(self.depths.clone(), self.radii.clone())
    }

    /// File name encoding the preset, feature threshold, radii, depths and class threshold.
    pub fn dataset_file_name(&self) -> String {
        let join = |values: &[u32]| {
            values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join("_")
        };
        format!(
            "{}_features_{}_rad{}_depth{}_trs{}.csv",
            self.name,
            self.feature_min_magnitude.to_string().replace('.', "_"),
            join(&self.radii),
            join(&self.depths),
            self.class_threshold
        )
    }

    pub fn default_output_path(&self) -> PathBuf {
        self.output_dir.join(self.dataset_file_name())
    }

    pub fn validate(&self) -> QuakeResult<()> {
        if self.name.trim().is_empty() {
            return Err(QuakeError::Validation("preset name cannot be empty".into()));
        }
        for (label, value) in [
            ("min_magnitude", self.min_magnitude),
            ("feature_min_magnitude", self.feature_min_magnitude),
            ("class_threshold", self.class_threshold),
        ] {
            if !value.is_finite() {
                return Err(QuakeError::Validation(format!(
                    "{label} must be finite, got {value}"
                )));
            }
        }
        if self.window_days_step == 0 {
            return Err(QuakeError::Validation(
                "window_days_step must be positive".into(),
            ));
        }
        if self.label_horizon.min_days > self.label_horizon.max_days {
            return Err(QuakeError::Validation(format!(
                "label horizon min ({}) exceeds max ({})",
                self.label_horizon.min_days, self.label_horizon.max_days
            )));
        }
        if self.depths.is_empty() {
            return Err(QuakeError::Validation("depth list cannot be empty".into()));
        }
        if let Some(depth) = self.depths.iter().find(|d| **d <= self.feature_gap_days) {
            return Err(QuakeError::Validation(format!(
                "depth {depth} must exceed feature_gap_days ({})",
                self.feature_gap_days
            )));
        }
        if self.radii.is_empty() {
            return Err(QuakeError::Validation("radius list cannot be empty".into()));
        }
        if let Some(radius) = self.radii.iter().find(|r| **r > MAX_RADIUS) {
            return Err(QuakeError::Validation(format!(
                "radius {radius} exceeds the maximum of {MAX_RADIUS} cells"
            )));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start >= end {
                return Err(QuakeError::Validation(format!(
                    "start_date {start} must precede end_date {end}"
                )));
            }
        }
        self.grid.validate()?;
        self.catalog.delimiter_byte()?;
        Ok(())
    }
}

/// Resolve `name` against `file`, applying defaults, then validate.
pub fn resolve_preset(file: &PresetFile, name: &str) -> QuakeResult<DatasetConfig> {
    let spec = file.presets.get(name).ok_or_else(|| {
        QuakeError::Config(format!(
            "unknown preset '{}'; available: {}",
            name,
            if file.presets.is_empty() {
                "<none>".to_string()
            } else {
                file.names().join(", ")
            }
        ))
    })?;
    let defaults = &file.defaults;
    let config = DatasetConfig {
        name: name.to_string(),
        source: spec.source.clone(),
        min_magnitude: spec.min_magnitude,
        feature_min_magnitude: spec
            .feature_min_magnitude
            .or(defaults.feature_min_magnitude)
            .unwrap_or(3.5),
        class_threshold: spec.class_threshold,
        window_days_step: spec.window_days_step,
        mode: spec
            .mode
            .unwrap_or_else(|| SplitMode::infer_from_name(name)),
        label_horizon: defaults.label_horizon.unwrap_or_default(),
        feature_gap_days: defaults.feature_gap_days.unwrap_or(1),
        depths: spec
            .depths
            .clone()
            .or_else(|| defaults.depths.clone())
            .unwrap_or_else(|| DEFAULT_DEPTHS.to_vec()),
        radii: spec
            .radii
            .clone()
            .or_else(|| defaults.radii.clone())
            .unwrap_or_else(|| DEFAULT_RADII.to_vec()),
        test_window_days: defaults.test_window_days.unwrap_or(1000),
        train_tail_days: defaults.train_tail_days.unwrap_or(1000),
        train_warmup_years: defaults.train_warmup_years.unwrap_or(5),
        start_date: spec
            .start_date
            .as_deref()
            .map(|s| parse_date(s, "start_date"))
            .transpose()?,
        end_date: spec
            .end_date
            .as_deref()
            .map(|s| parse_date(s, "end_date"))
            .transpose()?,
        output_dir: defaults
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("data/features")),
        grid: defaults.grid.unwrap_or_default(),
        catalog: defaults.catalog.clone().unwrap_or_default(),
    };
    config.validate()?;
    Ok(config)
}

/// Strict `YYYY-MM-DD` parsing; anything else is a configuration error.
pub fn parse_date(value: &str, field: &str) -> QuakeResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|err| {
        QuakeError::Parse(format!("{field} '{value}' is not a YYYY-MM-DD date: {err}"))
    })
}
