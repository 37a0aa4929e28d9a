//! # quake-algo: Sample grid and aggregation engine
//!
//! Turns a loaded catalog into forecasting samples.
//!
//! - [`targets`] - cells of interest (`class > class_threshold`)
//! - [`grid`] - train/test date ranges, evaluation dates, cell × date samples
//! - [`index`] - per-cell time index used by every window query
//! - [`aggregate`] - labels and windowed magnitude statistics, in parallel
//! - [`featurize`] - the full pipeline from a [`quake_core::DatasetConfig`] to a file
//!
//! ```rust,no_run
//! use std::path::Path;
//! use quake_algo::{featurize_dataset, FeaturizeOptions};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = quake_io::load_dataset_config(Path::new("configs/presets.yaml"), "magn_6_withoutaft_test")?;
//!     let out = config.default_output_path();
//!     let summary = featurize_dataset(&config, &config.grid, &out, &FeaturizeOptions::default())?;
//!     println!("{} samples -> {}", summary.total_samples, summary.output.display());
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod featurize;
pub mod grid;
pub mod index;
pub mod targets;

pub use aggregate::{aggregate_samples, compute_sample, AggregationContext};
pub use featurize::{
    compute_dataset, featurize_dataset, plan_samples, FeaturizeOptions, FeaturizeSummary,
    SamplePlan,
};
pub use grid::{build_samples, date_range, evaluation_dates, DateRange};
pub use index::EventIndex;
pub use targets::extract_target_cells;
