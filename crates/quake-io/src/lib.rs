//! # quake-io: Catalog, preset and dataset I/O
//!
//! Reading the inputs of a dataset build and writing its output table.
//!
//! ## Quick Start: Load a Preset and its Catalog
//!
//! ```rust,no_run
//! use std::path::Path;
//! use quake_io::{event_table, load_catalog, load_dataset_config};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = load_dataset_config(Path::new("configs/presets.yaml"), "magn_6_withoutaft_test")?;
//!     let records = load_catalog(&config.source, &config.catalog)?;
//!     let labels = event_table(&records, &config.grid, config.min_magnitude);
//!     println!("label events: {}", labels.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - delimited catalog reader and grid projection of its rows
//! - [`presets`] - YAML/JSON preset files
//! - [`dataset`] - polars table layout, `;`-separated CSV and optional Parquet output

pub mod catalog;
pub mod dataset;
pub mod presets;

pub use catalog::{event_table, load_catalog, parse_timestamp, CatalogRecord};
pub use dataset::{samples_to_dataframe, write_dataset, KEY_COLUMNS};
pub use presets::{load_dataset_config, load_presets_from_path};
