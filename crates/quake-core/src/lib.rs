//! # quake-core: Data model for earthquake forecasting datasets
//!
//! Shared types used by the loader, the aggregation engine and the writer.
//!
//! ## Core Data Structures
//!
//! - [`Event`] / [`EventTable`] - projected catalog events, time-sorted and
//!   filtered by a minimum magnitude at construction
//! - [`CellId`] / [`TargetCell`] - grid cells and the cells selected for sampling
//! - [`Sample`] - one (cell, date) row with its label and feature values
//! - [`FeatureSchema`] - the typed `(feature, depth, radius)` column layout
//! - [`DatasetConfig`] - a resolved, validated preset
//!
//! ## Projection
//!
//! The pipeline consumes cells through the [`CellProjector`] trait. [`RegularGrid`]
//! is a plain lon/lat grid that can be configured from the preset file.
//!
//! ## Modules
//!
//! - [`config`] - preset file model and resolution
//! - [`error`] - [`QuakeError`] and [`QuakeResult`]

pub mod cell;
pub mod config;
pub mod error;
pub mod event;
pub mod features;
pub mod projection;
pub mod sample;

pub use cell::{CellId, Neighborhood, TargetCell};
pub use config::{
    resolve_preset, CatalogColumns, DatasetConfig, LabelHorizon, PresetDefaults, PresetFile,
    PresetSpec, SplitMode,
};
pub use error::{QuakeError, QuakeResult};
pub use event::{Event, EventTable};
pub use features::{
    FeatureColumn, FeatureGroup, FeatureKind, FeatureSchema, GroupValues, MagnitudeStats,
};
pub use projection::{CellProjection, CellProjector, RegularGrid};
pub use sample::Sample;
