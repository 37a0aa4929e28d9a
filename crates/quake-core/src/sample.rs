use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cell::TargetCell;
use crate::features::{FeatureColumn, FeatureKind, GroupValues};

/// One (cell, date) row of the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub cell: TargetCell,
    pub date: NaiveDate,
    pub horizon_min: NaiveDate,
    pub horizon_max: NaiveDate,
    pub target: bool,
    /// One entry per feature group, in [`crate::FeatureSchema::groups`] order.
    pub groups: Vec<GroupValues>,
}

impl Sample {
    /// Fresh sample with label 0 and all features 0.0.
    pub fn new(
        cell: TargetCell,
        date: NaiveDate,
        horizon_min: NaiveDate,
        horizon_max: NaiveDate,
        num_groups: usize,
    ) -> Self {
        Self {
            cell,
            date,
            horizon_min,
            horizon_max,
            target: false,
            groups: vec![GroupValues::default(); num_groups],
        }
    }

    pub fn feature(&self, kind: FeatureKind, group_index: usize) -> f64 {
        self.groups[group_index].get(kind)
    }

    pub fn column_value(&self, column: &FeatureColumn) -> f64 {
        self.feature(column.kind, column.group_index)
    }

    pub fn target_value(&self) -> i32 {
        i32::from(self.target)
    }
}
