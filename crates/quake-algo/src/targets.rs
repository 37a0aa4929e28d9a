use std::collections::HashSet;

use quake_core::{CellProjector, TargetCell};
use quake_io::CatalogRecord;

/// Distinct cells of catalog rows with `class > class_threshold`.
///
/// Rows are projected through `projector` and deduplicated on the cell id; the
/// first row that lands in a cell fixes its position in the output.
pub fn extract_target_cells(
    records: &[CatalogRecord],
    class_threshold: f64,
    projector: &dyn CellProjector,
) -> Vec<TargetCell> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|record| record.class > class_threshold)
        .map(|record| TargetCell::from(projector.project(record.lon, record.lat)))
        .filter(|target| seen.insert(target.cell))
        .collect()
}
