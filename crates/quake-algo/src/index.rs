//! Per-cell time index over an [`EventTable`].
//!
//! Every aggregation query is "events in these cells within this time interval".
//! Grouping the events by cell and keeping each group sorted by time turns the
//! interval filter into two binary searches per neighborhood cell.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use quake_core::{CellId, EventTable, Neighborhood};

#[derive(Debug, Clone, Default)]
pub struct EventIndex {
    cells: HashMap<CellId, Vec<(NaiveDateTime, f64)>>,
    len: usize,
}

impl EventIndex {
    /// Group `table` by cell. The table is already time-sorted, so each cell's list is too.
    pub fn build(table: &EventTable) -> Self {
        let mut cells: HashMap<CellId, Vec<(NaiveDateTime, f64)>> = HashMap::new();
        for event in table.iter() {
            cells
                .entry(event.cell)
                .or_default()
                .push((event.time, event.magnitude));
        }
        Self {
            cells,
            len: table.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Events of `cell` with `from <= time <= to`.
    pub fn in_cell_inclusive(
        &self,
        cell: CellId,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> &[(NaiveDateTime, f64)] {
        match self.cells.get(&cell) {
            Some(events) => {
                let lo = events.partition_point(|(time, _)| *time < from);
                let hi = events.partition_point(|(time, _)| *time <= to);
                &events[lo..hi.max(lo)]
            }
            None => &[],
        }
    }

    /// Whether `cell` has any event with `from <= time <= to`.
    pub fn any_in_cell(&self, cell: CellId, from: NaiveDateTime, to: NaiveDateTime) -> bool {
        !self.in_cell_inclusive(cell, from, to).is_empty()
    }

    /// Append the magnitudes of events in `hood` with `from <= time < until` to `out`.
    ///
    /// Cells are visited in [`Neighborhood::cells`] order and events in time order
    /// within a cell, so the output order is deterministic.
    pub fn collect_magnitudes(
        &self,
        hood: &Neighborhood,
        from: NaiveDateTime,
        until: NaiveDateTime,
        out: &mut Vec<f64>,
    ) {
        if from >= until {
            return;
        }
        for cell in hood.cells() {
            if let Some(events) = self.cells.get(&cell) {
                let lo = events.partition_point(|(time, _)| *time < from);
                let hi = events.partition_point(|(time, _)| *time < until);
                out.extend(events[lo..hi].iter().map(|(_, magnitude)| *magnitude));
            }
        }
    }
}
