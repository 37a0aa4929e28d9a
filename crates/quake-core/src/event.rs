use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::cell::CellId;

/// A single catalogued event already projected onto the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub time: NaiveDateTime,
    pub cell: CellId,
    pub magnitude: f64,
}

/// Time-sorted events with magnitude at or above `min_magnitude`.
///
/// Construction is the only place the magnitude filter and the ordering are
/// enforced; the table is read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct EventTable {
    events: Vec<Event>,
    min_magnitude: f64,
}

impl EventTable {
    pub fn new(events: impl IntoIterator<Item = Event>, min_magnitude: f64) -> Self {
        let mut events: Vec<Event> = events
            .into_iter()
            .filter(|event| event.magnitude >= min_magnitude)
            .collect();
        // stable: ties keep catalog order
        events.sort_by_key(|event| event.time);
        Self {
            events,
            min_magnitude,
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn min_magnitude(&self) -> f64 {
        self.min_magnitude
    }

    /// First and last event time, if any.
    pub fn span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        match (self.events.first(), self.events.last()) {
            (Some(first), Some(last)) => Some((first.time, last.time)),
            _ => None,
        }
    }
}
