//! Source catalog reader.
//!
//! The catalog is a delimited text file with a header row. Column names and the
//! delimiter come from [`CatalogColumns`]. Every row must parse: a bad timestamp
//! or number aborts the load with the offending line, since there is no useful
//! partial dataset to build from a truncated catalog.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use quake_core::{CatalogColumns, CellProjector, Event, EventTable};
use tracing::debug;

/// One parsed catalog row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogRecord {
    pub time: NaiveDateTime,
    pub lat: f64,
    pub lon: f64,
    pub magnitude: f64,
    pub class: f64,
}

struct ColumnIndex {
    time: usize,
    lat: usize,
    lon: usize,
    magnitude: usize,
    class: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord, columns: &CatalogColumns) -> Result<Self> {
        let find = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| anyhow!("catalog is missing column '{}'", name))
        };
        Ok(Self {
            time: find(&columns.time)?,
            lat: find(&columns.lat)?,
            lon: find(&columns.lon)?,
            magnitude: find(&columns.magnitude)?,
            class: find(&columns.class)?,
        })
    }
}

/// Read every row of the catalog at `path`.
pub fn load_catalog(path: &Path, columns: &CatalogColumns) -> Result<Vec<CatalogRecord>> {
    let delimiter = columns.delimiter_byte()?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .trim(Trim::All)
        .from_path(path)
        .with_context(|| format!("opening catalog '{}'", path.display()))?;
    let headers = rdr
        .headers()
        .with_context(|| format!("reading catalog header of '{}'", path.display()))?
        .clone();
    let index = ColumnIndex::resolve(&headers, columns)
        .with_context(|| format!("resolving columns of '{}'", path.display()))?;

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result.with_context(|| format!("reading catalog '{}'", path.display()))?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let record = parse_row(&row, &index)
            .with_context(|| format!("parsing line {} of '{}'", line, path.display()))?;
        records.push(record);
    }
    debug!(rows = records.len(), path = %path.display(), "loaded catalog");
    Ok(records)
}

fn parse_row(row: &StringRecord, index: &ColumnIndex) -> Result<CatalogRecord> {
    Ok(CatalogRecord {
        time: parse_timestamp(field(row, index.time, "time")?)?,
        lat: number(row, index.lat, "lat")?,
        lon: number(row, index.lon, "lon")?,
        magnitude: number(row, index.magnitude, "magnitude")?,
        class: number(row, index.class, "class")?,
    })
}

fn field<'a>(row: &'a StringRecord, idx: usize, name: &str) -> Result<&'a str> {
    row.get(idx)
        .ok_or_else(|| anyhow!("row has no '{}' field", name))
}

fn number(row: &StringRecord, idx: usize, name: &str) -> Result<f64> {
    let raw = field(row, idx, name)?;
    raw.parse::<f64>()
        .with_context(|| format!("'{}' value '{}' is not a number", name, raw))
}

/// Parse a catalog timestamp.
///
/// Accepts RFC 3339 (offset dropped after conversion to UTC), `YYYY-MM-DD HH:MM:SS`,
/// `YYYY-MM-DDTHH:MM:SS` (both with optional fractional seconds) and bare dates.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| anyhow!("unrecognized timestamp '{}'", value))
}

/// Project catalog rows onto the grid and keep those with `magnitude >= min_magnitude`.
pub fn event_table(
    records: &[CatalogRecord],
    projector: &dyn CellProjector,
    min_magnitude: f64,
) -> EventTable {
    let events = records
        .iter()
        .filter(|record| record.magnitude >= min_magnitude)
        .map(|record| Event {
            time: record.time,
            cell: projector.project(record.lon, record.lat).cell,
            magnitude: record.magnitude,
        });
    EventTable::new(events, min_magnitude)
}
