//! Dataset table layout and persistence.
//!
//! Samples are laid out as a polars [`DataFrame`] with the fixed key columns first
//! and the feature columns in [`FeatureSchema::columns`] order. The frame is then
//! written as `;`-separated CSV, or as Parquet when built with the `parquet`
//! feature and the output path ends in `.parquet`.

use std::fs::{self, File};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use polars::prelude::*;
use quake_core::{FeatureSchema, Sample};
use tracing::info;

pub const KEY_COLUMNS: [&str; 8] = [
    "dt",
    "lon_cell",
    "lat_cell",
    "cell_x",
    "cell_y",
    "horizon_min_dt",
    "horizon_max_dt",
    "target",
];

const DATE_FORMAT: &str = "%Y-%m-%d";
const CSV_SEPARATOR: u8 = b';';

/// Build the output table for `samples`, keeping their order.
pub fn samples_to_dataframe(samples: &[Sample], schema: &FeatureSchema) -> Result<DataFrame> {
    let n = samples.len();
    let mut dt = Vec::with_capacity(n);
    let mut lon_cell = Vec::with_capacity(n);
    let mut lat_cell = Vec::with_capacity(n);
    let mut cell_x = Vec::with_capacity(n);
    let mut cell_y = Vec::with_capacity(n);
    let mut horizon_min = Vec::with_capacity(n);
    let mut horizon_max = Vec::with_capacity(n);
    let mut target = Vec::with_capacity(n);

    for sample in samples {
        if sample.groups.len() != schema.num_groups() {
            return Err(anyhow!(
                "sample at {} {} has {} feature groups, schema expects {}",
                sample.cell.cell,
                sample.date,
                sample.groups.len(),
                schema.num_groups()
            ));
        }
        dt.push(sample.date.format(DATE_FORMAT).to_string());
        lon_cell.push(sample.cell.lon_cell);
        lat_cell.push(sample.cell.lat_cell);
        cell_x.push(sample.cell.cell.x);
        cell_y.push(sample.cell.cell.y);
        horizon_min.push(sample.horizon_min.format(DATE_FORMAT).to_string());
        horizon_max.push(sample.horizon_max.format(DATE_FORMAT).to_string());
        target.push(sample.target_value());
    }

    let mut columns = vec![
        Series::new(KEY_COLUMNS[0], dt),
        Series::new(KEY_COLUMNS[1], lon_cell),
        Series::new(KEY_COLUMNS[2], lat_cell),
        Series::new(KEY_COLUMNS[3], cell_x),
        Series::new(KEY_COLUMNS[4], cell_y),
        Series::new(KEY_COLUMNS[5], horizon_min),
        Series::new(KEY_COLUMNS[6], horizon_max),
        Series::new(KEY_COLUMNS[7], target),
    ];
    for column in schema.columns() {
        let values: Vec<f64> = samples.iter().map(|s| s.column_value(&column)).collect();
        columns.push(Series::new(column.name().as_str(), values));
    }

    DataFrame::new(columns).context("assembling dataset frame")
}

/// Write `df` to `path`, creating parent directories.
pub fn write_dataset(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory '{}'", parent.display()))?;
        }
    }
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();
    let mut file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;

    match extension.as_str() {
        "csv" | "txt" => CsvWriter::new(&mut file)
            .with_separator(CSV_SEPARATOR)
            .finish(df)
            .context("writing CSV file")?,
        #[cfg(feature = "parquet")]
        "parquet" => {
            ParquetWriter::new(&mut file)
                .finish(df)
                .context("writing Parquet file")?;
        }
        #[cfg(not(feature = "parquet"))]
        "parquet" => {
            return Err(anyhow!(
                "parquet support is disabled; rebuild with the 'parquet' feature"
            ))
        }
        _ => {
            return Err(anyhow!(
                "unsupported output extension '{}'; use .csv or .parquet",
                extension
            ))
        }
    }
    info!(rows = df.height(), columns = df.width(), path = %path.display(), "wrote dataset");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use quake_core::{CellId, MagnitudeStats, TargetCell};
    use tempfile::tempdir;

    fn sample(schema: &FeatureSchema, target: bool) -> Sample {
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let mut sample = Sample::new(
            TargetCell {
                cell: CellId::new(1, 2),
                lon_cell: 10.25,
                lat_cell: 20.75,
            },
            date,
            NaiveDate::from_ymd_opt(2024, 2, 11).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 22).unwrap(),
            schema.num_groups(),
        );
        sample.target = target;
        sample
    }

    #[test]
    fn frame_has_key_columns_then_features() {
        let schema = FeatureSchema::new(vec![60, 90], vec![0, 3]);
        let df = samples_to_dataframe(&[sample(&schema, false)], &schema).unwrap();
        let names = df.get_column_names();
        assert_eq!(&names[..8], &KEY_COLUMNS[..]);
        assert_eq!(names.len(), 8 + schema.num_columns());
        assert_eq!(names[8], "count_earthquakes_60_rad0");
        assert_eq!(names[names.len() - 1], "std_magn_90_rad3");
    }

    #[test]
    fn feature_values_land_in_named_columns() {
        let schema = FeatureSchema::new(vec![60, 90], vec![0, 3]);
        let mut s = sample(&schema, true);
        // group 3 is (90, rad3)
        s.groups[3] = MagnitudeStats::from_magnitudes(&[4.0, 6.0]).unwrap().to_values();
        let df = samples_to_dataframe(&[s], &schema).unwrap();
        let max = df.column("max_magn_90_rad3").unwrap().f64().unwrap();
        assert_eq!(max.get(0), Some(6.0));
        let count = df.column("count_earthquakes_90_rad3").unwrap().f64().unwrap();
        assert_eq!(count.get(0), Some(2.0));
        let other = df.column("max_magn_90_rad0").unwrap().f64().unwrap();
        assert_eq!(other.get(0), Some(0.0));
        let target = df.column("target").unwrap().i32().unwrap();
        assert_eq!(target.get(0), Some(1));
    }

    #[test]
    fn mismatched_group_count_is_rejected() {
        let schema = FeatureSchema::new(vec![60], vec![0]);
        let wider = FeatureSchema::new(vec![60, 90], vec![0]);
        assert!(samples_to_dataframe(&[sample(&wider, false)], &schema).is_err());
    }

    #[test]
    fn writes_semicolon_csv() {
        let schema = FeatureSchema::new(vec![60], vec![0]);
        let mut df = samples_to_dataframe(&[sample(&schema, true)], &schema).unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("dataset.csv");
        write_dataset(&mut df, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "dt;lon_cell;lat_cell;cell_x;cell_y;horizon_min_dt;horizon_max_dt;target;\
             count_earthquakes_60_rad0;mean_magn_60_rad0;min_magn_60_rad0;max_magn_60_rad0;std_magn_60_rad0"
        );
        let row = lines.next().unwrap();
        assert!(
            row.starts_with("2024-02-01;10.25;20.75;1;2;2024-02-11;2024-03-22;1;"),
            "{row}"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn single_event_window_writes_nan_std() {
        let schema = FeatureSchema::new(vec![60], vec![0]);
        let mut s = sample(&schema, false);
        s.groups[0] = MagnitudeStats::from_magnitudes(&[4.0]).unwrap().to_values();
        let mut df = samples_to_dataframe(&[s], &schema).unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("single.csv");
        write_dataset(&mut df, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert!(row.ends_with(";1.0;4.0;4.0;4.0;NaN"), "{row}");
    }

    #[test]
    fn rejects_unknown_extension() {
        let schema = FeatureSchema::new(vec![60], vec![0]);
        let mut df = samples_to_dataframe(&[], &schema).unwrap();
        let dir = tempdir().unwrap();
        assert!(write_dataset(&mut df, &dir.path().join("out.xlsx")).is_err());
    }
}
