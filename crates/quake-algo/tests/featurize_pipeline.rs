use std::fs;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use quake_algo::{featurize_dataset, FeaturizeOptions};
use quake_core::DatasetConfig;
use quake_io::load_dataset_config;
use tempfile::tempdir;

/// Space-delimited catalog: a background of M4 events around cell (0, 0) and a
/// few strong ones that define the target cells and the labels.
fn write_catalog(path: &Path) {
    let start = NaiveDate::from_ymd_opt(2010, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mut text = String::from("time LAT LONG MAG Class\n");
    for i in 0..300i64 {
        let time = start + Duration::days(i * 9) + Duration::hours(i % 24);
        let lat = 0.1 + (i % 4) as f64 * 0.5;
        let lon = 0.1 + (i % 3) as f64 * 0.5;
        let mag = if i % 37 == 0 { 6.3 } else { 3.6 + (i % 10) as f64 / 10.0 };
        text.push_str(&format!(
            "{} {:.2} {:.2} {:.1} {:.1}\n",
            time.format("%Y-%m-%dT%H:%M:%S"),
            lat,
            lon,
            mag,
            mag
        ));
    }
    fs::write(path, text).unwrap();
}

fn config(dir: &Path, name: &str) -> DatasetConfig {
    let catalog = dir.join("catalog.txt");
    write_catalog(&catalog);
    let presets = dir.join("presets.yaml");
    fs::write(
        &presets,
        format!(
            "defaults:\n  depths: [60, 365]\n  radii: [0, 3]\n  output_dir: {out}\npresets:\n  {name}:\n    source: {src}\n    min_magnitude: 6.0\n    class_threshold: 6.0\n    window_days_step: 20\n",
            out = dir.join("features").display(),
            src = catalog.display(),
        ),
    )
    .unwrap();
    load_dataset_config(&presets, name).unwrap()
}

#[test]
fn writes_one_row_per_cell_and_date() {
    let dir = tempdir().unwrap();
    let config = config(dir.path(), "magn_6_test");
    let out = config.default_output_path();
    let options = FeaturizeOptions {
        threads: 2,
        dry_run: false,
    };
    let summary = featurize_dataset(&config, &config.grid, &out, &options).unwrap();

    assert!(summary.written);
    assert!(summary.num_target_cells > 0);
    assert!(summary.num_dates > 0);
    assert_eq!(summary.total_samples, summary.num_target_cells * summary.num_dates);
    assert_eq!(summary.num_feature_columns, 20);

    let text = fs::read_to_string(&out).unwrap();
    let mut lines = text.lines();
    let header: Vec<&str> = lines.next().unwrap().split(';').collect();
    assert_eq!(header.len(), 8 + 20);
    assert_eq!(header[0], "dt");
    assert_eq!(header[8], "count_earthquakes_60_rad0");
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), summary.total_samples);
    for row in &rows {
        assert_eq!(row.split(';').count(), 28, "{row}");
    }
    let positives = rows
        .iter()
        .filter(|row| row.split(';').nth(7) == Some("1"))
        .count();
    assert_eq!(positives, summary.positive_labels);
    assert!(out
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("magn_6_test_features_3_5_rad0_3_depth60_365_trs6"));
}

#[test]
fn repeated_runs_are_byte_identical() {
    let dir = tempdir().unwrap();
    let config = config(dir.path(), "magn_6_test");
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");
    featurize_dataset(
        &config,
        &config.grid,
        &first,
        &FeaturizeOptions {
            threads: 1,
            dry_run: false,
        },
    )
    .unwrap();
    featurize_dataset(
        &config,
        &config.grid,
        &second,
        &FeaturizeOptions {
            threads: 4,
            dry_run: false,
        },
    )
    .unwrap();
    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempdir().unwrap();
    let config = config(dir.path(), "magn_6_test");
    let out = dir.path().join("dry.csv");
    let summary = featurize_dataset(
        &config,
        &config.grid,
        &out,
        &FeaturizeOptions {
            threads: 1,
            dry_run: true,
        },
    )
    .unwrap();
    assert!(!summary.written);
    assert!(summary.total_samples > 0);
    assert!(!out.exists());
}

#[test]
fn train_range_too_short_is_an_error() {
    let dir = tempdir().unwrap();
    // ~7.4 years of catalog cannot hold 5 warm-up years and a 1000 day tail
    let config = config(dir.path(), "magn_6_train");
    let out = dir.path().join("train.csv");
    let err = featurize_dataset(&config, &config.grid, &out, &FeaturizeOptions::default())
        .unwrap_err();
    assert!(format!("{err:#}").contains("date range"));
}
