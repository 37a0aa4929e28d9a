use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use quake_algo::{featurize_dataset, FeaturizeOptions};
use quake_core::config::parse_date;
use quake_core::{DatasetConfig, SplitMode};
use quake_io::load_dataset_config;
use tracing::info;

use crate::commands::telemetry::record_run_timed;
use crate::commands::util::parse_threads;

pub struct FeaturizeArgs<'a> {
    pub presets: &'a Path,
    pub preset: &'a str,
    pub out: Option<&'a Path>,
    pub mode: Option<&'a str>,
    pub start: Option<&'a str>,
    pub end: Option<&'a str>,
    pub threads: &'a str,
    pub dry_run: bool,
}

/// Handle `quake featurize`: resolve the preset, apply CLI overrides and build the dataset.
///
/// A run manifest is written next to the output for real runs, successful or not.
///
/// **Example Usage:**
/// ```bash
/// quake featurize --presets configs/presets.yaml --preset magn_6_withoutaft_test
/// quake featurize --presets configs/presets.yaml --preset magn_6_withoutaft \
///   --start 2005-01-01 --end 2015-01-01 --out features/magn_6.csv --threads 8
/// ```
pub fn handle(args: &FeaturizeArgs<'_>) -> Result<()> {
    let start = Instant::now();
    let config = apply_overrides(load_dataset_config(args.presets, args.preset)?, args)?;
    let out: PathBuf = args
        .out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.default_output_path());

    let res = (|| -> Result<()> {
        let options = FeaturizeOptions {
            threads: parse_threads(args.threads)?,
            dry_run: args.dry_run,
        };
        let summary = featurize_dataset(&config, &config.grid, &out, &options)?;
        println!(
            "Featurize {}: {} cells × {} dates = {} samples, {} feature columns ({} to {})",
            config.name,
            summary.num_target_cells,
            summary.num_dates,
            summary.total_samples,
            summary.num_feature_columns,
            summary.date_range.start.date(),
            summary.date_range.end.date()
        );
        if summary.written {
            println!(
                "{} positive labels -> {}",
                summary.positive_labels,
                summary.output.display()
            );
        } else {
            println!("Dry run: nothing written");
        }
        Ok(())
    })();

    if args.dry_run {
        return res;
    }
    let out_str = out.display().to_string();
    let params = [
        ("presets", args.presets.to_str().unwrap_or("")),
        ("preset", args.preset),
        ("mode", config.mode.as_str()),
        ("start", args.start.unwrap_or("")),
        ("end", args.end.unwrap_or("")),
        ("threads", args.threads),
        ("out", out_str.as_str()),
    ];
    record_run_timed(&out, "featurize", &params, start, &res);
    res
}

fn apply_overrides(mut config: DatasetConfig, args: &FeaturizeArgs<'_>) -> Result<DatasetConfig> {
    if let Some(mode) = args.mode {
        config.mode = mode.parse::<SplitMode>()?;
    }
    if let Some(start) = args.start {
        config.start_date = Some(parse_date(start, "--start")?);
    }
    if let Some(end) = args.end {
        config.end_date = Some(parse_date(end, "--end")?);
    }
    config
        .validate()
        .with_context(|| format!("validating preset '{}' with overrides", config.name))?;
    info!(preset = %config.name, mode = config.mode.as_str(), "resolved preset");
    Ok(config)
}
