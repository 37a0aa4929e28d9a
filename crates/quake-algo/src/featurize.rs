use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use quake_core::{CellProjector, DatasetConfig, EventTable, FeatureSchema, Sample, TargetCell};
use quake_io::{event_table, load_catalog, samples_to_dataframe, write_dataset, CatalogRecord};
use tracing::info;

use crate::aggregate::{aggregate_samples, AggregationContext};
use crate::grid::{build_samples, date_range, evaluation_dates, DateRange};
use crate::targets::extract_target_cells;

/// Options that don't belong to the preset.
#[derive(Debug, Clone, Default)]
pub struct FeaturizeOptions {
    /// Worker threads for aggregation; 0 uses every CPU.
    pub threads: usize,
    /// Plan the sample grid and stop before aggregating and writing.
    pub dry_run: bool,
}

/// Summary statistics from dataset featurization
#[derive(Debug, Clone)]
pub struct FeaturizeSummary {
    pub num_target_cells: usize,
    pub num_dates: usize,
    pub total_samples: usize,
    pub num_feature_columns: usize,
    pub positive_labels: usize,
    pub label_events: usize,
    pub feature_events: usize,
    pub date_range: DateRange,
    pub output: PathBuf,
    pub written: bool,
}

/// Everything needed to aggregate, derived from a config and a loaded catalog.
#[derive(Debug, Clone)]
pub struct SamplePlan {
    pub labels: EventTable,
    pub features: EventTable,
    pub cells: Vec<TargetCell>,
    pub range: DateRange,
    pub dates: Vec<chrono::NaiveDate>,
    pub schema: FeatureSchema,
}

impl SamplePlan {
    pub fn num_samples(&self) -> usize {
        self.cells.len() * self.dates.len()
    }
}

/// Build the label/feature tables, target cells and evaluation dates for `config`.
///
/// Fails when the resulting date range or date list is empty.
pub fn plan_samples(
    config: &DatasetConfig,
    records: &[CatalogRecord],
    projector: &dyn CellProjector,
) -> Result<SamplePlan> {
    let labels = event_table(records, projector, config.min_magnitude);
    let features = event_table(records, projector, config.feature_min_magnitude);
    let cells = extract_target_cells(records, config.class_threshold, projector);
    info!(
        label_events = labels.len(),
        feature_events = features.len(),
        target_cells = cells.len(),
        "built event tables"
    );

    let range = date_range(config, labels.span())
        .with_context(|| format!("computing {} date range", config.mode.as_str()))?;
    let dates = evaluation_dates(
        &range,
        config.window_days_step,
        config.label_horizon.max_days,
    );
    if dates.is_empty() {
        return Err(anyhow!(
            "date range {} .. {} yields no evaluation dates with step {} and horizon {} days",
            range.start,
            range.end,
            config.window_days_step,
            config.label_horizon.max_days
        ));
    }
    info!(
        start = %range.start,
        end = %range.end,
        dates = dates.len(),
        first = %dates[0],
        last = %dates[dates.len() - 1],
        "evaluation dates"
    );

    Ok(SamplePlan {
        labels,
        features,
        cells,
        range,
        dates,
        schema: config.schema(),
    })
}

/// Aggregate every sample of `plan`, cell-major.
pub fn compute_dataset(
    config: &DatasetConfig,
    plan: &SamplePlan,
    threads: usize,
) -> Result<Vec<Sample>> {
    let samples = build_samples(
        &plan.cells,
        &plan.dates,
        config.label_horizon,
        plan.schema.num_groups(),
    )?;
    let ctx = AggregationContext::new(
        &plan.labels,
        &plan.features,
        &plan.schema,
        config.feature_gap_days,
    );
    aggregate_samples(samples, &ctx, threads)
}

/// Build the forecasting dataset described by `config` and write it to `output`.
///
/// **Algorithm:**
/// 1. Read the catalog named by `config.source`.
/// 2. Project it into the label table (`min_magnitude`) and the feature table
///    (`feature_min_magnitude`), and extract the target cells (`class > class_threshold`).
/// 3. Derive the date range from the split mode and the label table span, then the
///    evaluation dates.
/// 4. Cross cells with dates and aggregate labels and features in parallel.
/// 5. Lay the samples out as a table and write it (`;` CSV or Parquet).
///
/// With `options.dry_run` the function returns after step 3.
pub fn featurize_dataset(
    config: &DatasetConfig,
    projector: &dyn CellProjector,
    output: &Path,
    options: &FeaturizeOptions,
) -> Result<FeaturizeSummary> {
    info!(
        preset = %config.name,
        source = %config.source.display(),
        mode = config.mode.as_str(),
        min_magnitude = config.min_magnitude,
        feature_min_magnitude = config.feature_min_magnitude,
        class_threshold = config.class_threshold,
        step_days = config.window_days_step,
        depths = ?config.depths,
        radii = ?config.radii,
        "featurizing dataset"
    );

    let records = load_catalog(&config.source, &config.catalog)
        .with_context(|| format!("loading catalog for preset '{}'", config.name))?;
    let plan = plan_samples(config, &records, projector)?;

    let mut summary = FeaturizeSummary {
        num_target_cells: plan.cells.len(),
        num_dates: plan.dates.len(),
        total_samples: plan.num_samples(),
        num_feature_columns: plan.schema.num_columns(),
        positive_labels: 0,
        label_events: plan.labels.len(),
        feature_events: plan.features.len(),
        date_range: plan.range,
        output: output.to_path_buf(),
        written: false,
    };
    if options.dry_run {
        info!(samples = summary.total_samples, "dry run, skipping aggregation");
        return Ok(summary);
    }

    let samples = compute_dataset(config, &plan, options.threads)?;
    summary.positive_labels = samples.iter().filter(|s| s.target).count();

    let mut df = samples_to_dataframe(&samples, &plan.schema)?;
    write_dataset(&mut df, output)
        .with_context(|| format!("writing dataset '{}'", output.display()))?;
    summary.written = true;
    info!(
        samples = summary.total_samples,
        positives = summary.positive_labels,
        output = %output.display(),
        "dataset complete"
    );
    Ok(summary)
}
