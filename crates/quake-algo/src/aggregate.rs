//! Label and feature aggregation.
//!
//! [`compute_sample`] fills one sample from read-only event indexes; it has no
//! shared state, so [`aggregate_samples`] can fan samples out over a rayon pool
//! and collect them back in input order.
//!
//! **Label:** 1 when the label table has an event in exactly the sample cell with
//! `horizon_min <= time <= horizon_max` (midnights, inclusive). The bounds are the
//! ones stored on the sample by [`crate::grid::build_samples`].
//!
//! **Features:** for each (depth, radius) group, the feature-table magnitudes in
//! the radius neighborhood with `date - depth <= time < date - feature_gap`. An
//! empty window leaves the five values at 0.0.

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use chrono::Duration;
use quake_core::{
    EventTable, FeatureGroup, FeatureSchema, GroupValues, MagnitudeStats, Sample,
};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, info};

use crate::grid::midnight;
use crate::index::EventIndex;

/// Read-only inputs shared by every sample computation.
#[derive(Debug, Clone)]
pub struct AggregationContext {
    pub labels: EventIndex,
    pub features: EventIndex,
    pub groups: Vec<FeatureGroup>,
    pub feature_gap_days: u32,
}

impl AggregationContext {
    pub fn new(
        labels: &EventTable,
        features: &EventTable,
        schema: &FeatureSchema,
        feature_gap_days: u32,
    ) -> Self {
        Self {
            labels: EventIndex::build(labels),
            features: EventIndex::build(features),
            groups: schema.groups(),
            feature_gap_days,
        }
    }
}

/// Compute the label and every feature group of `sample`.
pub fn compute_sample(mut sample: Sample, ctx: &AggregationContext) -> Sample {
    let cell = sample.cell.cell;
    sample.target = ctx.labels.any_in_cell(
        cell,
        midnight(sample.horizon_min),
        midnight(sample.horizon_max),
    );

    let day = midnight(sample.date);
    let until = day - Duration::days(i64::from(ctx.feature_gap_days));
    let mut magnitudes = Vec::new();
    sample.groups = ctx
        .groups
        .iter()
        .map(|group| {
            magnitudes.clear();
            let from = day - Duration::days(i64::from(group.depth_days));
            ctx.features.collect_magnitudes(
                &cell.neighborhood(group.radius),
                from,
                until,
                &mut magnitudes,
            );
            MagnitudeStats::from_magnitudes(&magnitudes)
                .map(|stats| stats.to_values())
                .unwrap_or_default()
        })
        .collect::<Vec<GroupValues>>();
    sample
}

/// Run [`compute_sample`] over `samples` on `threads` workers (0 = all CPUs).
///
/// Output order matches input order for any thread count.
pub fn aggregate_samples(
    samples: Vec<Sample>,
    ctx: &AggregationContext,
    threads: usize,
) -> Result<Vec<Sample>> {
    let thread_count = if threads == 0 {
        num_cpus::get()
    } else {
        threads
    };
    let pool = ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build()
        .context("building Rayon thread pool for aggregation")?;

    let total = samples.len();
    let report_every = (total / 10).max(1);
    let done = AtomicUsize::new(0);
    debug!(samples = total, threads = thread_count, "aggregating samples");

    let computed = pool.install(|| {
        samples
            .into_par_iter()
            .map(|sample| {
                let sample = compute_sample(sample, ctx);
                let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                if finished % report_every == 0 || finished == total {
                    info!(
                        done = finished,
                        total,
                        percent = finished * 100 / total,
                        "aggregation progress"
                    );
                }
                sample
            })
            .collect::<Vec<Sample>>()
    });
    Ok(computed)
}
