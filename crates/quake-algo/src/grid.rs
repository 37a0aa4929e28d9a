//! Evaluation dates and the sample grid.
//!
//! The date range depends on the split mode and on the time span of the label
//! table; explicit `start_date`/`end_date` overrides replace the computed bounds.
//! Dates advance by `window_days_step` from the start and stop early enough that
//! every label window closes before the range end.

use anyhow::{anyhow, Result};
use chrono::{Days, Duration, Months, NaiveDate, NaiveDateTime};
use quake_core::{DatasetConfig, LabelHorizon, Sample, SplitMode, TargetCell};
use serde::Serialize;

/// Half-open `[start, end)` interval the evaluation dates are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if start >= end {
            return Err(anyhow!(
                "empty date range: start {} is not before end {}",
                start,
                end
            ));
        }
        Ok(Self { start, end })
    }
}

/// Compute the date range for `config` from the label table span.
///
/// **Test mode:** `[last - test_window_days, last]`.
///
/// **Train mode:** `[first + train_warmup_years, last - train_tail_days]`, the
/// warm-up measured in calendar years.
///
/// `span` may be `None` only when both bounds are overridden.
pub fn date_range(
    config: &DatasetConfig,
    span: Option<(NaiveDateTime, NaiveDateTime)>,
) -> Result<DateRange> {
    let computed = match span {
        Some((first, last)) => Some(match config.mode {
            SplitMode::Test => (
                last - Duration::days(i64::from(config.test_window_days)),
                last,
            ),
            SplitMode::Train => {
                let start = first
                    .checked_add_months(Months::new(12 * config.train_warmup_years))
                    .ok_or_else(|| anyhow!("train warm-up overflows the calendar"))?;
                (start, last - Duration::days(i64::from(config.train_tail_days)))
            }
        }),
        None => None,
    };

    let start = match (config.start_date, computed) {
        (Some(date), _) => midnight(date),
        (None, Some((start, _))) => start,
        (None, None) => {
            return Err(anyhow!(
                "label table is empty and no start_date override is set"
            ))
        }
    };
    let end = match (config.end_date, computed) {
        (Some(date), _) => midnight(date),
        (None, Some((_, end))) => end,
        (None, None) => {
            return Err(anyhow!("label table is empty and no end_date override is set"))
        }
    };
    DateRange::new(start, end)
}

/// Dates `start + k * step` for `k >= 1` while `candidate < end - horizon_max_days`.
///
/// The result is strictly increasing and its last element `d` satisfies
/// `d + horizon_max_days < end`.
pub fn evaluation_dates(range: &DateRange, step_days: u32, horizon_max_days: u32) -> Vec<NaiveDate> {
    if step_days == 0 {
        return Vec::new();
    }
    let step = Duration::days(i64::from(step_days));
    let limit = range.end - Duration::days(i64::from(horizon_max_days));
    let mut dates = Vec::new();
    let mut candidate = range.start + step;
    while candidate < limit {
        dates.push(candidate.date());
        candidate += step;
    }
    dates
}

/// Cross `cells` with `dates`, cell-major, with zeroed features and label.
pub fn build_samples(
    cells: &[TargetCell],
    dates: &[NaiveDate],
    horizon: LabelHorizon,
    num_groups: usize,
) -> Result<Vec<Sample>> {
    let mut samples = Vec::with_capacity(cells.len() * dates.len());
    for cell in cells {
        for &date in dates {
            let horizon_min = date
                .checked_add_days(Days::new(u64::from(horizon.min_days)))
                .ok_or_else(|| anyhow!("label horizon overflows the calendar at {}", date))?;
            let horizon_max = date
                .checked_add_days(Days::new(u64::from(horizon.max_days)))
                .ok_or_else(|| anyhow!("label horizon overflows the calendar at {}", date))?;
            samples.push(Sample::new(*cell, date, horizon_min, horizon_max, num_groups));
        }
    }
    Ok(samples)
}

pub(crate) fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quake_core::{CatalogColumns, CellId, RegularGrid};
    use std::path::PathBuf;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        midnight(day(y, m, d))
    }

    fn config(mode: SplitMode) -> DatasetConfig {
        DatasetConfig {
            name: "magn_6".into(),
            source: PathBuf::from("catalog.txt"),
            min_magnitude: 6.0,
            feature_min_magnitude: 3.5,
            class_threshold: 6.0,
            window_days_step: 10,
            mode,
            label_horizon: LabelHorizon::default(),
            feature_gap_days: 1,
            depths: vec![60],
            radii: vec![0],
            test_window_days: 1000,
            train_tail_days: 1000,
            train_warmup_years: 5,
            start_date: None,
            end_date: None,
            output_dir: PathBuf::from("out"),
            grid: RegularGrid::default(),
            catalog: CatalogColumns::default(),
        }
    }

    #[test]
    fn test_mode_covers_trailing_window() {
        let range = date_range(
            &config(SplitMode::Test),
            Some((at(1990, 1, 1), at(2020, 1, 1))),
        )
        .unwrap();
        assert_eq!(range.end, at(2020, 1, 1));
        assert_eq!(range.start, at(2020, 1, 1) - Duration::days(1000));
    }

    #[test]
    fn train_mode_skips_warmup_and_tail() {
        let range = date_range(
            &config(SplitMode::Train),
            Some((at(1990, 2, 28), at(2020, 1, 1))),
        )
        .unwrap();
        assert_eq!(range.start, at(1995, 2, 28));
        assert_eq!(range.end, at(2020, 1, 1) - Duration::days(1000));
    }

    #[test]
    fn overrides_replace_computed_bounds() {
        let mut cfg = config(SplitMode::Test);
        cfg.start_date = Some(day(2010, 1, 1));
        cfg.end_date = Some(day(2011, 1, 1));
        let range = date_range(&cfg, None).unwrap();
        assert_eq!(range, DateRange::new(at(2010, 1, 1), at(2011, 1, 1)).unwrap());
    }

    #[test]
    fn empty_span_without_overrides_fails() {
        assert!(date_range(&config(SplitMode::Test), None).is_err());
    }

    #[test]
    fn inverted_range_fails() {
        // train range collapses when the catalog is shorter than warm-up plus tail
        let err = date_range(
            &config(SplitMode::Train),
            Some((at(2015, 1, 1), at(2020, 1, 1))),
        );
        assert!(err.is_err());
    }

    #[test]
    fn dates_are_stepped_and_leave_room_for_horizon() {
        let range = DateRange::new(at(2020, 1, 1), at(2020, 4, 1)).unwrap();
        let dates = evaluation_dates(&range, 10, 50);
        assert_eq!(dates.first(), Some(&day(2020, 1, 11)));
        for pair in dates.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(10));
        }
        let last = *dates.last().unwrap();
        assert!(midnight(last) + Duration::days(50) < range.end);
        let next = last + Duration::days(10);
        assert!(midnight(next) + Duration::days(50) >= range.end);
    }

    #[test]
    fn short_range_has_no_dates() {
        let range = DateRange::new(at(2020, 1, 1), at(2020, 2, 1)).unwrap();
        assert!(evaluation_dates(&range, 10, 50).is_empty());
    }

    #[test]
    fn samples_are_cell_major_with_horizon() {
        let cells = vec![
            TargetCell {
                cell: CellId::new(1, 1),
                lon_cell: 0.75,
                lat_cell: 0.75,
            },
            TargetCell {
                cell: CellId::new(2, 1),
                lon_cell: 1.25,
                lat_cell: 0.75,
            },
        ];
        let dates = vec![day(2024, 2, 1), day(2024, 2, 11)];
        let samples = build_samples(&cells, &dates, LabelHorizon::default(), 3).unwrap();
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[1].cell.cell, CellId::new(1, 1));
        assert_eq!(samples[1].date, day(2024, 2, 11));
        assert_eq!(samples[2].cell.cell, CellId::new(2, 1));
        assert_eq!(samples[0].horizon_min, day(2024, 2, 11));
        assert_eq!(samples[0].horizon_max, day(2024, 3, 22));
        assert!(samples.iter().all(|s| !s.target && s.groups.len() == 3));
    }
}
