//! Duration and size statistics for a labelled batch.
//!
//! [`ts_stats`] summarises a batch twice: once over every series and once per
//! class. Durations are timestep counts divided by the sampling frequency,
//! so with `sampling_frequency = 100.0` a 250-sample series lasts 2.5 time
//! units.
//!
//! Labels are zero-based class indices, one per series. The number of
//! classes is `max(y) + 1`; a class index in that range with no member
//! series is handled according to [`EmptyClassPolicy`].

use std::collections::BTreeSet;

use log::warn;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::{
    check::{CheckError, Label, ShapeOffender, TargetRegime, check_ts_data},
    parts::SeriesSource,
};

/// What to do with a class in `0..C` that has no member series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyClassPolicy {
    /// Fail with [`StatsError::EmptyClass`].
    #[default]
    Reject,
    /// Report the class with zero series, zero total time and NaN moments.
    Nan,
}

/// Knobs for [`ts_stats`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsOptions {
    /// Samples per time unit.
    pub sampling_frequency: f64,
    /// Display names for classes `0..C`; defaults to the class indices.
    pub class_labels: Option<Vec<String>>,
    /// Handling of classes without members.
    pub empty_class: EmptyClassPolicy,
    /// Validate `y` against the batch before summarising. When disabled only
    /// the series themselves are checked.
    pub check_targets: bool,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            sampling_frequency: 1.0,
            class_labels: None,
            empty_class: EmptyClassPolicy::default(),
            check_targets: true,
        }
    }
}

/// Errors raised by [`ts_stats`].
#[derive(Debug, Snafu, Clone, PartialEq)]
#[snafu(visibility(pub(crate)))]
pub enum StatsError {
    /// The batch has no series; no statistic is defined.
    #[snafu(display("Cannot summarise an empty batch"))]
    EmptyBatch,

    /// Sampling frequency is zero, negative or not finite.
    #[snafu(display("Sampling frequency must be positive and finite, got {value}"))]
    InvalidSamplingFrequency {
        /// The rejected frequency.
        value: f64,
    },

    /// Targets do not fit the batch.
    #[snafu(display("Targets do not match the batch: {source}"))]
    Check {
        /// Underlying shape check failure.
        source: CheckError,
    },

    /// A class between 0 and `max(y)` has no series.
    #[snafu(display("Class {class} has no series (classes are 0..={max_class})"))]
    EmptyClass {
        /// The lowest empty class index.
        class: usize,
        /// Largest class index in `y`.
        max_class: usize,
    },

    /// Reporting empty classes would need more than [`MAX_CLASSES`] rows.
    #[snafu(display("Class index {max_class} exceeds the limit of {limit} classes"))]
    TooManyClasses {
        /// Largest class index in `y`.
        max_class: usize,
        /// The row limit, [`MAX_CLASSES`].
        limit: usize,
    },

    /// Number of supplied class labels differs from the number of classes.
    #[snafu(display("Got {n_labels} class labels for {n_classes} classes"))]
    ClassLabelCount {
        /// Number of names supplied.
        n_labels: usize,
        /// Number of classes implied by `max(y) + 1`.
        n_classes: usize,
    },
}

/// Upper bound on the per-class rows a report may hold.
pub const MAX_CLASSES: usize = 1 << 16;

/// Convenience alias for stats results.
pub type StatsResult<T> = Result<T, StatsError>;

/// Whole-batch statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalStats {
    /// Number of series.
    pub n_series: usize,
    /// Number of classes (`max(y) + 1`).
    pub n_classes: usize,
    /// Variables per timestep.
    pub n_ts_vars: usize,
    /// Context width (0 when context is absent).
    pub n_context_vars: usize,
    /// Sum of series durations.
    pub total_time: f64,
    /// Mean series duration.
    pub series_time_mean: f64,
    /// Population standard deviation of series durations.
    pub series_time_std: f64,
    /// Shortest and longest series duration.
    pub series_time_range: (f64, f64),
}

/// Statistics over the series of one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassStats {
    /// Display name of the class.
    pub label: String,
    /// Number of series in the class.
    pub n_series: usize,
    /// Sum of durations in the class.
    pub total_time: f64,
    /// Mean duration in the class.
    pub series_time_mean: f64,
    /// Population standard deviation of durations in the class.
    pub series_time_std: f64,
    /// Shortest duration in the class.
    pub series_time_min: f64,
    /// Longest duration in the class.
    pub series_time_max: f64,
}

/// Two-section report returned by [`ts_stats`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TsStats {
    /// Statistics over the whole batch.
    pub total: TotalStats,
    /// One entry per class, in class-index order.
    pub by_class: Vec<ClassStats>,
}

/// Sum, mean, std, min and max of a set of durations.
#[derive(Debug, Clone, Copy)]
struct Moments {
    sum: f64,
    mean: f64,
    std: f64,
    min: f64,
    max: f64,
}

fn moments(values: &[f64]) -> Option<Moments> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let sum: f64 = values.iter().sum();
    let mean = sum / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(Moments {
        sum,
        mean,
        std: var.sqrt(),
        min,
        max,
    })
}

/// Lowest class in `0..=max_class` with no label, found without allocating
/// one slot per class.
fn first_missing_class(labels: &[usize], max_class: usize) -> Option<usize> {
    let present: BTreeSet<usize> = labels.iter().copied().collect();
    let mut expected = 0;
    for class in present {
        if class != expected {
            break;
        }
        expected += 1;
    }
    (expected <= max_class).then_some(expected)
}

/// Summarise series durations over the batch and per class.
///
/// `y` holds one zero-based class index per series.
///
/// ```
/// use tsbatch_core::{Series, StatsOptions, ts_stats};
///
/// let x: Vec<Series> = [10, 10, 20, 20]
///     .iter()
///     .map(|&n| Series::univariate(vec![0.0; n]))
///     .collect();
/// let report = ts_stats(&x, &[0, 0, 1, 1], &StatsOptions::default()).unwrap();
/// assert_eq!(report.total.total_time, 60.0);
/// assert_eq!(report.by_class[1].series_time_mean, 20.0);
/// ```
pub fn ts_stats<X: SeriesSource + ?Sized>(
    x: &X,
    y: &[usize],
    options: &StatsOptions,
) -> StatsResult<TsStats> {
    let fs = options.sampling_frequency;
    ensure!(
        fs.is_finite() && fs > 0.0,
        InvalidSamplingFrequencySnafu { value: fs }
    );

    if options.check_targets {
        let labels: Vec<Label> = y.iter().map(|&c| Label::from(c)).collect();
        check_ts_data(x, Some(&labels)).context(CheckSnafu)?;
    } else {
        check_ts_data(x, None).context(CheckSnafu)?;
    }

    let parts = x.ts_parts();
    let series = &parts.series;
    ensure!(!series.is_empty(), EmptyBatchSnafu);

    let n_context_vars = parts
        .context
        .as_ref()
        .and_then(|c| c.first())
        .map_or(0, |v| v.len());
    let n_ts_vars = series[0].n_vars();

    let durations: Vec<f64> = series.iter().map(|s| s.len() as f64 / fs).collect();

    // With `check_targets` off, y may be shorter or longer than the batch;
    // only labels that pair with a series count.
    let labelled = &y[..y.len().min(series.len())];
    let n_classes = match labelled.iter().copied().max() {
        None => 0,
        Some(max_class) => {
            let missing = match options.empty_class {
                EmptyClassPolicy::Reject => first_missing_class(labelled, max_class),
                EmptyClassPolicy::Nan => None,
            };
            if let Some(class) = missing {
                return EmptyClassSnafu { class, max_class }.fail();
            }
            ensure!(
                max_class < MAX_CLASSES,
                TooManyClassesSnafu {
                    max_class,
                    limit: MAX_CLASSES,
                }
            );
            max_class + 1
        }
    };

    let labels = match &options.class_labels {
        Some(names) => {
            ensure!(
                names.len() == n_classes,
                ClassLabelCountSnafu {
                    n_labels: names.len(),
                    n_classes,
                }
            );
            names.clone()
        }
        None => (0..n_classes).map(|c| c.to_string()).collect(),
    };

    let mut per_class: Vec<Vec<f64>> = vec![Vec::new(); n_classes];
    for (&class, &t) in labelled.iter().zip(&durations) {
        per_class[class].push(t);
    }

    let mut by_class = Vec::with_capacity(n_classes);
    for (class, (label, times)) in labels.into_iter().zip(&per_class).enumerate() {
        let stats = match moments(times) {
            Some(m) => ClassStats {
                label,
                n_series: times.len(),
                total_time: m.sum,
                series_time_mean: m.mean,
                series_time_std: m.std,
                series_time_min: m.min,
                series_time_max: m.max,
            },
            None => match options.empty_class {
                EmptyClassPolicy::Reject => {
                    return EmptyClassSnafu {
                        class,
                        max_class: n_classes - 1,
                    }
                    .fail();
                }
                EmptyClassPolicy::Nan => {
                    warn!("class {class} ({label}) has no series; reporting NaN statistics");
                    ClassStats {
                        label,
                        n_series: 0,
                        total_time: 0.0,
                        series_time_mean: f64::NAN,
                        series_time_std: f64::NAN,
                        series_time_min: f64::NAN,
                        series_time_max: f64::NAN,
                    }
                }
            },
        };
        by_class.push(stats);
    }

    let Some(all) = moments(&durations) else {
        return EmptyBatchSnafu.fail();
    };

    Ok(TsStats {
        total: TotalStats {
            n_series: series.len(),
            n_classes,
            n_ts_vars,
            n_context_vars,
            total_time: all.sum,
            series_time_mean: all.mean,
            series_time_std: all.std,
            series_time_range: (all.min, all.max),
        },
        by_class,
    })
}

/// Regime-aware convenience: summarise when the targets are per-series
/// class indices stored as [`Label`]s.
///
/// Fails with [`StatsError::Check`] when the labels are per-timestep or
/// otherwise malformed, and treats non-integral or negative labels as a
/// shape failure of the offending series.
pub fn ts_stats_from_labels<X: SeriesSource + ?Sized>(
    x: &X,
    y: &[Label],
    options: &StatsOptions,
) -> StatsResult<TsStats> {
    let regime = check_ts_data(x, Some(y)).context(CheckSnafu)?;
    let series_lens = x.ts_parts().series_lengths();

    let mut classes = Vec::with_capacity(y.len());
    for (index, label) in y.iter().enumerate() {
        let class = match (regime, label.as_scalar()) {
            (Some(TargetRegime::PerSeries), Some(v))
                if v.is_finite() && v >= 0.0 && v.fract() == 0.0 =>
            {
                // Saturates above usize::MAX; ts_stats bounds the class count.
                v as usize
            }
            _ => {
                return Err(StatsError::Check {
                    source: CheckError::InconsistentShape {
                        n_offending: 1,
                        offending: vec![ShapeOffender {
                            index,
                            series_len: series_lens[index],
                            target_len: label.len(),
                        }],
                    },
                });
            }
        };
        classes.push(class);
    }

    ts_stats(x, &classes, options)
}
