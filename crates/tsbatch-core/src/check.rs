//! Structural compatibility between a batch of series and its targets.
//!
//! Targets come in exactly two shapes:
//! - **per series**: one scalar label describing each whole series,
//! - **per timestep**: one label for every timestep of every series.
//!
//! The check is all-or-nothing for a batch. A batch where some series carry
//! a single label and others carry a label sequence is rejected, as is any
//! batch where a sequence does not match its series length.

use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::parts::SeriesSource;

/// Maximum number of offending series listed in an [`CheckError::InconsistentShape`].
pub const MAX_REPORTED_OFFENDERS: usize = 8;

/// A target attached to one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    /// One value for the whole series.
    Scalar(f64),
    /// One value per timestep.
    Sequence(Vec<f64>),
}

impl Label {
    /// Number of target values, with a scalar counting as one.
    pub fn len(&self) -> usize {
        match self {
            Label::Scalar(_) => 1,
            Label::Sequence(values) => values.len(),
        }
    }

    /// True only for an empty sequence.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The single value of a length-1 label.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Label::Scalar(v) => Some(*v),
            Label::Sequence(values) if values.len() == 1 => Some(values[0]),
            Label::Sequence(_) => None,
        }
    }

    /// All values as a slice-like vector.
    pub fn values(&self) -> Vec<f64> {
        match self {
            Label::Scalar(v) => vec![*v],
            Label::Sequence(values) => values.clone(),
        }
    }
}

impl From<f64> for Label {
    fn from(value: f64) -> Self {
        Label::Scalar(value)
    }
}

impl From<usize> for Label {
    fn from(value: usize) -> Self {
        Label::Scalar(value as f64)
    }
}

impl From<Vec<f64>> for Label {
    fn from(values: Vec<f64>) -> Self {
        Label::Sequence(values)
    }
}

/// Which target layout a batch was found to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetRegime {
    /// One label per series.
    PerSeries,
    /// One label per timestep.
    PerTimestep,
}

/// A series whose target length fits neither regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeOffender {
    /// Position of the series in the batch.
    pub index: usize,
    /// Number of timesteps in the series.
    pub series_len: usize,
    /// Number of target values supplied for it.
    pub target_len: usize,
}

fn describe_offenders(offenders: &[ShapeOffender]) -> String {
    offenders
        .iter()
        .map(|o| format!("#{} (series_len={}, target_len={})", o.index, o.series_len, o.target_len))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors raised when targets do not fit a batch.
#[derive(Debug, Snafu, Clone, PartialEq)]
#[snafu(visibility(pub(crate)))]
pub enum CheckError {
    /// `y` does not have one entry per series.
    #[snafu(display("Got {n_targets} targets for {n_series} series"))]
    LengthMismatch {
        /// Number of series in the batch.
        n_series: usize,
        /// Number of target entries supplied.
        n_targets: usize,
    },

    /// Target shapes are neither all scalar nor all per-timestep.
    #[snafu(display(
        "Targets are neither one per series nor one per timestep; {n_offending} series offend: {}",
        describe_offenders(offending)
    ))]
    InconsistentShape {
        /// Total number of series failing both regimes.
        n_offending: usize,
        /// The first few offending series.
        offending: Vec<ShapeOffender>,
    },
}

/// Convenience alias for check results.
pub type CheckResult<T> = Result<T, CheckError>;

/// Validate that `y` is structurally compatible with the series in `x`.
///
/// Returns `Ok(None)` when `y` is omitted, otherwise the regime the targets
/// follow. A batch whose series all have one timestep satisfies both
/// regimes and is reported as [`TargetRegime::PerSeries`].
///
/// ```
/// use tsbatch_core::{Label, Series, TargetRegime, check_ts_data};
///
/// let x = vec![Series::univariate(vec![0.0; 5]), Series::univariate(vec![0.0; 7])];
/// let y = vec![Label::from(0.0), Label::from(1.0)];
/// assert_eq!(check_ts_data(&x, Some(&y)).unwrap(), Some(TargetRegime::PerSeries));
/// ```
pub fn check_ts_data<X: SeriesSource + ?Sized>(
    x: &X,
    y: Option<&[Label]>,
) -> CheckResult<Option<TargetRegime>> {
    let parts = x.ts_parts();
    let series_lens = parts.series_lengths();

    let Some(y) = y else {
        return Ok(None);
    };

    ensure!(
        y.len() == series_lens.len(),
        LengthMismatchSnafu {
            n_series: series_lens.len(),
            n_targets: y.len(),
        }
    );

    let target_lens: Vec<usize> = y.iter().map(Label::len).collect();

    if target_lens.iter().all(|&n| n == 1) {
        return Ok(Some(TargetRegime::PerSeries));
    }
    if target_lens.iter().zip(&series_lens).all(|(ny, nx)| ny == nx) {
        return Ok(Some(TargetRegime::PerTimestep));
    }

    let all_offenders: Vec<ShapeOffender> = series_lens
        .iter()
        .zip(&target_lens)
        .enumerate()
        .filter(|(_, (nx, ny))| **ny != 1 && nx != ny)
        .map(|(index, (&series_len, &target_len))| ShapeOffender {
            index,
            series_len,
            target_len,
        })
        .collect();

    // Every series fits one regime on its own, but the batch mixes them.
    let offending = if all_offenders.is_empty() {
        series_lens
            .iter()
            .zip(&target_lens)
            .enumerate()
            .filter(|(_, (nx, ny))| **ny == 1 && **nx != 1)
            .map(|(index, (&series_len, &target_len))| ShapeOffender {
                index,
                series_len,
                target_len,
            })
            .collect()
    } else {
        all_offenders
    };

    InconsistentShapeSnafu {
        n_offending: offending.len(),
        offending: offending
            .into_iter()
            .take(MAX_REPORTED_OFFENDERS)
            .collect::<Vec<_>>(),
    }
    .fail()
}
