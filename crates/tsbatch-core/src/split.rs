//! Train/test splitting along the time axis.
//!
//! Each series is cut at its own `floor((1 - test_size) * len)` timestep;
//! the earlier part goes to train and the rest to test. This is the only
//! option when a batch holds a single long series. Per-timestep targets are
//! cut at the same point, per-series targets are copied to both halves.

use snafu::prelude::*;

use crate::{
    check::{CheckError, Label, TargetRegime, check_ts_data},
    series::Series,
    ts_data::{TsData, TsDataError},
};

/// Errors raised by [`temporal_split`].
#[derive(Debug, Snafu, Clone, PartialEq)]
#[snafu(visibility(pub(crate)))]
pub enum SplitError {
    /// `test_size` is not strictly between 0 and 1.
    #[snafu(display("test_size must be in (0, 1), got {test_size}"))]
    InvalidTestSize {
        /// The rejected fraction.
        test_size: f64,
    },

    /// Targets do not fit the batch.
    #[snafu(display("Targets do not match the batch: {source}"))]
    Targets {
        /// Underlying shape check failure.
        source: CheckError,
    },

    /// Reassembling one of the halves failed.
    #[snafu(display("Cannot assemble split batch: {source}"))]
    Assemble {
        /// Underlying container error.
        source: TsDataError,
    },
}

/// The four outputs of a temporal split.
#[derive(Debug, Clone, PartialEq)]
pub struct TemporalSplit {
    /// Leading part of every series.
    pub x_train: TsData,
    /// Trailing part of every series.
    pub x_test: TsData,
    /// Targets matching `x_train`.
    pub y_train: Vec<Label>,
    /// Targets matching `x_test`.
    pub y_test: Vec<Label>,
}

fn cut_label(label: &Label, at: usize) -> (Label, Label) {
    let values = label.values();
    let at = at.min(values.len());
    (
        Label::Sequence(values[..at].to_vec()),
        Label::Sequence(values[at..].to_vec()),
    )
}

/// Split every series of `x` (and its targets) along time.
pub fn temporal_split(
    x: &TsData,
    y: &[Label],
    test_size: f64,
) -> Result<TemporalSplit, SplitError> {
    ensure!(
        test_size > 0.0 && test_size < 1.0,
        InvalidTestSizeSnafu { test_size }
    );
    let regime = check_ts_data(x, Some(y)).context(TargetsSnafu)?;

    let train_size = 1.0 - test_size;
    let cuts: Vec<usize> = x
        .series()
        .iter()
        .map(|s| (train_size * s.len() as f64).floor() as usize)
        .collect();

    let halves = |keep_head: bool| -> Result<TsData, SplitError> {
        let series: Vec<Series> = x
            .series()
            .iter()
            .zip(&cuts)
            .map(|(s, &at)| if keep_head { s.head(at) } else { s.tail_from(at) })
            .collect();
        let timestamps: Vec<Vec<i64>> = x
            .timestamps()
            .iter()
            .zip(&cuts)
            .map(|(t, &at)| {
                let at = at.min(t.len());
                if keep_head {
                    t[..at].to_vec()
                } else {
                    t[at..].to_vec()
                }
            })
            .collect();

        TsData::builder(series)
            .maybe_context(x.context().map(<[_]>::to_vec))
            .timestamps(timestamps)
            .sernum(x.sernum().to_vec())
            .build()
            .context(AssembleSnafu)
    };

    let x_train = halves(true)?;
    let x_test = halves(false)?;

    let (y_train, y_test): (Vec<Label>, Vec<Label>) = match regime {
        Some(TargetRegime::PerTimestep) => y
            .iter()
            .zip(&cuts)
            .map(|(label, &at)| cut_label(label, at))
            .unzip(),
        _ => (y.to_vec(), y.to_vec()),
    };

    Ok(TemporalSplit {
        x_train,
        x_test,
        y_train,
        y_test,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn ramp(n: usize) -> Series {
        Series::univariate((0..n).map(|i| i as f64).collect::<Vec<_>>())
    }

    #[test]
    fn splits_series_timestamps_and_dense_targets() {
        let x = TsData::builder(vec![ramp(8), ramp(4)])
            .timestamps(vec![(100..108).collect(), (0..4).collect()])
            .build()
            .unwrap();
        let y: Vec<Label> = vec![
            Label::Sequence((0..8).map(|i| i as f64 * 10.0).collect()),
            Label::Sequence(vec![1.0, 2.0, 3.0, 4.0]),
        ];

        let split = temporal_split(&x, &y, 0.25).unwrap();

        assert_eq!(split.x_train.series()[0].len(), 6);
        assert_eq!(split.x_test.series()[0].len(), 2);
        assert_eq!(split.x_train.series()[1].len(), 3);
        assert_eq!(split.x_test.series()[1].first_var(), vec![3.0]);

        assert_eq!(split.x_test.timestamps()[0], vec![106, 107]);
        assert_eq!(split.y_train[1], Label::Sequence(vec![1.0, 2.0, 3.0]));
        assert_eq!(split.y_test[0], Label::Sequence(vec![60.0, 70.0]));
    }

    #[test]
    fn per_series_targets_are_copied() {
        let x = TsData::builder(vec![ramp(10)])
            .context(vec![array![1.0, 2.0]])
            .sernum(vec![42])
            .build()
            .unwrap();
        let y = vec![Label::Scalar(3.0)];

        let split = temporal_split(&x, &y, 0.5).unwrap();
        assert_eq!(split.y_train, y);
        assert_eq!(split.y_test, y);
        assert_eq!(split.x_train.context(), x.context());
        assert_eq!(split.x_test.sernum(), &[42]);
        assert_eq!(split.x_train.series()[0].len(), 5);
    }

    #[test]
    fn test_size_must_be_a_proper_fraction() {
        let x = TsData::new(vec![ramp(4)]);
        let y = vec![Label::Scalar(0.0)];
        for bad in [0.0, 1.0, -0.5, 1.5] {
            assert!(matches!(
                temporal_split(&x, &y, bad).unwrap_err(),
                SplitError::InvalidTestSize { .. }
            ));
        }
    }

    #[test]
    fn inconsistent_targets_are_rejected() {
        let x = TsData::new(vec![ramp(4), ramp(5)]);
        let y = vec![Label::Sequence(vec![0.0; 4]), Label::Sequence(vec![0.0; 2])];
        assert!(matches!(
            temporal_split(&x, &y, 0.25).unwrap_err(),
            SplitError::Targets { .. }
        ));
    }
}
