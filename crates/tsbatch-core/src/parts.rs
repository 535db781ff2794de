//! Splitting any supported batch into homogeneous series and context arrays.
//!
//! Consumers never inspect concrete container types. Instead they ask a
//! [`SeriesSource`] for its [`TsParts`]: the composite [`TsData`] hands out
//! borrowed series plus its context, while bare arrays report their rows as
//! series and no context at all.

use std::borrow::Cow;

use ndarray::{Array1, Array2, Array3, Axis};

use crate::{series::Series, ts_data::TsData};

/// Series and optional context extracted from a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct TsParts<'a> {
    /// One entry per series, in batch order.
    pub series: Cow<'a, [Series]>,
    /// One context vector per series, or `None` when the source has none.
    pub context: Option<Cow<'a, [Array1<f64>]>>,
}

impl TsParts<'_> {
    /// Number of series.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// True if there are no series.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Timestep count of every series.
    pub fn series_lengths(&self) -> Vec<usize> {
        self.series.iter().map(Series::len).collect()
    }
}

/// A batch that can report its series and (optionally) its context.
pub trait SeriesSource {
    /// Expose the series and context of this batch.
    fn ts_parts(&self) -> TsParts<'_>;
}

impl SeriesSource for TsData {
    fn ts_parts(&self) -> TsParts<'_> {
        TsParts {
            series: Cow::Borrowed(self.series()),
            context: self.context().map(Cow::Borrowed),
        }
    }
}

impl SeriesSource for [Series] {
    fn ts_parts(&self) -> TsParts<'_> {
        TsParts {
            series: Cow::Borrowed(self),
            context: None,
        }
    }
}

impl SeriesSource for Vec<Series> {
    fn ts_parts(&self) -> TsParts<'_> {
        self.as_slice().ts_parts()
    }
}

/// Rectangular univariate batch: one row per series.
impl SeriesSource for Array2<f64> {
    fn ts_parts(&self) -> TsParts<'_> {
        let series = self
            .axis_iter(Axis(0))
            .map(|row| Series::from(row.to_owned()))
            .collect::<Vec<_>>();
        TsParts {
            series: Cow::Owned(series),
            context: None,
        }
    }
}

/// Rectangular multivariate batch shaped `(n_series, timesteps, n_vars)`.
impl SeriesSource for Array3<f64> {
    fn ts_parts(&self) -> TsParts<'_> {
        let series = self
            .axis_iter(Axis(0))
            .map(|slab| Series::multivariate(slab.to_owned()))
            .collect::<Vec<_>>();
        TsParts {
            series: Cow::Owned(series),
            context: None,
        }
    }
}

impl<T: SeriesSource + ?Sized> SeriesSource for &T {
    fn ts_parts(&self) -> TsParts<'_> {
        (**self).ts_parts()
    }
}

/// Separate a batch into its series and context.
///
/// Context is `None` for every source that does not carry one.
pub fn get_ts_data_parts<X: SeriesSource + ?Sized>(x: &X) -> TsParts<'_> {
    x.ts_parts()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array3, array};

    #[test]
    fn ts_data_returns_series_and_context() {
        let series = vec![
            Series::univariate(vec![1.0, 2.0]),
            Series::univariate(vec![3.0]),
        ];
        let context = vec![array![1.0, 2.0], array![3.0, 4.0]];
        let data = TsData::builder(series.clone())
            .context(context.clone())
            .build()
            .unwrap();

        let parts = get_ts_data_parts(&data);
        assert_eq!(parts.series.as_ref(), series.as_slice());
        assert_eq!(parts.context.as_deref(), Some(context.as_slice()));
        assert!(matches!(parts.series, Cow::Borrowed(_)));
    }

    #[test]
    fn ts_data_without_context_reports_none() {
        let data = TsData::new(vec![Series::univariate(vec![1.0])]);
        assert!(get_ts_data_parts(&data).context.is_none());
    }

    #[test]
    fn bare_series_have_no_context() {
        let series = vec![Series::univariate(vec![1.0, 2.0, 3.0])];
        let parts = get_ts_data_parts(&series);
        assert_eq!(parts.series_lengths(), vec![3]);
        assert!(parts.context.is_none());
    }

    #[test]
    fn rectangular_univariate_rows_become_series() {
        let x = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let parts = get_ts_data_parts(&x);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts.series[1].first_var(), vec![4.0, 5.0, 6.0]);
        assert!(parts.series.iter().all(Series::is_univariate));
    }

    #[test]
    fn rectangular_multivariate_slabs_become_series() {
        let x = Array3::<f64>::zeros((4, 10, 3));
        let parts = get_ts_data_parts(&x);
        assert_eq!(parts.series_lengths(), vec![10; 4]);
        assert!(parts.series.iter().all(|s| s.n_vars() == 3));
    }
}
