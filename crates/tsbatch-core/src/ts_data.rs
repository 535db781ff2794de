//! The composite batch container.
//!
//! A [`TsData`] groups N independent series with their optional per-series
//! context vectors, their timestamp vectors and a series identifier
//! (`sernum`). The four arrays are kept position-aligned: every operation
//! that reorders or filters series applies the same positions to all of
//! them.
//!
//! The container is immutable once built. Indexing returns new containers
//! and traversal goes through a separate [`Iter`] cursor, so one batch can
//! be shared freely between readers.

pub mod error;
mod iter;
pub mod selection;

use log::debug;
use ndarray::Array1;
use snafu::prelude::*;

pub use error::{TsDataError, TsDataResult};
pub use iter::Iter;
pub use selection::Selection;

use crate::series::Series;
use error::{LengthMismatchSnafu, TimestampLengthMismatchSnafu};

/// A batch of variable-length series with aligned context, timestamps and ids.
#[derive(Debug, Clone, PartialEq)]
pub struct TsData {
    series: Vec<Series>,
    context: Option<Vec<Array1<f64>>>,
    timestamps: Vec<Vec<i64>>,
    sernum: Vec<i64>,
}

impl TsData {
    /// Build a batch from series alone.
    ///
    /// Context is absent, timestamps default to `0..len` per series and
    /// `sernum` defaults to `0..N`.
    pub fn new(series: Vec<Series>) -> Self {
        let timestamps = default_timestamps(&series);
        let sernum = default_sernum(series.len());
        Self {
            series,
            context: None,
            timestamps,
            sernum,
        }
    }

    /// Start a builder for a batch with optional components.
    pub fn builder(series: Vec<Series>) -> TsDataBuilder {
        TsDataBuilder {
            series,
            context: None,
            timestamps: None,
            sernum: None,
        }
    }

    /// Number of series in the batch.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// True if the batch holds no series.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// The series, in batch order.
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Per-series context vectors, or `None` if no context was supplied.
    pub fn context(&self) -> Option<&[Array1<f64>]> {
        self.context.as_deref()
    }

    /// Width of the first context vector (0 when context is absent).
    ///
    /// Context widths are assumed uniform across the batch; this is not
    /// checked.
    pub fn context_width(&self) -> usize {
        self.context
            .as_ref()
            .and_then(|c| c.first())
            .map_or(0, |v| v.len())
    }

    /// Per-series timestamp vectors.
    pub fn timestamps(&self) -> &[Vec<i64>] {
        &self.timestamps
    }

    /// Per-series identifiers.
    pub fn sernum(&self) -> &[i64] {
        &self.sernum
    }

    /// Restrict the batch to `selection`, keeping all components aligned.
    ///
    /// ```
    /// use tsbatch_core::{Series, TsData};
    ///
    /// let data = TsData::new(vec![
    ///     Series::univariate(vec![1.0]),
    ///     Series::univariate(vec![2.0, 2.0]),
    ///     Series::univariate(vec![3.0, 3.0, 3.0]),
    /// ]);
    /// let picked = data.select([2usize, 0]).unwrap();
    /// assert_eq!(picked.sernum(), &[2, 0]);
    /// assert_eq!(picked.series()[0].len(), 3);
    /// ```
    pub fn select<S: Selection>(&self, selection: S) -> TsDataResult<Self> {
        let positions = selection.positions(self.len())?;
        Ok(self.take_positions(&positions))
    }

    /// The single-series batch at `index`, or `None` if out of range.
    pub fn get(&self, index: usize) -> Option<Self> {
        (index < self.len()).then(|| self.take_positions(&[index]))
    }

    /// Walk the batch one single-series container at a time.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Decompose into `(series, context, timestamps, sernum)`.
    pub fn into_parts(self) -> (Vec<Series>, Option<Vec<Array1<f64>>>, Vec<Vec<i64>>, Vec<i64>) {
        (self.series, self.context, self.timestamps, self.sernum)
    }

    // Positions are already validated by the caller.
    fn take_positions(&self, positions: &[usize]) -> Self {
        Self {
            series: positions.iter().map(|&i| self.series[i].clone()).collect(),
            context: self
                .context
                .as_ref()
                .map(|c| positions.iter().map(|&i| c[i].clone()).collect()),
            timestamps: positions
                .iter()
                .map(|&i| self.timestamps[i].clone())
                .collect(),
            sernum: positions.iter().map(|&i| self.sernum[i]).collect(),
        }
    }
}

/// Builder for [`TsData`] with optional context, timestamps and ids.
#[derive(Debug, Clone)]
pub struct TsDataBuilder {
    series: Vec<Series>,
    context: Option<Vec<Array1<f64>>>,
    timestamps: Option<Vec<Vec<i64>>>,
    sernum: Option<Vec<i64>>,
}

impl TsDataBuilder {
    /// Attach one static covariate vector per series.
    pub fn context(mut self, context: Vec<Array1<f64>>) -> Self {
        self.context = Some(context);
        self
    }

    /// Attach context when present; `None` keeps context absent.
    pub fn maybe_context(mut self, context: Option<Vec<Array1<f64>>>) -> Self {
        self.context = context;
        self
    }

    /// Attach one timestamp vector per series.
    pub fn timestamps(mut self, timestamps: Vec<Vec<i64>>) -> Self {
        self.timestamps = Some(timestamps);
        self
    }

    /// Attach timestamps when present; `None` falls back to `0..len`.
    pub fn maybe_timestamps(mut self, timestamps: Option<Vec<Vec<i64>>>) -> Self {
        self.timestamps = timestamps;
        self
    }

    /// Attach one identifier per series.
    pub fn sernum(mut self, sernum: Vec<i64>) -> Self {
        self.sernum = Some(sernum);
        self
    }

    /// Attach identifiers when present; `None` falls back to `0..N`.
    pub fn maybe_sernum(mut self, sernum: Option<Vec<i64>>) -> Self {
        self.sernum = sernum;
        self
    }

    /// Validate alignment and produce the container.
    ///
    /// Outer lengths of every supplied component must equal the number of
    /// series, and each timestamp vector must match its series length.
    pub fn build(self) -> TsDataResult<TsData> {
        let n = self.series.len();

        if let Some(context) = &self.context {
            ensure!(
                context.len() == n,
                LengthMismatchSnafu {
                    field: "context",
                    expected: n,
                    actual: context.len(),
                }
            );
        }

        let timestamps = match self.timestamps {
            Some(timestamps) => {
                ensure!(
                    timestamps.len() == n,
                    LengthMismatchSnafu {
                        field: "timestamps",
                        expected: n,
                        actual: timestamps.len(),
                    }
                );
                for (index, (s, t)) in self.series.iter().zip(&timestamps).enumerate() {
                    ensure!(
                        s.len() == t.len(),
                        TimestampLengthMismatchSnafu {
                            index,
                            series_len: s.len(),
                            timestamps_len: t.len(),
                        }
                    );
                }
                timestamps
            }
            None => default_timestamps(&self.series),
        };

        let sernum = match self.sernum {
            Some(sernum) => {
                ensure!(
                    sernum.len() == n,
                    LengthMismatchSnafu {
                        field: "sernum",
                        expected: n,
                        actual: sernum.len(),
                    }
                );
                sernum
            }
            None => default_sernum(n),
        };

        debug!(
            "built batch: n_series={n}, context_present={}",
            self.context.is_some()
        );

        Ok(TsData {
            series: self.series,
            context: self.context,
            timestamps,
            sernum,
        })
    }
}

fn default_timestamps(series: &[Series]) -> Vec<Vec<i64>> {
    series.iter().map(|s| (0..s.len() as i64).collect()).collect()
}

fn default_sernum(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}
