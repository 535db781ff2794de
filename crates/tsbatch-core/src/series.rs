//! A single variable-length time series.
//!
//! Every series is stored as a 2-D `(timesteps, n_vars)` array of `f64`.
//! Univariate series are simply the `n_vars == 1` case, so downstream code
//! never has to branch on dimensionality to find the timestep count.

use ndarray::{Array1, Array2, ArrayView2, Axis, ShapeError, s};
use snafu::prelude::*;

/// Errors raised while building a [`Series`] from row-oriented input.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SeriesError {
    /// Rows of a multivariate series do not share one width.
    #[snafu(display("Ragged series: row {row} has {actual} values, expected {expected}"))]
    RaggedRows {
        /// Index of the first offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        actual: usize,
    },

    /// A flat buffer was given zero variables per timestep.
    #[snafu(display("Series must have at least one variable per timestep"))]
    ZeroWidth,

    /// A flat buffer is not a whole number of timesteps.
    #[snafu(display("{len} values do not split into rows of {n_vars}"))]
    PartialRow {
        /// Number of values in the buffer.
        len: usize,
        /// Requested variables per timestep.
        n_vars: usize,
    },

    /// The flattened values could not be arranged into a 2-D array.
    #[snafu(display("Cannot shape series values: {source}"))]
    Shape {
        /// Underlying ndarray shape error.
        source: ShapeError,
    },
}

/// One series: `len()` timesteps, each carrying `n_vars()` observations.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    values: Array2<f64>,
}

impl Series {
    /// Build a univariate series (one observation per timestep).
    pub fn univariate(values: impl Into<Vec<f64>>) -> Self {
        let column = Array1::from(values.into());
        Self {
            values: column.insert_axis(Axis(1)),
        }
    }

    /// Wrap a `(timesteps, n_vars)` array.
    pub fn multivariate(values: Array2<f64>) -> Self {
        Self { values }
    }

    /// Build a series from one row of observations per timestep.
    ///
    /// An empty `rows` yields an empty univariate series.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, SeriesError> {
        let width = rows.first().map_or(1, Vec::len);
        let mut flat = Vec::with_capacity(rows.len() * width);
        for (row, values) in rows.iter().enumerate() {
            ensure!(
                values.len() == width,
                RaggedRowsSnafu {
                    row,
                    expected: width,
                    actual: values.len(),
                }
            );
            flat.extend_from_slice(values);
        }

        let values = Array2::from_shape_vec((rows.len(), width), flat).context(ShapeSnafu)?;
        Ok(Self { values })
    }

    /// Build a series from row-major values with `n_vars` per timestep.
    pub fn from_flat(flat: Vec<f64>, n_vars: usize) -> Result<Self, SeriesError> {
        ensure!(n_vars > 0, ZeroWidthSnafu);
        ensure!(
            flat.len() % n_vars == 0,
            PartialRowSnafu {
                len: flat.len(),
                n_vars,
            }
        );
        let values =
            Array2::from_shape_vec((flat.len() / n_vars, n_vars), flat).context(ShapeSnafu)?;
        Ok(Self { values })
    }

    /// Number of timesteps.
    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    /// True if the series has no timesteps.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of variables observed at each timestep.
    pub fn n_vars(&self) -> usize {
        self.values.ncols()
    }

    /// True when each timestep carries a single scalar.
    pub fn is_univariate(&self) -> bool {
        self.n_vars() == 1
    }

    /// Borrow the underlying `(timesteps, n_vars)` values.
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// First variable of every timestep, as a flat vector.
    pub fn first_var(&self) -> Vec<f64> {
        self.values.column(0).to_vec()
    }

    /// The first `n` timesteps (clamped to `len()`).
    pub fn head(&self, n: usize) -> Self {
        let n = n.min(self.len());
        Self {
            values: self.values.slice(s![..n, ..]).to_owned(),
        }
    }

    /// Timesteps from `start` to the end (empty if `start >= len()`).
    pub fn tail_from(&self, start: usize) -> Self {
        let start = start.min(self.len());
        Self {
            values: self.values.slice(s![start.., ..]).to_owned(),
        }
    }

    /// Consume the series and return its values.
    pub fn into_values(self) -> Array2<f64> {
        self.values
    }
}

impl From<Vec<f64>> for Series {
    fn from(values: Vec<f64>) -> Self {
        Self::univariate(values)
    }
}

impl From<Array1<f64>> for Series {
    fn from(values: Array1<f64>) -> Self {
        Self {
            values: values.insert_axis(Axis(1)),
        }
    }
}

impl From<Array2<f64>> for Series {
    fn from(values: Array2<f64>) -> Self {
        Self::multivariate(values)
    }
}
