//! Error types and SNAFU context selectors for the tabular entry points.

use arrow::{datatypes::DataType, error::ArrowError};
use parquet::errors::ParquetError;
use snafu::prelude::*;

use crate::{series::SeriesError, ts_data::TsDataError};

/// Errors from converting between Arrow/Parquet tables and [`crate::TsData`].
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TableError {
    /// A required column is not present in the table.
    #[snafu(display("Missing required column {column}"))]
    MissingColumn {
        /// Name of the absent column.
        column: String,
    },

    /// A column has an Arrow type this crate cannot decode for its role.
    #[snafu(display("Unsupported type for column {column}: {datatype} (expected {expected})"))]
    UnsupportedColumnType {
        /// Name of the column.
        column: String,
        /// The Arrow type found.
        datatype: DataType,
        /// Human-readable description of the accepted types.
        expected: &'static str,
    },

    /// A consumed column holds a null where a value is required.
    #[snafu(display("Column {column} has a null value at row {row}"))]
    NullValue {
        /// Name of the column.
        column: String,
        /// Row (series) index of the null.
        row: usize,
    },

    /// A series could not be assembled from its list cell.
    #[snafu(display("Column {column}, row {row}: {source}"))]
    InvalidSeries {
        /// Name of the series column.
        column: String,
        /// Row (series) index.
        row: usize,
        /// Underlying series construction error.
        source: SeriesError,
    },

    /// Multivariate series in one batch disagree on their width.
    #[snafu(display("Series {index} has {actual} variables, expected {expected}"))]
    MixedSeriesWidths {
        /// Position of the offending series.
        index: usize,
        /// Width of the first series.
        expected: usize,
        /// Width of the offending series.
        actual: usize,
    },

    /// Context vectors disagree on their width, so they cannot become columns.
    #[snafu(display("Context vector {index} has {actual} values, expected {expected}"))]
    ContextWidthMismatch {
        /// Position of the offending series.
        index: usize,
        /// Width expected from the first context vector (or the names).
        expected: usize,
        /// Width of the offending vector.
        actual: usize,
    },

    /// The decoded components do not form a valid container.
    #[snafu(display("Decoded table is not a valid batch: {source}"))]
    Container {
        /// Underlying container validation error.
        source: TsDataError,
    },

    /// Arrow compute, cast or batch construction failure.
    #[snafu(display("Arrow error: {source}"))]
    Arrow {
        /// Underlying Arrow error.
        source: ArrowError,
    },

    /// Parquet read or write failure.
    #[snafu(display("Parquet error for {path}: {source}"))]
    Parquet {
        /// File being read or written.
        path: String,
        /// Underlying Parquet error.
        source: ParquetError,
    },

    /// Filesystem failure while opening or creating a Parquet file.
    #[snafu(display("I/O error for {path}: {source}"))]
    Io {
        /// File being read or written.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Convenience alias for table results.
pub type TableResult<T> = Result<T, TableError>;
