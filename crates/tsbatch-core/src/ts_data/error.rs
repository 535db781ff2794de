//! Error types and SNAFU context selectors for `ts_data`.
//!
//! Construction and indexing both report through [`TsDataError`]; the
//! tabular entry points wrap it inside [`crate::table::TableError`].

use snafu::prelude::*;

/// Errors from building or indexing a [`super::TsData`].
#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum TsDataError {
    /// A per-series array does not have one entry per series.
    #[snafu(display("{field} has {actual} entries but the batch has {expected} series"))]
    LengthMismatch {
        /// Which component was mis-sized (`context`, `timestamps`, `sernum`).
        field: &'static str,
        /// Number of series in the batch.
        expected: usize,
        /// Number of entries supplied for the component.
        actual: usize,
    },

    /// A timestamp vector does not line up with its series.
    #[snafu(display(
        "Series {index} has {series_len} timesteps but {timestamps_len} timestamps"
    ))]
    TimestampLengthMismatch {
        /// Position of the series in the batch.
        index: usize,
        /// Number of timesteps in the series.
        series_len: usize,
        /// Number of timestamps supplied for it.
        timestamps_len: usize,
    },

    /// An index selection points past the end of the batch.
    #[snafu(display("Index {index} is out of bounds for a batch of {len} series"))]
    IndexOutOfBounds {
        /// The offending position.
        index: usize,
        /// Number of series in the batch.
        len: usize,
    },

    /// A boolean mask does not have one flag per series.
    #[snafu(display("Boolean mask has {mask_len} flags but the batch has {len} series"))]
    MaskLengthMismatch {
        /// Length of the supplied mask.
        mask_len: usize,
        /// Number of series in the batch.
        len: usize,
    },

    /// A range selection has its start after its end.
    #[snafu(display("Invalid range {start}..{end}"))]
    InvalidRange {
        /// Inclusive start of the range.
        start: usize,
        /// Exclusive end of the range.
        end: usize,
    },
}

/// Convenience alias for `ts_data` results.
pub type TsDataResult<T> = Result<T, TsDataError>;
