//! # tsbatch
//!
//! Variable-length time-series batches for tabular estimator pipelines.
//!
//! This crate is the supported public entry point and provides a small, stable surface.
//!
//! ## Example
//!
//! ```rust
//! use ndarray::array;
//! use tsbatch::prelude::*;
//!
//! let x = TsData::builder(vec![
//!     Series::univariate(vec![0.0; 10]),
//!     Series::univariate(vec![0.0; 20]),
//! ])
//! .context(vec![array![1.0], array![2.0]])
//! .build()
//! .unwrap();
//!
//! let parts = get_ts_data_parts(&x);
//! assert_eq!(parts.series_lengths(), vec![10, 20]);
//!
//! let report = ts_stats(&x, &[0, 1], &StatsOptions::default()).unwrap();
//! assert_eq!(report.total.total_time, 30.0);
//! ```

/// Convenience prelude with the stable, supported surface.
pub mod prelude;

/// Arrow/Parquet conversion namespace (wrapper-only).
pub mod table {
    pub use tsbatch_core::table::{
        TableColumns, TableError, labels_from_column, read_parquet_batch, with_label_column,
        write_parquet_batch,
    };
}

pub use tsbatch_core::check::{CheckError, Label, ShapeOffender, TargetRegime, check_ts_data};
pub use tsbatch_core::parts::{SeriesSource, TsParts, get_ts_data_parts};
pub use tsbatch_core::series::{Series, SeriesError};
pub use tsbatch_core::split::{SplitError, TemporalSplit, temporal_split};
pub use tsbatch_core::stats::{
    ClassStats, EmptyClassPolicy, MAX_CLASSES, StatsError, StatsOptions, TotalStats, TsStats,
    ts_stats, ts_stats_from_labels,
};
pub use tsbatch_core::ts_data::{Iter, Selection, TsData, TsDataBuilder, TsDataError};
