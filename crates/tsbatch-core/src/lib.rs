//! Core containers and checks for time-series machine-learning batches.
//!
//! Tabular estimator APIs expect fixed-length feature vectors. Time series
//! samples instead have variable length, may carry static per-series
//! covariates ("context") and come with their own timestamps. This crate
//! provides:
//!
//! - [`TsData`], a position-aligned batch of series, context, timestamps and
//!   series identifiers, with fancy indexing and a separate iterator
//!   (`ts_data` module).
//! - [`SeriesSource`] and [`get_ts_data_parts`], which split any supported
//!   batch into homogeneous series and context arrays (`parts` module).
//! - [`check_ts_data`], the all-or-nothing structural check between a batch
//!   and its targets (`check` module).
//! - [`ts_stats`], duration statistics over the batch and per class
//!   (`stats` module).
//! - Arrow/Parquet conversion (`table` module) and time-axis train/test
//!   splitting (`split` module).
#![deny(missing_docs)]

pub mod check;
pub mod parts;
pub mod series;
pub mod split;
pub mod stats;
pub mod table;
pub mod ts_data;

pub use check::{CheckError, Label, TargetRegime, check_ts_data};
pub use parts::{SeriesSource, TsParts, get_ts_data_parts};
pub use series::{Series, SeriesError};
pub use split::{SplitError, TemporalSplit, temporal_split};
pub use stats::{
    ClassStats, EmptyClassPolicy, MAX_CLASSES, StatsError, StatsOptions, TotalStats, TsStats,
    ts_stats, ts_stats_from_labels,
};
pub use table::{TableColumns, TableError, labels_from_column, with_label_column};
pub use ts_data::{Selection, TsData, TsDataBuilder, TsDataError};
