//! Wrapper prelude.
//!
//! The `tsbatch` crate is the supported public entry point. Downstream code
//! should prefer importing from this prelude instead of depending on
//! `tsbatch-core` module paths.

pub use crate::table;
pub use crate::{
    EmptyClassPolicy, Label, SeriesSource, Selection, Series, StatsOptions, TargetRegime, TsData,
    TsStats, check_ts_data, get_ts_data_parts, temporal_split, ts_stats, ts_stats_from_labels,
};
