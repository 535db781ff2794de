use tsbatch_core::{CheckError, SplitError, StatsError, TableError};

use snafu::Snafu;

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CliError {
    #[snafu(display(
        "Failed to load a batch from {path}. \
         Ensure the series column exists and holds numeric lists: {source}"
    ))]
    LoadBatch {
        path: String,
        #[snafu(source(from(TableError, Box::new)))]
        source: Box<TableError>,
    },

    #[snafu(display("Failed to read labels from column '{column}': {source}"))]
    ReadLabels {
        column: String,
        #[snafu(source(from(TableError, Box::new)))]
        source: Box<TableError>,
    },

    #[snafu(display("Statistics failed: {source}"))]
    Stats {
        #[snafu(source(from(StatsError, Box::new)))]
        source: Box<StatsError>,
    },

    #[snafu(display("Shape check failed: {source}"))]
    Check {
        #[snafu(source(from(CheckError, Box::new)))]
        source: Box<CheckError>,
    },

    #[snafu(display("Split failed: {source}"))]
    Split {
        #[snafu(source(from(SplitError, Box::new)))]
        source: Box<SplitError>,
    },

    #[snafu(display("Failed to write {path}: {source}"))]
    WriteBatch {
        path: String,
        #[snafu(source(from(TableError, Box::new)))]
        source: Box<TableError>,
    },

    #[snafu(display("Failed to serialize report: {source}"))]
    Json { source: serde_json::Error },

    #[snafu(display("Failed to write output: {source}"))]
    Output { source: std::io::Error },
}
