//! Parquet persistence for tabular batches.
//!
//! Reading concatenates every record batch of the file into one, so row
//! positions in the result are series positions in the file.

use std::{fs::File, path::Path, sync::Arc};

use arrow::{array::RecordBatch, compute::concat_batches, error::ArrowError};
use log::debug;
use parquet::arrow::{ArrowWriter, arrow_reader::ParquetRecordBatchReaderBuilder};
use parquet::file::properties::WriterProperties;
use snafu::prelude::*;

use super::{
    columns::TableColumns,
    error::{ArrowSnafu, IoSnafu, ParquetSnafu, TableResult},
};
use crate::ts_data::TsData;

/// Read a whole Parquet file into a single `RecordBatch`.
pub fn read_parquet_batch(path: &Path) -> TableResult<RecordBatch> {
    let display = path.display().to_string();
    let file = File::open(path).context(IoSnafu { path: &display })?;

    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context(ParquetSnafu { path: &display })?;
    let schema = Arc::clone(builder.schema());
    let reader = builder.build().context(ParquetSnafu { path: &display })?;

    let batches = reader
        .collect::<Result<Vec<_>, ArrowError>>()
        .context(ArrowSnafu)?;
    debug!("read {} record batches from {display}", batches.len());

    concat_batches(&schema, &batches).context(ArrowSnafu)
}

/// Write one `RecordBatch` to a new Parquet file, replacing any existing file.
pub fn write_parquet_batch(path: &Path, batch: &RecordBatch) -> TableResult<()> {
    let display = path.display().to_string();
    let file = File::create(path).context(IoSnafu { path: &display })?;

    let props = WriterProperties::builder().build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .context(ParquetSnafu { path: &display })?;
    writer.write(batch).context(ParquetSnafu { path: &display })?;
    writer.close().context(ParquetSnafu { path: &display })?;
    Ok(())
}

impl TsData {
    /// Load a batch from a Parquet file laid out as described in
    /// [`TsData::from_record_batch`].
    pub fn from_parquet_path(path: &Path, columns: &TableColumns) -> TableResult<Self> {
        let batch = read_parquet_batch(path)?;
        Self::from_record_batch(&batch, columns)
    }

    /// Persist the batch to a Parquet file.
    pub fn write_parquet(
        &self,
        path: &Path,
        columns: &TableColumns,
        context_names: Option<&[String]>,
    ) -> TableResult<()> {
        let batch = self.to_record_batch(columns, context_names)?;
        write_parquet_batch(path, &batch)
    }
}
