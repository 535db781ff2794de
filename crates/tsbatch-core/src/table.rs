//! Building batches from tabular data.
//!
//! A table stores one series per row. The series column is required; a
//! timestamps column and an identifier column are picked up when present,
//! and every remaining column (minus explicit exclusions) becomes one
//! position of the per-series context vector. When no context columns
//! remain, the batch has no context at all.
//!
//! Arrow `RecordBatch` is the in-memory table type; Parquet files are read
//! and written through the same layout.

pub mod columns;
mod decode;
mod encode;
pub mod error;
pub mod parquet_io;

use std::sync::Arc;

use arrow::array::{ArrayRef, RecordBatch};
use arrow::datatypes::{Field, Schema};
use log::debug;
use snafu::prelude::*;

pub use columns::TableColumns;
pub use error::{TableError, TableResult};
pub use parquet_io::{read_parquet_batch, write_parquet_batch};

use crate::{check::Label, ts_data::TsData};
use error::{ArrowSnafu, ContainerSnafu, MissingColumnSnafu};

fn column<'a>(batch: &'a RecordBatch, name: &str) -> TableResult<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .context(MissingColumnSnafu { column: name })
}

impl TsData {
    /// Build a batch from a table with one series per row.
    ///
    /// Fails with [`TableError::MissingColumn`] when the series column is
    /// absent. Context columns must be numeric.
    pub fn from_record_batch(batch: &RecordBatch, columns: &TableColumns) -> TableResult<Self> {
        let series = decode::decode_series(&columns.ts_data, column(batch, &columns.ts_data)?)?;

        let timestamps = batch
            .column_by_name(&columns.timestamps)
            .map(|array| decode::decode_timestamps(&columns.timestamps, array))
            .transpose()?;

        let sernum = batch
            .column_by_name(&columns.sernum)
            .map(|array| decode::decode_sernum(&columns.sernum, array))
            .transpose()?;

        let schema = batch.schema();
        let context_columns: Vec<(String, ArrayRef)> = columns
            .context_columns(&schema)
            .into_iter()
            .filter_map(|name| {
                let array = batch.column_by_name(&name)?.clone();
                Some((name, array))
            })
            .collect();

        let context = if context_columns.is_empty() {
            None
        } else {
            Some(decode::decode_context(&context_columns, batch.num_rows())?)
        };

        debug!(
            "decoded table: rows={}, context_columns={}, timestamps={}, sernum={}",
            batch.num_rows(),
            context_columns.len(),
            timestamps.is_some(),
            sernum.is_some()
        );

        TsData::builder(series)
            .maybe_context(context)
            .maybe_timestamps(timestamps)
            .maybe_sernum(sernum)
            .build()
            .context(ContainerSnafu)
    }
}

/// Read one target per row from `name`.
///
/// Numeric columns yield [`Label::Scalar`]; list columns yield
/// [`Label::Sequence`].
pub fn labels_from_column(batch: &RecordBatch, name: &str) -> TableResult<Vec<Label>> {
    decode::decode_labels(name, column(batch, name)?)
}

/// Return `batch` with `labels` appended as column `name`.
///
/// This is the inverse of [`labels_from_column`]: all-scalar targets are
/// stored as `Float64`, anything else as `List<Float64>`.
pub fn with_label_column(
    batch: &RecordBatch,
    name: &str,
    labels: &[Label],
) -> TableResult<RecordBatch> {
    let array = encode::encode_labels(labels);

    let schema = batch.schema();
    let mut fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|f| f.as_ref().clone())
        .collect();
    fields.push(Field::new(name, array.data_type().clone(), false));
    let mut arrays = batch.columns().to_vec();
    arrays.push(array);

    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).context(ArrowSnafu)
}

#[cfg(test)]
mod tests {

    use arrow::array::{
        FixedSizeListBuilder, Float64Array, Float64Builder, Int32Array, Int64Builder, ListBuilder,
        StringArray, TimestampMillisecondBuilder,
    };
    use arrow::datatypes::{DataType, Field, Schema};
    use ndarray::array;

    use super::*;
    use crate::{Series, TsDataError};

    fn univariate_column(rows: &[&[f64]]) -> ArrayRef {
        let mut b = ListBuilder::new(Float64Builder::new());
        for r in rows {
            b.values().append_slice(r);
            b.append(true);
        }
        Arc::new(b.finish())
    }

    fn batch_of(cols: Vec<(&str, ArrayRef)>) -> RecordBatch {
        let fields: Vec<Field> = cols
            .iter()
            .map(|(n, a)| Field::new(*n, a.data_type().clone(), true))
            .collect();
        RecordBatch::try_new(
            Arc::new(Schema::new(fields)),
            cols.into_iter().map(|(_, a)| a).collect(),
        )
        .unwrap()
    }

    #[test]
    fn series_only_table() {
        let batch = batch_of(vec![("ts_data", univariate_column(&[&[1.0, 2.0], &[3.0]]))]);
        let data = TsData::from_record_batch(&batch, &TableColumns::default()).unwrap();

        assert_eq!(data.len(), 2);
        assert!(data.context().is_none());
        assert_eq!(data.timestamps(), &[vec![0, 1], vec![0]]);
        assert_eq!(data.sernum(), &[0, 1]);
    }

    #[test]
    fn missing_series_column_errors() {
        let batch = batch_of(vec![("other", Arc::new(Float64Array::from(vec![1.0])) as _)]);
        let err = TsData::from_record_batch(&batch, &TableColumns::default()).unwrap_err();
        assert!(matches!(err, TableError::MissingColumn { column } if column == "ts_data"));
    }

    #[test]
    fn remaining_columns_become_context() {
        let mut ts = ListBuilder::new(TimestampMillisecondBuilder::new());
        ts.values().append_slice(&[1_000, 2_000]);
        ts.append(true);
        ts.values().append_slice(&[5_000]);
        ts.append(true);

        let batch = batch_of(vec![
            ("sernum", Arc::new(arrow::array::Int64Array::from(vec![11, 12])) as _),
            ("ts_data", univariate_column(&[&[1.0, 2.0], &[3.0]])),
            ("timestamps", Arc::new(ts.finish()) as _),
            ("age", Arc::new(Int32Array::from(vec![30, 40])) as _),
            ("weight", Arc::new(Float64Array::from(vec![70.5, 80.5])) as _),
        ]);
        let data = TsData::from_record_batch(&batch, &TableColumns::default()).unwrap();

        assert_eq!(data.sernum(), &[11, 12]);
        assert_eq!(data.timestamps(), &[vec![1_000, 2_000], vec![5_000]]);
        assert_eq!(data.context_width(), 2);
        assert_eq!(data.context().unwrap()[1], array![40.0, 80.5]);
    }

    #[test]
    fn excluded_columns_are_not_context() {
        let batch = batch_of(vec![
            ("ts_data", univariate_column(&[&[1.0]])),
            ("label", Arc::new(Int32Array::from(vec![1])) as _),
        ]);
        let columns = TableColumns::default().excluding("label");
        let data = TsData::from_record_batch(&batch, &columns).unwrap();
        assert!(data.context().is_none());

        let labels = labels_from_column(&batch, "label").unwrap();
        assert_eq!(labels, vec![Label::Scalar(1.0)]);
    }

    #[test]
    fn multivariate_series_column() {
        let mut b = ListBuilder::new(FixedSizeListBuilder::new(Float64Builder::new(), 2));
        for step in [[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]] {
            b.values().values().append_slice(&step);
            b.values().append(true);
        }
        b.append(true);

        let batch = batch_of(vec![("ts_data", Arc::new(b.finish()) as _)]);
        let data = TsData::from_record_batch(&batch, &TableColumns::default()).unwrap();
        assert_eq!(
            data.series()[0],
            Series::multivariate(array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]])
        );
    }

    #[test]
    fn null_series_cell_errors() {
        let mut b = ListBuilder::new(Float64Builder::new());
        b.values().append_value(1.0);
        b.append(true);
        b.append(false);
        let batch = batch_of(vec![("ts_data", Arc::new(b.finish()) as _)]);

        let err = TsData::from_record_batch(&batch, &TableColumns::default()).unwrap_err();
        assert!(matches!(err, TableError::NullValue { row: 1, .. }));
    }

    #[test]
    fn non_numeric_context_errors() {
        let batch = batch_of(vec![
            ("ts_data", univariate_column(&[&[1.0]])),
            ("subject", Arc::new(StringArray::from(vec!["a"])) as _),
        ]);
        let err = TsData::from_record_batch(&batch, &TableColumns::default()).unwrap_err();
        assert!(matches!(
            err,
            TableError::UnsupportedColumnType {
                column,
                datatype: DataType::Utf8,
                ..
            } if column == "subject"
        ));
    }

    #[test]
    fn misaligned_timestamps_error() {
        let mut ts = ListBuilder::new(Int64Builder::new());
        ts.values().append_slice(&[0, 1, 2]);
        ts.append(true);
        let batch = batch_of(vec![
            ("ts_data", univariate_column(&[&[1.0, 2.0]])),
            ("timestamps", Arc::new(ts.finish()) as _),
        ]);

        let err = TsData::from_record_batch(&batch, &TableColumns::default()).unwrap_err();
        assert!(matches!(
            err,
            TableError::Container {
                source: TsDataError::TimestampLengthMismatch { index: 0, .. }
            }
        ));
    }

    #[test]
    fn encode_then_decode_preserves_batch() {
        let data = TsData::builder(vec![
            Series::multivariate(array![[1.0, 2.0], [3.0, 4.0]]),
            Series::multivariate(array![[5.0, 6.0]]),
        ])
        .context(vec![array![0.5], array![1.5]])
        .timestamps(vec![vec![10, 20], vec![30]])
        .sernum(vec![4, 2])
        .build()
        .unwrap();

        let columns = TableColumns::default();
        let names = vec!["dose".to_string()];
        let batch = data.to_record_batch(&columns, Some(&names)).unwrap();
        assert!(batch.schema().field_with_name("dose").is_ok());

        let back = TsData::from_record_batch(&batch, &columns).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn label_column_round_trips() {
        let data = TsData::new(vec![
            Series::univariate(vec![1.0, 2.0]),
            Series::univariate(vec![3.0]),
        ]);
        let batch = data.to_record_batch(&TableColumns::default(), None).unwrap();

        let scalars = vec![Label::Scalar(0.0), Label::Scalar(1.0)];
        let with = with_label_column(&batch, "y", &scalars).unwrap();
        assert_eq!(
            with.schema().field_with_name("y").unwrap().data_type(),
            &DataType::Float64
        );
        assert_eq!(labels_from_column(&with, "y").unwrap(), scalars);

        let dense = vec![Label::Sequence(vec![1.0, 0.0]), Label::Scalar(4.0)];
        let with = with_label_column(&batch, "y", &dense).unwrap();
        assert_eq!(
            labels_from_column(&with, "y").unwrap(),
            vec![Label::Sequence(vec![1.0, 0.0]), Label::Sequence(vec![4.0])]
        );
    }

    #[test]
    fn encoding_mixed_widths_errors() {
        let data = TsData::new(vec![
            Series::univariate(vec![1.0]),
            Series::multivariate(array![[1.0, 2.0]]),
        ]);
        let err = data
            .to_record_batch(&TableColumns::default(), None)
            .unwrap_err();
        assert!(matches!(
            err,
            TableError::MixedSeriesWidths {
                index: 1,
                expected: 1,
                actual: 2
            }
        ));
    }
}
