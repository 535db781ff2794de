use std::{path::Path, sync::Arc};

use arrow::array::{ArrayRef, Float64Builder, Int64Array, ListBuilder};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

fn list_column(rows: &[Vec<f64>]) -> ArrayRef {
    let mut builder = ListBuilder::new(Float64Builder::new());
    for row in rows {
        builder.values().append_slice(row);
        builder.append(true);
    }
    Arc::new(builder.finish())
}

fn write_batch(path: &Path, columns: Vec<(&str, ArrayRef)>) -> TestResult {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, array)| Field::new(*name, array.data_type().clone(), false))
        .collect();
    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(
        Arc::clone(&schema),
        columns.into_iter().map(|(_, array)| array).collect(),
    )?;

    let file = std::fs::File::create(path)?;
    let props = parquet::file::properties::WriterProperties::builder().build();
    let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Series with the given lengths, a numeric `age` context column and an
/// integer `label` column.
pub fn write_labelled_series(path: &Path, lengths: &[usize], labels: &[i64]) -> TestResult {
    let rows: Vec<Vec<f64>> = lengths
        .iter()
        .enumerate()
        .map(|(k, &n)| (0..n).map(|i| (k * 1_000 + i) as f64).collect())
        .collect();
    let ages: Vec<f64> = (0..lengths.len()).map(|k| 30.0 + k as f64).collect();

    write_batch(
        path,
        vec![
            ("ts_data", list_column(&rows)),
            ("age", Arc::new(arrow::array::Float64Array::from(ages)) as _),
            ("label", Arc::new(Int64Array::from(labels.to_vec())) as _),
        ],
    )
}

/// Series with one target per timestep in the `label` column.
pub fn write_dense_labels(path: &Path, lengths: &[usize], target_lengths: &[usize]) -> TestResult {
    let rows: Vec<Vec<f64>> = lengths.iter().map(|&n| vec![1.0; n]).collect();
    let targets: Vec<Vec<f64>> = target_lengths
        .iter()
        .map(|&n| (0..n).map(|i| i as f64).collect())
        .collect();

    write_batch(
        path,
        vec![("ts_data", list_column(&rows)), ("label", list_column(&targets))],
    )
}
