//! Encoding a [`TsData`] back into an Arrow `RecordBatch`.
//!
//! The layout mirrors what [`super::decode`] accepts: univariate batches
//! become `List<Float64>`, multivariate batches `List<FixedSizeList<Float64>>`,
//! timestamps `List<Int64>`, identifiers `Int64` and every context position
//! its own `Float64` column.

use std::sync::Arc;

use arrow::array::{
    ArrayRef, FixedSizeListBuilder, Float64Array, Float64Builder, Int64Array, Int64Builder,
    ListBuilder, RecordBatch,
};
use arrow::datatypes::{Field, Schema};
use snafu::prelude::*;

use super::{
    columns::TableColumns,
    error::{ArrowSnafu, ContextWidthMismatchSnafu, MixedSeriesWidthsSnafu, TableResult},
};
use crate::{check::Label, series::Series, ts_data::TsData};

fn encode_series(series: &[Series]) -> TableResult<ArrayRef> {
    let width = series.first().map_or(1, Series::n_vars);
    for (index, s) in series.iter().enumerate() {
        ensure!(
            s.n_vars() == width,
            MixedSeriesWidthsSnafu {
                index,
                expected: width,
                actual: s.n_vars(),
            }
        );
    }

    if width == 1 {
        let mut builder = ListBuilder::new(Float64Builder::new());
        for s in series {
            builder.values().append_slice(&s.first_var());
            builder.append(true);
        }
        return Ok(Arc::new(builder.finish()));
    }

    let mut builder = ListBuilder::new(FixedSizeListBuilder::new(
        Float64Builder::new(),
        width as i32,
    ));
    for s in series {
        let steps = builder.values();
        for row in s.values().rows() {
            steps.values().append_slice(&row.to_vec());
            steps.append(true);
        }
        builder.append(true);
    }
    Ok(Arc::new(builder.finish()))
}

fn encode_timestamps(timestamps: &[Vec<i64>]) -> ArrayRef {
    let mut builder = ListBuilder::new(Int64Builder::new());
    for t in timestamps {
        builder.values().append_slice(t);
        builder.append(true);
    }
    Arc::new(builder.finish())
}

/// Scalar targets become a `Float64` column; any sequence target turns the
/// whole column into `List<Float64>`, with scalars as one-element lists.
pub(crate) fn encode_labels(labels: &[Label]) -> ArrayRef {
    if labels.iter().all(|l| matches!(l, Label::Scalar(_))) {
        let values: Vec<f64> = labels.iter().filter_map(Label::as_scalar).collect();
        return Arc::new(Float64Array::from(values));
    }

    let mut builder = ListBuilder::new(Float64Builder::new());
    for label in labels {
        builder.values().append_slice(&label.values());
        builder.append(true);
    }
    Arc::new(builder.finish())
}

fn encode_context(
    data: &TsData,
    names: Option<&[String]>,
) -> TableResult<Vec<(String, ArrayRef)>> {
    let Some(context) = data.context() else {
        return Ok(Vec::new());
    };

    let width = names.map_or_else(|| data.context_width(), <[String]>::len);
    for (index, row) in context.iter().enumerate() {
        ensure!(
            row.len() == width,
            ContextWidthMismatchSnafu {
                index,
                expected: width,
                actual: row.len(),
            }
        );
    }

    Ok((0..width)
        .map(|j| {
            let name = names
                .map(|n| n[j].clone())
                .unwrap_or_else(|| format!("context_{j}"));
            let values: Float64Array = context.iter().map(|row| row[j]).collect::<Vec<_>>().into();
            (name, Arc::new(values) as ArrayRef)
        })
        .collect())
}

impl TsData {
    /// Encode the batch as one row per series.
    ///
    /// Context columns are named from `context_names` when given (its
    /// length must equal the context width), otherwise `context_0..`.
    pub fn to_record_batch(
        &self,
        columns: &TableColumns,
        context_names: Option<&[String]>,
    ) -> TableResult<RecordBatch> {
        let mut named: Vec<(String, ArrayRef)> = vec![
            (columns.ts_data.clone(), encode_series(self.series())?),
            (
                columns.timestamps.clone(),
                encode_timestamps(self.timestamps()),
            ),
            (
                columns.sernum.clone(),
                Arc::new(Int64Array::from(self.sernum().to_vec())),
            ),
        ];
        named.extend(encode_context(self, context_names)?);

        let fields: Vec<Field> = named
            .iter()
            .map(|(name, array)| Field::new(name, array.data_type().clone(), false))
            .collect();
        let arrays: Vec<ArrayRef> = named.into_iter().map(|(_, array)| array).collect();

        RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).context(ArrowSnafu)
    }
}
