//! Decoding Arrow columns into series, timestamps, identifiers and context.
//!
//! Accepted layouts (rows = series):
//! - series: `List`/`LargeList` of a numeric type (univariate) or of a
//!   `FixedSizeList` of a numeric type (multivariate, width = variables),
//! - timestamps: `List`/`LargeList` of an integer or timestamp type,
//! - identifiers: any integer type,
//! - context and scalar labels: any numeric type.
//!
//! Numeric values are cast to `f64`, integers and timestamps to `i64` (in
//! the column's own unit). Nulls in consumed cells are rejected.

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use snafu::prelude::*;

use super::error::{
    ArrowSnafu, InvalidSeriesSnafu, NullValueSnafu, TableResult, UnsupportedColumnTypeSnafu,
};
use crate::{check::Label, series::Series};

const NUMERIC: &str = "a numeric type";
const NUMERIC_LIST: &str = "a list of numbers or of fixed-size numeric lists";
const INTEGER: &str = "an integer type";
const INTEGER_LIST: &str = "a list of integers or timestamps";
const LABEL: &str = "a numeric type or a list of numbers";

fn is_integer_like(dt: &DataType) -> bool {
    dt.is_integer() || matches!(dt, DataType::Timestamp(_, _))
}

/// Split a `List`/`LargeList` column into one child array per row.
fn list_cells(
    column: &str,
    array: &ArrayRef,
    expected: &'static str,
) -> TableResult<Vec<ArrayRef>> {
    let cells: Option<Vec<Option<ArrayRef>>> = match array.data_type() {
        DataType::List(_) => array.as_list_opt::<i32>().map(|l| l.iter().collect()),
        DataType::LargeList(_) => array.as_list_opt::<i64>().map(|l| l.iter().collect()),
        _ => None,
    };
    let cells = cells.context(UnsupportedColumnTypeSnafu {
        column,
        datatype: array.data_type().clone(),
        expected,
    })?;

    cells
        .into_iter()
        .enumerate()
        .map(|(row, cell)| cell.context(NullValueSnafu { column, row }))
        .collect()
}

fn element_type(array: &ArrayRef) -> Option<&DataType> {
    match array.data_type() {
        DataType::List(field) | DataType::LargeList(field) => Some(field.data_type()),
        _ => None,
    }
}

/// Cast a flat numeric array to `f64` values, rejecting nulls.
pub(crate) fn numeric_values(column: &str, row: usize, array: &ArrayRef) -> TableResult<Vec<f64>> {
    ensure!(
        array.data_type().is_numeric(),
        UnsupportedColumnTypeSnafu {
            column,
            datatype: array.data_type().clone(),
            expected: NUMERIC,
        }
    );
    ensure!(array.null_count() == 0, NullValueSnafu { column, row });

    let cast = cast(array, &DataType::Float64).context(ArrowSnafu)?;
    let values = cast
        .as_primitive_opt::<Float64Type>()
        .map(|a| a.values().to_vec())
        .unwrap_or_default();
    Ok(values)
}

/// Cast a flat integer or timestamp array to `i64` values, rejecting nulls.
fn integer_values(column: &str, row: usize, array: &ArrayRef) -> TableResult<Vec<i64>> {
    ensure!(
        is_integer_like(array.data_type()),
        UnsupportedColumnTypeSnafu {
            column,
            datatype: array.data_type().clone(),
            expected: INTEGER,
        }
    );
    ensure!(array.null_count() == 0, NullValueSnafu { column, row });

    let cast = cast(array, &DataType::Int64).context(ArrowSnafu)?;
    let values = cast
        .as_primitive_opt::<Int64Type>()
        .map(|a| a.values().to_vec())
        .unwrap_or_default();
    Ok(values)
}

/// Find the first null in a flat column, if any.
fn first_null(array: &ArrayRef) -> Option<usize> {
    (0..array.len()).find(|&i| array.is_null(i))
}

/// Decode the series column.
pub(crate) fn decode_series(column: &str, array: &ArrayRef) -> TableResult<Vec<Series>> {
    let multivariate = match element_type(array) {
        Some(DataType::FixedSizeList(inner, _)) if inner.data_type().is_numeric() => true,
        Some(dt) if dt.is_numeric() => false,
        _ => {
            return UnsupportedColumnTypeSnafu {
                column,
                datatype: array.data_type().clone(),
                expected: NUMERIC_LIST,
            }
            .fail();
        }
    };

    let cells = list_cells(column, array, NUMERIC_LIST)?;
    let mut series = Vec::with_capacity(cells.len());

    for (row, cell) in cells.iter().enumerate() {
        if !multivariate {
            series.push(Series::univariate(numeric_values(column, row, cell)?));
            continue;
        }

        let Some(steps) = cell.as_fixed_size_list_opt() else {
            return UnsupportedColumnTypeSnafu {
                column,
                datatype: array.data_type().clone(),
                expected: NUMERIC_LIST,
            }
            .fail();
        };
        ensure!(steps.null_count() == 0, NullValueSnafu { column, row });

        let n_vars = steps.value_length() as usize;
        let mut flat = Vec::with_capacity(steps.len() * n_vars);
        for step in 0..steps.len() {
            flat.extend(numeric_values(column, row, &steps.value(step))?);
        }
        let s = Series::from_flat(flat, n_vars).context(InvalidSeriesSnafu { column, row })?;
        series.push(s);
    }

    Ok(series)
}

/// Decode the timestamps column.
pub(crate) fn decode_timestamps(column: &str, array: &ArrayRef) -> TableResult<Vec<Vec<i64>>> {
    match element_type(array) {
        Some(dt) if is_integer_like(dt) => {}
        _ => {
            return UnsupportedColumnTypeSnafu {
                column,
                datatype: array.data_type().clone(),
                expected: INTEGER_LIST,
            }
            .fail();
        }
    }

    list_cells(column, array, INTEGER_LIST)?
        .iter()
        .enumerate()
        .map(|(row, cell)| integer_values(column, row, cell))
        .collect()
}

/// Decode the identifier column.
pub(crate) fn decode_sernum(column: &str, array: &ArrayRef) -> TableResult<Vec<i64>> {
    if let Some(row) = first_null(array) {
        return NullValueSnafu { column, row }.fail();
    }
    integer_values(column, 0, array)
}

/// Decode context columns into one vector per row.
pub(crate) fn decode_context(
    columns: &[(String, ArrayRef)],
    n_rows: usize,
) -> TableResult<Vec<ndarray::Array1<f64>>> {
    let mut decoded = Vec::with_capacity(columns.len());
    for (name, array) in columns {
        if let Some(row) = first_null(array) {
            return NullValueSnafu {
                column: name.as_str(),
                row,
            }
            .fail();
        }
        decoded.push(numeric_values(name, 0, array)?);
    }

    Ok((0..n_rows)
        .map(|row| decoded.iter().map(|col| col[row]).collect())
        .collect())
}

/// Decode a label column: scalars for numeric columns, sequences for lists.
pub(crate) fn decode_labels(column: &str, array: &ArrayRef) -> TableResult<Vec<Label>> {
    if array.data_type().is_numeric() {
        if let Some(row) = first_null(array) {
            return NullValueSnafu { column, row }.fail();
        }
        return Ok(numeric_values(column, 0, array)?
            .into_iter()
            .map(Label::Scalar)
            .collect());
    }

    match element_type(array) {
        Some(dt) if dt.is_numeric() => {}
        _ => {
            return UnsupportedColumnTypeSnafu {
                column,
                datatype: array.data_type().clone(),
                expected: LABEL,
            }
            .fail();
        }
    }

    list_cells(column, array, LABEL)?
        .iter()
        .enumerate()
        .map(|(row, cell)| numeric_values(column, row, cell).map(Label::Sequence))
        .collect()
}
