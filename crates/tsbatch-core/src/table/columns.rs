//! Column naming for tabular batches.

use arrow::datatypes::Schema;
use serde::{Deserialize, Serialize};

/// Default name of the series column.
pub const TS_DATA_COLUMN: &str = "ts_data";
/// Default name of the timestamps column.
pub const TIMESTAMPS_COLUMN: &str = "timestamps";
/// Default name of the series identifier column.
pub const SERNUM_COLUMN: &str = "sernum";

/// Which table columns play which role.
///
/// Every column that is neither a reserved role column nor listed in
/// `exclude` is treated as a context column. Matching is by name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableColumns {
    /// Column holding one series per row (required).
    pub ts_data: String,
    /// Column holding one timestamp list per row (optional in the table).
    pub timestamps: String,
    /// Column holding one identifier per row (optional in the table).
    pub sernum: String,
    /// Additional columns kept out of context, for example a label column.
    pub exclude: Vec<String>,
}

impl Default for TableColumns {
    fn default() -> Self {
        Self {
            ts_data: TS_DATA_COLUMN.to_string(),
            timestamps: TIMESTAMPS_COLUMN.to_string(),
            sernum: SERNUM_COLUMN.to_string(),
            exclude: Vec::new(),
        }
    }
}

impl TableColumns {
    /// Add a column to the exclusion list.
    pub fn excluding(mut self, column: impl Into<String>) -> Self {
        self.exclude.push(column.into());
        self
    }

    /// True if `name` is a role column or explicitly excluded.
    pub fn is_reserved(&self, name: &str) -> bool {
        name == self.ts_data
            || name == self.timestamps
            || name == self.sernum
            || self.exclude.iter().any(|c| c == name)
    }

    /// Names of the context columns in `schema`, in schema order.
    pub fn context_columns(&self, schema: &Schema) -> Vec<String> {
        schema
            .fields()
            .iter()
            .map(|f| f.name())
            .filter(|name| !self.is_reserved(name))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::{DataType, Field};

    #[test]
    fn context_is_everything_not_reserved() {
        let schema = Schema::new(vec![
            Field::new("sernum", DataType::Int64, false),
            Field::new("age", DataType::Float64, false),
            Field::new("ts_data", DataType::Float64, false),
            Field::new("label", DataType::Int64, false),
            Field::new("height", DataType::Float64, false),
        ]);

        let columns = TableColumns::default();
        assert_eq!(columns.context_columns(&schema), vec!["age", "label", "height"]);

        let columns = columns.excluding("label");
        assert_eq!(columns.context_columns(&schema), vec!["age", "height"]);
    }

    #[test]
    fn deserializes_partial_config() {
        let columns: TableColumns =
            serde_json::from_str(r#"{"ts_data": "signal", "exclude": ["y"]}"#).unwrap();
        assert_eq!(columns.ts_data, "signal");
        assert_eq!(columns.timestamps, TIMESTAMPS_COLUMN);
        assert!(columns.is_reserved("y"));
    }
}
