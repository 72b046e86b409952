//! The in-memory [`RecordTable`]: an immutable ordered collection of typed
//! rows plus the [`Schema`] enumerated at load time. Filtered views are new
//! tables derived from it; the loaded table itself is never mutated.

use itertools::Itertools;

use crate::{
    data::Value,
    error::ColumnIssue,
    schema::Schema,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    pub schema: Schema,
    pub rows: Vec<Vec<Option<Value>>>,
}

impl RecordTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.schema.column_index(name)
    }

    /// Non-missing values of a numeric column as `f64`, or the reason the
    /// column cannot back a numeric computation.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, ColumnIssue> {
        let Some(idx) = self.schema.column_index(name) else {
            return Err(ColumnIssue::Missing {
                column: name.to_string(),
            });
        };
        if !self.schema.columns[idx].data_type.is_numeric() {
            return Err(ColumnIssue::NotNumeric {
                column: self.schema.columns[idx].name.clone(),
            });
        }
        Ok(self
            .rows
            .iter()
            .filter_map(|row| row.get(idx).and_then(|cell| cell.as_ref()))
            .filter_map(Value::as_numeric)
            .collect())
    }

    /// Distinct non-missing values of a column in their canonical rendering,
    /// sorted ascending. `None` when the column is absent.
    pub fn distinct_values(&self, name: &str) -> Option<Vec<String>> {
        let idx = self.schema.column_index(name)?;
        Some(
            self.rows
                .iter()
                .filter_map(|row| row.get(idx).and_then(|cell| cell.as_ref()))
                .map(Value::as_display)
                .sorted()
                .dedup()
                .collect(),
        )
    }

    /// Indices of columns with at least one populated cell. The match-table
    /// preview drops the rest.
    pub fn populated_columns(&self) -> Vec<usize> {
        (0..self.schema.columns.len())
            .filter(|&idx| {
                self.rows
                    .iter()
                    .any(|row| row.get(idx).is_some_and(|cell| cell.is_some()))
            })
            .collect()
    }

    pub fn render_row(&self, row: &[Option<Value>], columns: &[usize]) -> Vec<String> {
        columns
            .iter()
            .map(|&idx| {
                row.get(idx)
                    .and_then(|cell| cell.as_ref())
                    .map(Value::as_display)
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Rows as JSON objects keyed by column name, the shape handed to an
    /// external presentation layer.
    pub fn to_json_rows(&self) -> Vec<serde_json::Value> {
        let headers = self.schema.headers();
        self.rows
            .iter()
            .map(|row| {
                let mut object = serde_json::Map::with_capacity(headers.len());
                for (idx, name) in headers.iter().enumerate() {
                    let cell = row
                        .get(idx)
                        .and_then(|cell| cell.as_ref())
                        .map(Value::to_json)
                        .unwrap_or(serde_json::Value::Null);
                    object.insert(name.clone(), cell);
                }
                serde_json::Value::Object(object)
            })
            .collect()
    }
}
