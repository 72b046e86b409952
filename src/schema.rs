//! Schema model and column type inference.
//!
//! The [`Schema`] is enumerated once at load time; all downstream code resolves
//! columns against it by normalized name and branches on presence instead of
//! failing at access time.

use serde::{Deserialize, Serialize};

use crate::data::normalize_column_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Integer,
    Float,
    Boolean,
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: ColumnType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub columns: Vec<Column>,
}

impl Schema {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let normalized = normalize_column_name(name);
        self.columns.iter().position(|c| c.name == normalized)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.column_index(name).map(|idx| &self.columns[idx])
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn numeric_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| c.data_type.is_numeric())
            .collect()
    }
}

/// Infers one [`ColumnType`] per header from the sampled raw rows. Empty cells
/// do not vote; a column with no populated cells falls back to `String`.
pub fn infer_schema(headers: &[String], rows: &[Vec<String>]) -> Schema {
    let columns = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| Column {
            name: name.clone(),
            data_type: infer_column_type(rows, idx),
        })
        .collect();
    Schema { columns }
}

fn infer_column_type(rows: &[Vec<String>], column_index: usize) -> ColumnType {
    let mut saw_value = false;
    let mut all_boolean = true;
    let mut all_integer = true;
    let mut all_float = true;

    for row in rows {
        let Some(raw) = row.get(column_index) else {
            continue;
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        saw_value = true;
        if all_boolean && !is_boolean_token(trimmed) {
            all_boolean = false;
        }
        if all_integer && trimmed.parse::<i64>().is_err() {
            all_integer = false;
        }
        if all_float && trimmed.parse::<f64>().is_err() {
            all_float = false;
        }
        if !all_boolean && !all_float {
            break;
        }
    }

    if !saw_value {
        ColumnType::String
    } else if all_boolean {
        ColumnType::Boolean
    } else if all_integer {
        ColumnType::Integer
    } else if all_float {
        ColumnType::Float
    } else {
        ColumnType::String
    }
}

// Bare digits stay numeric during inference; only word tokens mark a column
// as boolean.
fn is_boolean_token(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "true" | "false" | "yes" | "no"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn infer_schema_detects_each_type() {
        let headers = vec![
            "player_name".to_string(),
            "statistics_goals".to_string(),
            "rating".to_string(),
            "player_sub".to_string(),
        ];
        let sampled = rows(&[
            &["Alba", "2", "7.5", "true"],
            &["Reis", "0", "6", "false"],
            &["Dias", "", "8.1", ""],
        ]);
        let schema = infer_schema(&headers, &sampled);
        assert_eq!(schema.columns[0].data_type, ColumnType::String);
        assert_eq!(schema.columns[1].data_type, ColumnType::Integer);
        assert_eq!(schema.columns[2].data_type, ColumnType::Float);
        assert_eq!(schema.columns[3].data_type, ColumnType::Boolean);
    }

    #[test]
    fn infer_schema_keeps_digit_columns_numeric() {
        let headers = vec!["flag_like".to_string()];
        let sampled = rows(&[&["1"], &["0"], &["1"]]);
        let schema = infer_schema(&headers, &sampled);
        assert_eq!(schema.columns[0].data_type, ColumnType::Integer);
    }

    #[test]
    fn infer_schema_defaults_empty_column_to_string() {
        let headers = vec!["notes".to_string()];
        let sampled = rows(&[&[""], &[""]]);
        let schema = infer_schema(&headers, &sampled);
        assert_eq!(schema.columns[0].data_type, ColumnType::String);
    }

    #[test]
    fn column_index_normalizes_lookup_names() {
        let schema = Schema {
            columns: vec![Column {
                name: "player_name".to_string(),
                data_type: ColumnType::String,
            }],
        };
        assert_eq!(schema.column_index("Player Name"), Some(0));
        assert_eq!(schema.column_index("player_name"), Some(0));
        assert_eq!(schema.column_index("missing"), None);
    }
}
