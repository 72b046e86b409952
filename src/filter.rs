//! Equality filter engine over a [`RecordTable`].
//!
//! Criteria are conjunctive equality predicates with an `all` sentinel, so
//! application order never changes the resulting row set. A criterion naming
//! an absent column is skipped with a warning, never an error, and the
//! outcome records which path was taken.

use anyhow::{Result, anyhow};
use log::warn;
use serde::Serialize;

use crate::{data::Value, frame::RecordTable};

/// Sentinel filter value that keeps every row.
pub const ALL_SENTINEL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    Equals(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criterion {
    pub column: String,
    pub selection: Selection,
}

impl Criterion {
    pub fn equals(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            selection: Selection::Equals(value.into()),
        }
    }

    pub fn all(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            selection: Selection::All,
        }
    }
}

/// Which path a criterion took during [`apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CriterionOutcome {
    Applied { column: String, retained: usize },
    Skipped { column: String },
}

/// Parses repeatable `column=value` CLI specifications. The value `all` is
/// the sentinel selection.
pub fn parse_criteria(specs: &[String]) -> Result<Vec<Criterion>> {
    specs
        .iter()
        .map(|spec| {
            let (column, value) = spec
                .split_once('=')
                .ok_or_else(|| anyhow!("Invalid filter '{spec}', expected column=value"))?;
            let column = column.trim();
            if column.is_empty() {
                return Err(anyhow!("Invalid filter '{spec}', column name is empty"));
            }
            let value = value.trim();
            if value == ALL_SENTINEL {
                Ok(Criterion::all(column))
            } else {
                Ok(Criterion::equals(column, value))
            }
        })
        .collect()
}

/// Applies the criteria in sequence and returns the derived view together
/// with the per-criterion outcomes. The input table is never mutated.
pub fn apply(table: &RecordTable, criteria: &[Criterion]) -> (RecordTable, Vec<CriterionOutcome>) {
    let mut view = table.clone();
    let mut outcomes = Vec::with_capacity(criteria.len());

    for criterion in criteria {
        match &criterion.selection {
            Selection::All => {
                outcomes.push(CriterionOutcome::Applied {
                    column: criterion.column.clone(),
                    retained: view.row_count(),
                });
            }
            Selection::Equals(value) => {
                let Some(idx) = view.schema.column_index(&criterion.column) else {
                    warn!(
                        "Column '{}' not found, filter skipped",
                        criterion.column
                    );
                    outcomes.push(CriterionOutcome::Skipped {
                        column: criterion.column.clone(),
                    });
                    continue;
                };
                view.rows.retain(|row| {
                    row.get(idx)
                        .and_then(|cell| cell.as_ref())
                        .map(Value::as_display)
                        .is_some_and(|rendered| rendered == *value)
                });
                outcomes.push(CriterionOutcome::Applied {
                    column: criterion.column.clone(),
                    retained: view.row_count(),
                });
            }
        }
    }

    (view, outcomes)
}

/// Distinct sorted values of `column` with the `all` sentinel prepended, the
/// option list a presentation layer offers for that filter. `None` when the
/// column is absent.
pub fn filter_options(table: &RecordTable, column: &str) -> Option<Vec<String>> {
    table.distinct_values(column).map(|mut values| {
        values.insert(0, ALL_SENTINEL.to_string());
        values
    })
}
