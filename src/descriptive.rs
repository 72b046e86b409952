//! Descriptive statistics: the goals-per-player aggregate and the
//! central-tendency summary (mean, median, mode).
//!
//! Every precondition failure degrades to an explicit outcome variant the
//! presentation layer can render as an informational message.

use std::collections::HashMap;

use itertools::Itertools;
use serde::Serialize;

use crate::{
    data::Value,
    error::ColumnIssue,
    frame::RecordTable,
};

pub const GOALS_COLUMN: &str = "statistics_goals";
pub const PLAYER_COLUMN: &str = "player_name";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerGoals {
    pub player: String,
    pub goals: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalsReport {
    /// Per-player totals sorted by descending goals, ties broken by name.
    pub entries: Vec<PlayerGoals>,
    pub total: f64,
    pub top: PlayerGoals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GoalsOutcome {
    Scored(GoalsReport),
    /// No row had goals above zero under the active filters.
    NoGoals,
    Unavailable(ColumnIssue),
}

/// Sums goals per player over rows with `statistics_goals > 0`.
pub fn goals_by_player(table: &RecordTable) -> GoalsOutcome {
    let Some(goals_idx) = table.column_index(GOALS_COLUMN) else {
        return GoalsOutcome::Unavailable(ColumnIssue::Missing {
            column: GOALS_COLUMN.to_string(),
        });
    };
    if !table.schema.columns[goals_idx].data_type.is_numeric() {
        return GoalsOutcome::Unavailable(ColumnIssue::NotNumeric {
            column: GOALS_COLUMN.to_string(),
        });
    }
    let Some(player_idx) = table.column_index(PLAYER_COLUMN) else {
        return GoalsOutcome::Unavailable(ColumnIssue::Missing {
            column: PLAYER_COLUMN.to_string(),
        });
    };

    let mut totals: HashMap<String, f64> = HashMap::new();
    for row in &table.rows {
        let Some(goals) = row
            .get(goals_idx)
            .and_then(|cell| cell.as_ref())
            .and_then(Value::as_numeric)
        else {
            continue;
        };
        if goals <= 0.0 {
            continue;
        }
        let Some(player) = row.get(player_idx).and_then(|cell| cell.as_ref()) else {
            continue;
        };
        *totals.entry(player.as_display()).or_insert(0.0) += goals;
    }

    if totals.is_empty() {
        return GoalsOutcome::NoGoals;
    }

    let entries = totals
        .into_iter()
        .map(|(player, goals)| PlayerGoals { player, goals })
        .sorted_by(|a, b| {
            b.goals
                .total_cmp(&a.goals)
                .then_with(|| a.player.cmp(&b.player))
        })
        .collect::<Vec<_>>();
    let total = entries.iter().map(|e| e.goals).sum();
    let top = entries[0].clone();
    GoalsOutcome::Scored(GoalsReport {
        entries,
        total,
        top,
    })
}

/// Mode of a sample: a unique most-frequent value, or explicitly undefined
/// when the highest frequency is shared.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mode {
    Unique { value: f64 },
    Undefined { candidates: Vec<f64> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TendencySummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub mode: Mode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TendencyOutcome {
    Summary(TendencySummary),
    Insufficient { column: String, observed: usize },
    Unavailable(ColumnIssue),
}

/// Central-tendency summary for a numeric column, missing values dropped.
pub fn central_tendency(table: &RecordTable, column: &str) -> TendencyOutcome {
    let values = match table.numeric_column(column) {
        Ok(values) => values,
        Err(issue) => return TendencyOutcome::Unavailable(issue),
    };
    if values.is_empty() {
        return TendencyOutcome::Insufficient {
            column: column.to_string(),
            observed: 0,
        };
    }
    TendencyOutcome::Summary(TendencySummary {
        column: column.to_string(),
        count: values.len(),
        mean: mean(&values),
        median: median(&values),
        mode: mode(&values),
    })
}

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn mode(values: &[f64]) -> Mode {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut best: Vec<f64> = Vec::new();
    let mut best_count = 0usize;
    let mut idx = 0;
    while idx < sorted.len() {
        let value = sorted[idx];
        let mut count = 1;
        while idx + count < sorted.len() && sorted[idx + count] == value {
            count += 1;
        }
        if count > best_count {
            best_count = count;
            best = vec![value];
        } else if count == best_count {
            best.push(value);
        }
        idx += count;
    }

    if best.len() == 1 {
        Mode::Unique { value: best[0] }
    } else {
        Mode::Undefined { candidates: best }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, ColumnType, Schema};

    fn goals_table(rows: &[(&str, i64)]) -> RecordTable {
        RecordTable {
            schema: Schema {
                columns: vec![
                    Column {
                        name: PLAYER_COLUMN.to_string(),
                        data_type: ColumnType::String,
                    },
                    Column {
                        name: GOALS_COLUMN.to_string(),
                        data_type: ColumnType::Integer,
                    },
                ],
            },
            rows: rows
                .iter()
                .map(|(player, goals)| {
                    vec![
                        Some(Value::String((*player).to_string())),
                        Some(Value::Integer(*goals)),
                    ]
                })
                .collect(),
        }
    }

    fn numeric_table(column: &str, values: &[f64]) -> RecordTable {
        RecordTable {
            schema: Schema {
                columns: vec![Column {
                    name: column.to_string(),
                    data_type: ColumnType::Float,
                }],
            },
            rows: values
                .iter()
                .map(|v| vec![Some(Value::Float(*v))])
                .collect(),
        }
    }

    #[test]
    fn goals_by_player_sums_and_excludes_zero_rows() {
        let table = goals_table(&[("A", 2), ("B", 0), ("A", 3)]);
        let GoalsOutcome::Scored(report) = goals_by_player(&table) else {
            panic!("expected scored outcome");
        };
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].player, "A");
        assert_eq!(report.entries[0].goals, 5.0);
        assert_eq!(report.total, 5.0);
        assert_eq!(report.top.player, "A");
        assert_eq!(report.top.goals, 5.0);
    }

    #[test]
    fn goals_by_player_sorts_descending_with_name_tiebreak() {
        let table = goals_table(&[("B", 2), ("C", 4), ("A", 2)]);
        let GoalsOutcome::Scored(report) = goals_by_player(&table) else {
            panic!("expected scored outcome");
        };
        let order: Vec<&str> = report.entries.iter().map(|e| e.player.as_str()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
        assert_eq!(report.total, 8.0);
    }

    #[test]
    fn goals_by_player_reports_empty_state() {
        let table = goals_table(&[("A", 0), ("B", 0)]);
        assert_eq!(goals_by_player(&table), GoalsOutcome::NoGoals);
    }

    #[test]
    fn goals_by_player_flags_missing_column() {
        let table = numeric_table("statistics_total_shots", &[1.0]);
        assert_eq!(
            goals_by_player(&table),
            GoalsOutcome::Unavailable(ColumnIssue::Missing {
                column: GOALS_COLUMN.to_string()
            })
        );
    }

    #[test]
    fn central_tendency_flags_multimodal_sample_as_undefined() {
        let table = numeric_table("statistics_total_passes", &[1.0, 1.0, 2.0, 2.0, 3.0]);
        let TendencyOutcome::Summary(summary) =
            central_tendency(&table, "statistics_total_passes")
        else {
            panic!("expected summary outcome");
        };
        assert!((summary.mean - 1.8).abs() < 1e-12);
        assert_eq!(summary.median, 2.0);
        assert_eq!(
            summary.mode,
            Mode::Undefined {
                candidates: vec![1.0, 2.0]
            }
        );
    }

    #[test]
    fn central_tendency_finds_unique_mode() {
        let table = numeric_table("shots", &[4.0, 4.0, 4.0, 2.0, 9.0]);
        let TendencyOutcome::Summary(summary) = central_tendency(&table, "shots") else {
            panic!("expected summary outcome");
        };
        assert_eq!(summary.mode, Mode::Unique { value: 4.0 });
        assert_eq!(summary.median, 4.0);
    }

    #[test]
    fn central_tendency_degrades_without_data() {
        let table = numeric_table("shots", &[]);
        assert_eq!(
            central_tendency(&table, "shots"),
            TendencyOutcome::Insufficient {
                column: "shots".to_string(),
                observed: 0,
            }
        );
        assert_eq!(
            central_tendency(&table, "absent"),
            TendencyOutcome::Unavailable(ColumnIssue::Missing {
                column: "absent".to_string()
            })
        );
    }

    #[test]
    fn median_handles_even_and_odd_lengths() {
        assert_eq!(median(&[1.0, 3.0, 5.0]), 3.0);
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5);
    }
}
