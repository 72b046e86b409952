//! Error taxonomy for the analysis pipeline.
//!
//! Loader failures ([`DatasetError`]) are fatal: they abort every dependent
//! computation. Everything else (missing columns, insufficient data, an
//! undefined mode) is a local condition modeled as an explicit result variant
//! on the operation that produced it, never as an error.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset not found at {primary:?} or fallback {fallback:?}")]
    NotFound { primary: PathBuf, fallback: PathBuf },
    #[error("failed to parse dataset {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("confidence level must be strictly between 0 and 1, got {0}")]
    InvalidConfidence(f64),
    #[error("t-distribution unavailable for {df} degrees of freedom")]
    Distribution { df: f64 },
}

/// Non-fatal reason a column cannot back a computation. Callers branch on
/// presence instead of hitting a lookup failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ColumnIssue {
    Missing { column: String },
    NotNumeric { column: String },
}

impl ColumnIssue {
    pub fn column(&self) -> &str {
        match self {
            ColumnIssue::Missing { column } | ColumnIssue::NotNumeric { column } => column,
        }
    }
}

impl fmt::Display for ColumnIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnIssue::Missing { column } => write!(f, "column '{column}' not found"),
            ColumnIssue::NotNumeric { column } => {
                write!(f, "column '{column}' is not numeric")
            }
        }
    }
}
