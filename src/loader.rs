//! Dataset loading with fallback-path discovery and a process-wide cache.
//!
//! The loader reads the whole file once, normalizes headers, applies the
//! column alias table, infers the schema, and coerces the two special columns
//! (`player_name` to trimmed strings, `player_sub` to booleans with empty
//! cells as `false`). The resulting [`RecordTable`] is immutable; repeated
//! loads for the same path pair are served from [`load_cached`].

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, OnceLock},
};

use log::{debug, info};

use crate::{
    data::{Value, normalize_column_name, parse_typed_value},
    error::DatasetError,
    frame::RecordTable,
    io_utils,
    schema::{self, ColumnType},
};

pub const PLAYER_NAME_COLUMN: &str = "player_name";
pub const PLAYER_SUB_COLUMN: &str = "player_sub";

/// Alias pairs `(expected, alternate)`: when the expected statistic column is
/// absent but `_{alternate}` is present, the alternate is renamed to the
/// expected name. This is configuration carried from the source dataset, not
/// logic; most entries are inert for well-formed exports.
pub const COLUMN_ALIASES: &[(&str, &str)] = &[
    ("statistics_total_passes", "statistics_total_passes"),
    ("statistics_total_shots", "statistics_total_shots"),
    ("statistics_accurate_passes", "statistics_accurate_passes"),
    ("statistics_goals", "statistics_goals"),
];

/// Loads the dataset from `primary`, or from `fallback` when the primary file
/// is absent. Both missing is fatal: no dependent computation may run.
pub fn load(primary: &Path, fallback: &Path) -> Result<RecordTable, DatasetError> {
    load_with(primary, fallback, None)
}

pub fn load_with(
    primary: &Path,
    fallback: &Path,
    delimiter: Option<u8>,
) -> Result<RecordTable, DatasetError> {
    let path = resolve_existing_path(primary, fallback)?;
    let delimiter = io_utils::resolve_input_delimiter(path, delimiter);
    let table = read_table(path, delimiter)?;
    info!(
        "Loaded {} row(s) across {} column(s) from {:?}",
        table.row_count(),
        table.schema.columns.len(),
        path
    );
    Ok(table)
}

/// Memoized variant keyed by the `(primary, fallback)` path pair for the
/// lifetime of the process. The source file is static, so no invalidation is
/// needed; correctness does not depend on the cache.
pub fn load_cached(
    primary: &Path,
    fallback: &Path,
    delimiter: Option<u8>,
) -> Result<Arc<RecordTable>, DatasetError> {
    static CACHE: OnceLock<Mutex<HashMap<(PathBuf, PathBuf), Arc<RecordTable>>>> = OnceLock::new();
    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let key = (primary.to_path_buf(), fallback.to_path_buf());

    if let Ok(guard) = cache.lock()
        && let Some(hit) = guard.get(&key)
    {
        debug!("Dataset cache hit for {:?}", key.0);
        return Ok(Arc::clone(hit));
    }

    let table = Arc::new(load_with(primary, fallback, delimiter)?);
    if let Ok(mut guard) = cache.lock() {
        guard.insert(key, Arc::clone(&table));
    }
    Ok(table)
}

fn resolve_existing_path<'a>(
    primary: &'a Path,
    fallback: &'a Path,
) -> Result<&'a Path, DatasetError> {
    if primary.exists() {
        return Ok(primary);
    }
    debug!("Primary path {primary:?} absent, trying fallback {fallback:?}");
    if fallback.exists() {
        return Ok(fallback);
    }
    Err(DatasetError::NotFound {
        primary: primary.to_path_buf(),
        fallback: fallback.to_path_buf(),
    })
}

fn read_table(path: &Path, delimiter: u8) -> Result<RecordTable, DatasetError> {
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)
        .map_err(|err| parse_error(path, err.to_string()))?;

    let raw_headers = reader
        .headers()
        .map_err(|err| parse_error(path, err.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();
    let mut headers = normalize_headers(&raw_headers);
    apply_column_aliases(&mut headers);

    let mut raw_rows = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record =
            record.map_err(|err| parse_error(path, format!("row {}: {err}", row_idx + 2)))?;
        raw_rows.push(record.iter().map(|field| field.to_string()).collect::<Vec<_>>());
    }

    let mut schema = schema::infer_schema(&headers, &raw_rows);
    apply_type_overrides(&mut schema);

    let mut rows = Vec::with_capacity(raw_rows.len());
    for (row_idx, raw) in raw_rows.iter().enumerate() {
        let typed = parse_row(&schema, raw)
            .map_err(|message| parse_error(path, format!("row {}: {message}", row_idx + 2)))?;
        rows.push(typed);
    }

    Ok(RecordTable { schema, rows })
}

fn parse_error(path: &Path, message: String) -> DatasetError {
    DatasetError::Parse {
        path: path.to_path_buf(),
        message,
    }
}

/// Normalizes every header and keeps names unique by suffixing duplicates
/// with their occurrence count.
fn normalize_headers(raw: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw.iter()
        .map(|header| {
            let normalized = normalize_column_name(header);
            let count = seen.entry(normalized.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                normalized
            } else {
                format!("{normalized}_{count}")
            }
        })
        .collect()
}

fn apply_column_aliases(headers: &mut [String]) {
    for (expected, alternate) in COLUMN_ALIASES {
        if headers.iter().any(|h| h == expected) {
            continue;
        }
        let prefixed = format!("_{alternate}");
        if let Some(slot) = headers.iter_mut().find(|h| **h == prefixed) {
            debug!("Renaming aliased column '{prefixed}' to '{expected}'");
            *slot = (*expected).to_string();
        }
    }
}

fn apply_type_overrides(schema: &mut schema::Schema) {
    if let Some(idx) = schema.column_index(PLAYER_NAME_COLUMN) {
        schema.columns[idx].data_type = ColumnType::String;
    }
    if let Some(idx) = schema.column_index(PLAYER_SUB_COLUMN) {
        schema.columns[idx].data_type = ColumnType::Boolean;
    }
}

fn parse_row(schema: &schema::Schema, raw: &[String]) -> Result<Vec<Option<Value>>, String> {
    schema
        .columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let cell = raw.get(idx).map(|s| s.as_str()).unwrap_or("");
            match column.name.as_str() {
                PLAYER_NAME_COLUMN => {
                    let trimmed = cell.trim();
                    Ok((!trimmed.is_empty()).then(|| Value::String(trimmed.to_string())))
                }
                PLAYER_SUB_COLUMN if cell.trim().is_empty() => Ok(Some(Value::Boolean(false))),
                _ => parse_typed_value(cell.trim(), &column.data_type)
                    .map_err(|err| format!("column '{}': {err}", column.name)),
            }
        })
        .collect()
}
