pub mod cli;
pub mod data;
pub mod descriptive;
pub mod error;
pub mod filter;
pub mod frame;
pub mod inference;
pub mod io_utils;
pub mod loader;
pub mod schema;
pub mod table;

use std::{
    env,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, info};
use serde_json::json;

use crate::{
    cli::{
        Cli, Commands, DatasetArgs, FilterArgs, GoalsArgs, IntervalArgs, OptionsArgs, PreviewArgs,
        ReportArgs, TendencyArgs, TestArgs,
    },
    descriptive::{GoalsOutcome, Mode, TendencyOutcome},
    filter::CriterionOutcome,
    frame::RecordTable,
    inference::{Alternative, Estimate},
    table::format_number,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("matchstats", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Preview(args) => handle_preview(&args),
        Commands::Options(args) => handle_options(&args),
        Commands::Goals(args) => handle_goals(&args),
        Commands::Tendency(args) => handle_tendency(&args),
        Commands::Interval(args) => handle_interval(&args),
        Commands::Test(args) => handle_test(&args),
        Commands::Report(args) => handle_report(&args),
    }
}

/// Fallback defaults to the same file name one directory above the input's
/// directory, mirroring where the dataset ships relative to the pages that
/// consume it.
fn default_fallback(primary: &Path) -> PathBuf {
    match (primary.parent().and_then(Path::parent), primary.file_name()) {
        (Some(grandparent), Some(name)) => grandparent.join(name),
        _ => primary.to_path_buf(),
    }
}

fn load_table(dataset: &DatasetArgs) -> Result<RecordTable> {
    let fallback = dataset
        .fallback
        .clone()
        .unwrap_or_else(|| default_fallback(&dataset.input));
    let table = loader::load_cached(&dataset.input, &fallback, dataset.delimiter)?;
    Ok(table.as_ref().clone())
}

fn load_view(
    dataset: &DatasetArgs,
    filters: &FilterArgs,
) -> Result<(RecordTable, Vec<CriterionOutcome>)> {
    let table = load_table(dataset)?;
    let criteria = filter::parse_criteria(&filters.filters)?;
    Ok(filter::apply(&table, &criteria))
}

fn handle_preview(args: &PreviewArgs) -> Result<()> {
    let (view, _) = load_view(&args.dataset, &args.filters)?;
    print_preview(&view, args.rows, args.output.json)
}

fn handle_options(args: &OptionsArgs) -> Result<()> {
    let table = load_table(&args.dataset)?;
    match filter::filter_options(&table, &args.column) {
        Some(values) => {
            if args.output.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "column": args.column,
                        "values": values,
                    }))?
                );
            } else {
                let rows = values.iter().map(|v| vec![v.clone()]).collect::<Vec<_>>();
                table::print_table(&["value".to_string()], &rows);
            }
        }
        None => {
            if args.output.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "column": args.column,
                        "status": "missing_column",
                    }))?
                );
            } else {
                println!("Column '{}' not found in the dataset.", args.column);
            }
        }
    }
    Ok(())
}

fn handle_goals(args: &GoalsArgs) -> Result<()> {
    let (view, _) = load_view(&args.dataset, &args.filters)?;
    print_goals(&view, args.output.json)
}

fn handle_tendency(args: &TendencyArgs) -> Result<()> {
    let (view, _) = load_view(&args.dataset, &args.filters)?;
    print_tendency(&view, &args.column, args.output.json)
}

fn handle_interval(args: &IntervalArgs) -> Result<()> {
    let (view, _) = load_view(&args.dataset, &args.filters)?;
    print_interval(&view, &args.column, args.confidence, args.output.json)
}

fn handle_test(args: &TestArgs) -> Result<()> {
    let (view, _) = load_view(&args.dataset, &args.filters)?;
    print_test(
        &view,
        &args.column,
        args.hypothesized_mean,
        args.alternative.into(),
        args.output.json,
    )
}

fn handle_report(args: &ReportArgs) -> Result<()> {
    let (view, outcomes) = load_view(&args.dataset, &args.filters)?;

    if args.output.json {
        let mut preview = view.to_json_rows();
        preview.truncate(args.rows);
        let report = json!({
            "rows": view.row_count(),
            "filters": outcomes,
            "preview": preview,
            "goals": descriptive::goals_by_player(&view),
            "tendency": descriptive::central_tendency(&view, cli::DEFAULT_TENDENCY_COLUMN),
            "interval": interval_value(&view, cli::DEFAULT_INTERVAL_COLUMN, args.confidence)?,
            "test": test_value(&view, cli::DEFAULT_TEST_COLUMN, None, Alternative::TwoSided)?,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("== Match table ==");
    print_preview(&view, args.rows, false)?;
    println!();
    println!("== Goals by player ==");
    print_goals(&view, false)?;
    println!();
    println!("== Central tendency ({}) ==", cli::DEFAULT_TENDENCY_COLUMN);
    print_tendency(&view, cli::DEFAULT_TENDENCY_COLUMN, false)?;
    println!();
    println!("== Confidence interval ({}) ==", cli::DEFAULT_INTERVAL_COLUMN);
    print_interval(&view, cli::DEFAULT_INTERVAL_COLUMN, args.confidence, false)?;
    println!();
    println!("== One-sample t-test ({}) ==", cli::DEFAULT_TEST_COLUMN);
    print_test(&view, cli::DEFAULT_TEST_COLUMN, None, Alternative::TwoSided, false)
}

fn print_preview(view: &RecordTable, rows: usize, json: bool) -> Result<()> {
    if json {
        let mut preview = view.to_json_rows();
        preview.truncate(rows);
        println!("{}", serde_json::to_string_pretty(&preview)?);
        return Ok(());
    }
    let columns = view.populated_columns();
    let headers = columns
        .iter()
        .map(|&idx| view.schema.columns[idx].name.clone())
        .collect::<Vec<_>>();
    let rendered = view
        .rows
        .iter()
        .take(rows)
        .map(|row| view.render_row(row, &columns))
        .collect::<Vec<_>>();
    table::print_table(&headers, &rendered);
    info!(
        "Previewed {} of {} row(s) across {} populated column(s)",
        rendered.len(),
        view.row_count(),
        columns.len()
    );
    Ok(())
}

fn print_goals(view: &RecordTable, json: bool) -> Result<()> {
    let outcome = descriptive::goals_by_player(view);
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }
    match outcome {
        GoalsOutcome::Scored(report) => {
            let headers = vec!["player".to_string(), "goals".to_string()];
            let rows = report
                .entries
                .iter()
                .map(|entry| vec![entry.player.clone(), format_number(entry.goals)])
                .collect::<Vec<_>>();
            table::print_table(&headers, &rows);
            println!("total goals: {}", format_number(report.total));
            println!(
                "top scorer: {} ({})",
                report.top.player,
                format_number(report.top.goals)
            );
            info!("Aggregated goals for {} player(s)", report.entries.len());
        }
        GoalsOutcome::NoGoals => {
            println!("No goals found with the selected filters.");
        }
        GoalsOutcome::Unavailable(issue) => {
            println!("Goal aggregate unavailable: {issue}.");
        }
    }
    Ok(())
}

fn print_tendency(view: &RecordTable, column: &str, json: bool) -> Result<()> {
    let outcome = descriptive::central_tendency(view, column);
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }
    match outcome {
        TendencyOutcome::Summary(summary) => {
            let headers = ["column", "count", "mean", "median", "mode"]
                .iter()
                .map(|h| h.to_string())
                .collect::<Vec<_>>();
            let mode = match summary.mode {
                Mode::Unique { value } => format_number(value),
                Mode::Undefined { .. } => "undefined".to_string(),
            };
            let rows = vec![vec![
                summary.column.clone(),
                summary.count.to_string(),
                format_number(summary.mean),
                format_number(summary.median),
                mode,
            ]];
            table::print_table(&headers, &rows);
            info!(
                "Computed central tendency over {} value(s) of '{}'",
                summary.count, summary.column
            );
        }
        TendencyOutcome::Insufficient { column, observed } => {
            println!(
                "Not enough data in '{column}' for a central tendency summary ({observed} value(s))."
            );
        }
        TendencyOutcome::Unavailable(issue) => {
            println!("Central tendency unavailable: {issue}.");
        }
    }
    Ok(())
}

fn print_interval(view: &RecordTable, column: &str, confidence: f64, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&interval_value(view, column, confidence)?)?
        );
        return Ok(());
    }
    let values = match view.numeric_column(column) {
        Ok(values) => values,
        Err(issue) => {
            println!("Confidence interval unavailable: {issue}.");
            return Ok(());
        }
    };
    match inference::confidence_interval(&values, confidence)? {
        Estimate::Computed(interval) => {
            let headers = ["column", "confidence", "lower", "upper", "sample_mean", "n"]
                .iter()
                .map(|h| h.to_string())
                .collect::<Vec<_>>();
            let rows = vec![vec![
                column.to_string(),
                format!("{:.0}%", interval.confidence * 100.0),
                format_number(interval.lower),
                format_number(interval.upper),
                format_number(interval.sample_mean),
                interval.sample_size.to_string(),
            ]];
            table::print_table(&headers, &rows);
            info!(
                "Computed {:.0}% confidence interval over {} value(s) of '{column}'",
                interval.confidence * 100.0,
                interval.sample_size
            );
        }
        Estimate::Insufficient { observed, required } => {
            println!(
                "Not enough data in '{column}' for a confidence interval \
                 ({observed} of {required} required value(s))."
            );
        }
    }
    Ok(())
}

fn print_test(
    view: &RecordTable,
    column: &str,
    hypothesized_mean: Option<f64>,
    alternative: Alternative,
    json: bool,
) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&test_value(
                view,
                column,
                hypothesized_mean,
                alternative
            )?)?
        );
        return Ok(());
    }
    let values = match view.numeric_column(column) {
        Ok(values) => values,
        Err(issue) => {
            println!("Hypothesis test unavailable: {issue}.");
            return Ok(());
        }
    };
    let hypothesized = resolve_hypothesized_mean(hypothesized_mean, &values);
    match inference::one_sample_t_test(&values, hypothesized, alternative)? {
        Estimate::Computed(test) => {
            let headers = [
                "column",
                "t_statistic",
                "p_value",
                "alternative",
                "hypothesized_mean",
                "sample_mean",
                "decision",
            ]
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>();
            let decision = if test.reject_null {
                "reject null"
            } else {
                "fail to reject null"
            };
            let rows = vec![vec![
                column.to_string(),
                format_number(test.t_statistic),
                format_number(test.p_value),
                test.alternative.label().to_string(),
                format_number(test.hypothesized_mean),
                format_number(test.sample_mean),
                decision.to_string(),
            ]];
            table::print_table(&headers, &rows);
            info!(
                "Tested '{column}' against mean {} ({}) over {} value(s)",
                format_number(test.hypothesized_mean),
                test.alternative.label(),
                test.sample_size
            );
        }
        Estimate::Insufficient { observed, required } => {
            println!(
                "Not enough data in '{column}' for a hypothesis test \
                 ({observed} of {required} required value(s))."
            );
        }
    }
    Ok(())
}

fn interval_value(view: &RecordTable, column: &str, confidence: f64) -> Result<serde_json::Value> {
    match view.numeric_column(column) {
        Err(issue) => Ok(json!({ "column": column, "status": "unavailable", "issue": issue })),
        Ok(values) => {
            let estimate = inference::confidence_interval(&values, confidence)?;
            Ok(json!({ "column": column, "result": estimate }))
        }
    }
}

fn test_value(
    view: &RecordTable,
    column: &str,
    hypothesized_mean: Option<f64>,
    alternative: Alternative,
) -> Result<serde_json::Value> {
    match view.numeric_column(column) {
        Err(issue) => Ok(json!({ "column": column, "status": "unavailable", "issue": issue })),
        Ok(values) => {
            let hypothesized = resolve_hypothesized_mean(hypothesized_mean, &values);
            let estimate = inference::one_sample_t_test(&values, hypothesized, alternative)?;
            Ok(json!({ "column": column, "result": estimate }))
        }
    }
}

/// The caller-facing default for the hypothesized mean is the sample's own
/// mean, a deliberate UI default that makes the untouched test non-significant
/// by construction.
fn resolve_hypothesized_mean(provided: Option<f64>, values: &[f64]) -> f64 {
    match provided {
        Some(mean) => mean,
        None if values.is_empty() => 0.0,
        None => descriptive::mean(values),
    }
}
