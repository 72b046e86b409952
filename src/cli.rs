use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::inference::Alternative;

/// Default analysis columns, matching the reference dataset's statistic names.
pub const DEFAULT_TENDENCY_COLUMN: &str = "statistics_total_passes";
pub const DEFAULT_INTERVAL_COLUMN: &str = "statistics_total_shots";
pub const DEFAULT_TEST_COLUMN: &str = "statistics_accurate_passes";

#[derive(Debug, Parser)]
#[command(author, version, about = "Analyze club match and player statistics from CSV", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Preview the filtered match table
    Preview(PreviewArgs),
    /// List the selectable filter values for a column
    Options(OptionsArgs),
    /// Total goals per player with the grand total and top scorer
    Goals(GoalsArgs),
    /// Mean, median, and mode for a numeric column
    Tendency(TendencyArgs),
    /// Confidence interval for the population mean of a numeric column
    Interval(IntervalArgs),
    /// One-sample t-test of a column mean against a hypothesized value
    Test(TestArgs),
    /// Run every analysis section in sequence
    Report(ReportArgs),
}

#[derive(Debug, Args)]
pub struct DatasetArgs {
    /// Primary CSV dataset location
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Location tried when the primary file is absent (defaults to the same
    /// file name one directory up)
    #[arg(long)]
    pub fallback: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Equality filters such as `tournament=Paulista` ('all' keeps every row)
    #[arg(short = 'f', long = "filter", action = clap::ArgAction::Append)]
    pub filters: Vec<String>,
}

#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Emit structured JSON instead of a formatted table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    #[command(flatten)]
    pub filters: FilterArgs,
    #[command(flatten)]
    pub output: OutputArgs,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

#[derive(Debug, Args)]
pub struct OptionsArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    #[command(flatten)]
    pub output: OutputArgs,
    /// Column to list distinct filter values for
    #[arg(short = 'C', long = "column")]
    pub column: String,
}

#[derive(Debug, Args)]
pub struct GoalsArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    #[command(flatten)]
    pub filters: FilterArgs,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct TendencyArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    #[command(flatten)]
    pub filters: FilterArgs,
    #[command(flatten)]
    pub output: OutputArgs,
    /// Numeric column to summarize
    #[arg(short = 'C', long = "column", default_value = DEFAULT_TENDENCY_COLUMN)]
    pub column: String,
}

#[derive(Debug, Args)]
pub struct IntervalArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    #[command(flatten)]
    pub filters: FilterArgs,
    #[command(flatten)]
    pub output: OutputArgs,
    /// Numeric column to estimate the population mean for
    #[arg(short = 'C', long = "column", default_value = DEFAULT_INTERVAL_COLUMN)]
    pub column: String,
    /// Confidence level, strictly between 0 and 1
    #[arg(long, default_value_t = 0.95)]
    pub confidence: f64,
}

#[derive(Debug, Args)]
pub struct TestArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    #[command(flatten)]
    pub filters: FilterArgs,
    #[command(flatten)]
    pub output: OutputArgs,
    /// Numeric column whose mean is under test
    #[arg(short = 'C', long = "column", default_value = DEFAULT_TEST_COLUMN)]
    pub column: String,
    /// Hypothesized population mean (defaults to the sample's own mean)
    #[arg(long = "mean")]
    pub hypothesized_mean: Option<f64>,
    /// Alternative hypothesis
    #[arg(long, value_enum, default_value = "two-sided")]
    pub alternative: AlternativeArg,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    #[command(flatten)]
    pub filters: FilterArgs,
    #[command(flatten)]
    pub output: OutputArgs,
    /// Preview rows included in the report
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// Confidence level for the interval section
    #[arg(long, default_value_t = 0.95)]
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum AlternativeArg {
    TwoSided,
    Greater,
    Less,
}

impl From<AlternativeArg> for Alternative {
    fn from(arg: AlternativeArg) -> Self {
        match arg {
            AlternativeArg::TwoSided => Alternative::TwoSided,
            AlternativeArg::Greater => Alternative::Greater,
            AlternativeArg::Less => Alternative::Less,
        }
    }
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
