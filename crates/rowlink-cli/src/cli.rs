//! CLI argument definitions for rowlink.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use rowlink_cli::settings::{parse_link, parse_threshold};

#[derive(Parser)]
#[command(
    name = "rowlink",
    version,
    about = "Fuzzy record linkage between two delimited tables",
    long_about = "Link rows of a target table to rows of a reference table without a shared key.\n\n\
                  Columns are compared with weighted fuzzy string similarity; every target row\n\
                  is classified MATCHED, REVIEW, AMBIGUOUS, UNMATCHED or DUPLICATES."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow cell values in trace logs (redacted otherwise).
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Link every target row to the reference table and write the result.
    Match(MatchArgs),

    /// Show per-column uniqueness, blanks and overlap to help pick links.
    Profile(TablePair),
}

#[derive(Args)]
pub struct TablePair {
    /// Table whose rows are classified (.csv or .tsv).
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Table searched for candidates (.csv or .tsv).
    #[arg(value_name = "REFERENCE")]
    pub reference: PathBuf,
}

#[derive(Args)]
pub struct MatchArgs {
    #[command(flatten)]
    pub tables: TablePair,

    /// JSON settings file applied before the flags below.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Link a target column to reference columns: `target=ref1,ref2`.
    ///
    /// Replaces the automatic same-name link; an empty list unlinks the column.
    #[arg(long = "link", value_name = "TARGET=REFS", value_parser = parse_link)]
    pub links: Vec<(String, Vec<String>)>,

    /// Per-column required percentage: `column=value`.
    #[arg(long = "threshold", value_name = "COLUMN=VALUE", value_parser = parse_threshold)]
    pub thresholds: Vec<(String, f64)>,

    /// Minimum composite score for any match (default 75).
    #[arg(long = "required-threshold", value_name = "VALUE")]
    pub required_threshold: Option<f64>,

    /// Column present in both tables that narrows the candidate pool.
    #[arg(long = "group", value_name = "COLUMN")]
    pub group_columns: Vec<String>,

    /// Reference column copied into the result for unique matches.
    #[arg(long = "get", value_name = "COLUMN")]
    pub get_columns: Vec<String>,

    /// Ignore per-column scores below that column's threshold.
    #[arg(long = "cutoff")]
    pub cutoff: bool,

    /// Similarity function.
    #[arg(long = "scorer", value_enum)]
    pub scorer: Option<ScorerArg>,

    /// Score rows on a single thread.
    #[arg(long = "no-parallel")]
    pub no_parallel: bool,

    /// Result table path (default: <TARGET>_matched.csv next to the target).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Also write the run summary as JSON.
    #[arg(long = "summary-json", value_name = "PATH")]
    pub summary_json: Option<PathBuf>,
}

/// CLI similarity choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum ScorerArg {
    Weighted,
    Adaptive,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
