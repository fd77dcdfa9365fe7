//! Command-line interface definitions for textdupe.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! Global options control verbosity, color and error formatting; the `check`
//! subcommand runs a scan and `init` writes a starter configuration file.
//!
//! Every detection option of `check` is optional. Flags that are not given
//! fall through to the layered configuration (see [`crate::config`]).
//!
//! # Example
//!
//! ```bash
//! # Check the current directory with the configured threshold
//! textdupe check
//!
//! # Check a docs folder, failing below 85% originality
//! textdupe check docs --failure-threshold 85
//!
//! # Machine-readable report
//! textdupe check docs --output json
//!
//! # Verbose mode for debugging
//! textdupe -v check docs
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::duplicates::LineCounting;

/// Duplicated text finder for documentation trees.
///
/// textdupe reports documents and paragraphs that appear more than once,
/// computes an originality score, and fails when the score drops below a
/// threshold.
#[derive(Debug, Parser)]
#[command(name = "textdupe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output (any non-empty NO_COLOR value other than a falsey one)
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Print errors as JSON objects on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for textdupe.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory for duplicated text and score its originality
    Check(CheckArgs),
    /// Write a default `.textdupe.toml` configuration file
    Init(InitArgs),
}

/// Arguments for the check subcommand.
#[derive(Debug, Args, Default)]
pub struct CheckArgs {
    /// Directory to scan
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Configuration file layered above the user and project files
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Minimum number of lines for a paragraph to be compared
    #[arg(long, value_name = "N")]
    pub min_lines: Option<usize>,

    /// Paragraphs must be longer than this many characters to be compared
    #[arg(long, value_name = "N")]
    pub min_chars: Option<usize>,

    /// Minimum passing originality score in percent (e.g. 90, 87.5, 85%)
    #[arg(long, value_name = "PERCENT", value_parser = parse_percent)]
    pub failure_threshold: Option<f64>,

    /// Glob patterns to ignore (can be specified multiple times)
    ///
    /// These patterns are added to the configured ignore list.
    #[arg(short, long = "ignore", value_name = "PATTERN")]
    pub ignore_patterns: Vec<String>,

    /// Glob patterns selecting documents (can be specified multiple times)
    ///
    /// When given, these replace the configured include list.
    #[arg(long = "include", value_name = "PATTERN")]
    pub include_patterns: Vec<String>,

    /// How duplicated lines are counted
    #[arg(long, value_enum, value_name = "MODE")]
    pub line_counting: Option<LineCounting>,

    /// Number of threads used to read documents
    #[arg(long, value_name = "N")]
    pub io_threads: Option<usize>,

    /// Follow symbolic links during discovery
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Do not apply the root .gitignore file
    #[arg(long)]
    pub no_gitignore: bool,

    /// Hide progress bars
    #[arg(long)]
    pub no_progress: bool,

    /// Skip the user configuration file
    #[arg(long)]
    pub no_user_config: bool,
}

/// Arguments for the init subcommand.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory in which to create `.textdupe.toml`
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing configuration file
    #[arg(short, long)]
    pub force: bool,
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report with colors
    #[default]
    Text,
    /// JSON document for scripting
    Json,
    /// One CSV row per finding
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Parse a percentage such as `90`, `87.5` or `85%`.
///
/// # Errors
///
/// Returns an error message for non-numeric input or values outside 0-100.
pub fn parse_percent(s: &str) -> Result<f64, String> {
    let trimmed = s.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    let value: f64 = number
        .parse()
        .map_err(|_| format!("Invalid percentage: {s}"))?;
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(format!("Percentage must be between 0 and 100: {s}"));
    }
    Ok(value)
}
