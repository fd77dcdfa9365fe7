//! textdupe - Duplicated Text Finder
//!
//! A Rust CLI and library that finds duplicated content across a tree of
//! text documents. It reports whole documents that are identical apart from
//! whitespace, and paragraph blocks repeated within or across documents,
//! then computes an originality score that can gate a CI pipeline.
//!
//! # Pipeline
//!
//! 1. [`config`] resolves layered settings (defaults, files, env, flags)
//! 2. [`scanner`] discovers documents with globs and reads them concurrently
//! 3. [`duplicates`] runs the single-pass duplication engine
//! 4. [`score`] turns the counters into a score and verdict
//! 5. [`output`] renders text, JSON or CSV
//!
//! # Library use
//!
//! ```
//! use textdupe::duplicates::{DetectionConfig, DuplicationEngine, FindingKind};
//! use textdupe::scanner::Document;
//!
//! let para = "First line of the note.\nSecond line of the note.\nThird line of it.";
//! let docs = vec![
//!     Document::new("a.md", format!("{para}\n\nIntro"), 0),
//!     Document::new("b.md", format!("Other\n\n{para}"), 1),
//! ];
//! let outcome = DuplicationEngine::new(DetectionConfig::default()).scan(&docs);
//! assert_eq!(outcome.findings[0].kind, FindingKind::CrossFileParagraphDuplicate);
//! ```

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod score;
pub mod signal;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use crate::cli::{CheckArgs, Cli, Commands, InitArgs, OutputFormat};
use crate::config::{Config, PROJECT_CONFIG_FILES};
use crate::duplicates::{DuplicationEngine, ScanOutcome};
use crate::error::ExitCode;
use crate::output::{CsvOutput, JsonOutput, Report, TextOutput};
use crate::progress::{Progress, ProgressCallback, PHASE_DISCOVER};
use crate::scanner::{Document, DocumentReader, ReaderConfig, ScanError, Walker};
use crate::score::OriginalityScore;
use crate::signal::ShutdownHandler;

/// Global presentation flags shared by the subcommands.
#[derive(Debug, Clone, Copy)]
struct Presentation {
    quiet: bool,
    no_color: bool,
}

/// Run the application for parsed command-line arguments.
///
/// Returns the exit code for a completed command. Errors are returned for
/// the caller to classify with [`ExitCode::for_error`].
///
/// # Errors
///
/// Returns configuration, discovery, read and output errors.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let presentation = Presentation {
        quiet: cli.quiet,
        no_color: cli.no_color,
    };

    match cli.command {
        Commands::Check(args) => run_check(&args, presentation),
        Commands::Init(args) => run_init(&args, presentation),
    }
}

/// Run the engine and scoring over already loaded documents.
#[must_use]
pub fn analyze(documents: &[Document], config: &Config) -> (ScanOutcome, OriginalityScore) {
    let outcome = DuplicationEngine::new(config.to_detection_config()).scan(documents);
    let score = OriginalityScore::compute(&outcome.stats, config.failure_threshold);
    (outcome, score)
}

fn run_check(args: &CheckArgs, presentation: Presentation) -> anyhow::Result<ExitCode> {
    let config = Config::resolve(args)?;
    log::debug!("Effective configuration: {:?}", config);

    let shutdown = signal::install_handler().unwrap_or_else(|e| {
        log::warn!("{}; Ctrl+C will not stop the scan", e);
        ShutdownHandler::new()
    });

    let walker = Walker::new(&args.path, config.to_walker_config())
        .with_shutdown_flag(shutdown.get_flag());
    walker.validate_root()?;

    let hide_progress =
        presentation.quiet || args.no_progress || args.output != OutputFormat::Text;
    let progress = Arc::new(Progress::new(hide_progress));

    let (paths, walk_errors) = discover(&walker, progress.as_ref());
    if shutdown.is_shutdown_requested() {
        return Err(ScanError::Interrupted.into());
    }
    log::debug!("Discovered {} documents", paths.len());

    let reader = DocumentReader::new(
        ReaderConfig::default()
            .with_io_threads(config.io_threads)
            .with_shutdown_flag(shutdown.get_flag())
            .with_progress(progress),
    );
    let summary = reader
        .read(walker.root(), paths)
        .context("Failed to read documents")?;

    let (outcome, score) = analyze(&summary.documents, &config);
    log::info!(
        "Scanned {} documents ({} lines): {} duplicate documents, {} duplicate paragraphs, score {}%",
        outcome.stats.total_files,
        outcome.stats.total_lines,
        outcome.stats.num_file_dupes,
        outcome.stats.num_paragraph_dupes,
        score.display_value()
    );

    let report = Report::new(
        args.path.display().to_string(),
        outcome,
        score,
        walk_errors + summary.errors.len(),
    );
    write_report(&report, args.output, presentation)?;

    Ok(report.exit_code())
}

/// Collect discovered paths, counting discovery errors.
fn discover(walker: &Walker, progress: &dyn ProgressCallback) -> (Vec<PathBuf>, usize) {
    progress.on_phase_start(PHASE_DISCOVER, 0);
    let mut paths = Vec::new();
    let mut errors = 0;
    for entry in walker.walk() {
        match entry {
            Ok(path) => {
                paths.push(path);
                progress.on_progress(paths.len(), "");
            }
            Err(e) => {
                log::warn!("{}", e);
                errors += 1;
            }
        }
    }
    progress.on_phase_end(PHASE_DISCOVER);
    (paths, errors)
}

fn write_report(
    report: &Report,
    format: OutputFormat,
    presentation: Presentation,
) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    match format {
        OutputFormat::Text => {
            if presentation.quiet {
                return Ok(());
            }
            let color = !presentation.no_color && stdout.is_terminal();
            TextOutput::new(report)
                .with_color(color)
                .write_to(stdout.lock())
                .context("Failed to write report")?;
        }
        OutputFormat::Json => {
            JsonOutput::new(report).write_to(&mut stdout.lock(), true)?;
        }
        OutputFormat::Csv => {
            CsvOutput::new(&report.findings).write_to(stdout.lock())?;
        }
    }
    Ok(())
}

fn run_init(args: &InitArgs, presentation: Presentation) -> anyhow::Result<ExitCode> {
    let path = args.path.join(PROJECT_CONFIG_FILES[0]);
    Config::write_default(&path, args.force)?;
    if !presentation.quiet {
        println!("Created {}", path.display());
    }
    Ok(ExitCode::Passed)
}
