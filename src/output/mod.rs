//! Report formatters for check results.
//!
//! This module renders a [`Report`] in three formats:
//! - [`text`]: colored console report for people
//! - [`json`]: a single JSON document for CI and scripting
//! - [`csv`]: one row per finding for spreadsheets
//!
//! # Example
//!
//! ```
//! use textdupe::duplicates::{DetectionConfig, DuplicationEngine};
//! use textdupe::error::ExitCode;
//! use textdupe::output::{json::JsonOutput, Report};
//! use textdupe::scanner::Document;
//! use textdupe::score::OriginalityScore;
//!
//! let text = "one\ntwo\n";
//! let docs = vec![Document::new("a.md", text, 0), Document::new("b.md", text, 1)];
//! let outcome = DuplicationEngine::new(DetectionConfig::default()).scan(&docs);
//! let score = OriginalityScore::compute(&outcome.stats, 90.0);
//! let report = Report::new("docs", outcome, score, 0);
//!
//! let json = JsonOutput::new(&report).to_json().unwrap();
//! assert!(json.contains("full-document-duplicate"));
//! assert_eq!(report.exit_code(), ExitCode::Failed);
//! ```

pub mod csv;
pub mod json;
pub mod text;

pub use self::csv::CsvOutput;
pub use self::json::JsonOutput;
pub use self::text::TextOutput;

use crate::duplicates::{Finding, RunStatistics, ScanOutcome};
use crate::error::ExitCode;
use crate::score::OriginalityScore;

/// Everything a formatter needs to describe one check run.
#[derive(Debug, Clone)]
pub struct Report {
    /// Scanned root as given on the command line
    pub root: String,
    /// Findings in report order
    pub findings: Vec<Finding>,
    /// Engine counters
    pub stats: RunStatistics,
    /// Score and verdict
    pub score: OriginalityScore,
    /// Files discovered but not readable as text
    pub skipped_files: usize,
}

impl Report {
    /// Assemble a report from a scan outcome.
    #[must_use]
    pub fn new(
        root: impl Into<String>,
        outcome: ScanOutcome,
        score: OriginalityScore,
        skipped_files: usize,
    ) -> Self {
        Self {
            root: root.into(),
            findings: outcome.findings,
            stats: outcome.stats,
            score,
            skipped_files,
        }
    }

    /// Exit code implied by the verdict.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from_verdict(self.score.passed)
    }
}
