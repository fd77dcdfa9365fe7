//! JSON output formatter for check results.
//!
//! Produces one JSON document per run, suitable for CI gates and scripting.
//!
//! # Schema
//!
//! ```json
//! {
//!   "generated_at": "2026-01-01T12:00:00+00:00",
//!   "root": "docs",
//!   "findings": [
//!     {
//!       "kind": "cross-file-paragraph-duplicate",
//!       "paths": ["setup.md", "guide.md"],
//!       "snippet": "Install the toolchain...",
//!       "block_hash": "9f2c..."
//!     }
//!   ],
//!   "stats": {
//!     "total_files": 4,
//!     "total_lines": 1000,
//!     "duped_lines": 100,
//!     "num_file_dupes": 1,
//!     "num_paragraph_dupes": 2,
//!     "num_paragraph_dupes_in_file": 1,
//!     "num_paragraph_dupes_cross_file": 1,
//!     "skipped_files": 1
//!   },
//!   "score": 90.0,
//!   "failure_threshold": 85.0,
//!   "passed": true,
//!   "exit_code": 0,
//!   "exit_code_name": "Passed"
//! }
//! ```

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Report;
use crate::duplicates::{Finding, RunStatistics};

/// Statistics block of the JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct JsonStats {
    /// Documents scanned
    pub total_files: u64,
    /// Total lines scanned
    pub total_lines: u64,
    /// Lines implicated in duplicates
    pub duped_lines: u64,
    /// Full-document duplicates
    pub num_file_dupes: u64,
    /// Paragraph duplicates of either kind
    pub num_paragraph_dupes: u64,
    /// Paragraph duplicates within one document
    pub num_paragraph_dupes_in_file: u64,
    /// Paragraph duplicates across documents
    pub num_paragraph_dupes_cross_file: u64,
    /// Files that could not be read as text
    pub skipped_files: usize,
}

impl JsonStats {
    fn new(stats: &RunStatistics, skipped_files: usize) -> Self {
        Self {
            total_files: stats.total_files,
            total_lines: stats.total_lines,
            duped_lines: stats.duped_lines,
            num_file_dupes: stats.num_file_dupes,
            num_paragraph_dupes: stats.num_paragraph_dupes,
            num_paragraph_dupes_in_file: stats.num_paragraph_dupes_in_file,
            num_paragraph_dupes_cross_file: stats.num_paragraph_dupes_cross_file(),
            skipped_files,
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Report creation time (RFC 3339)
    pub generated_at: String,
    /// Scanned root
    pub root: String,
    /// Findings in report order
    pub findings: Vec<Finding>,
    /// Counters
    pub stats: JsonStats,
    /// Originality score in percent
    pub score: f64,
    /// Threshold the score was compared against
    pub failure_threshold: f64,
    /// Whether the run passed
    pub passed: bool,
    /// Process exit code
    pub exit_code: i32,
    /// Name of the exit code
    pub exit_code_name: &'static str,
}

impl JsonOutput {
    /// Create the JSON document for `report`, stamped with the current time.
    #[must_use]
    pub fn new(report: &Report) -> Self {
        Self::generated_at(report, Utc::now())
    }

    /// Create the JSON document for `report` with a fixed timestamp.
    #[must_use]
    pub fn generated_at(report: &Report, at: DateTime<Utc>) -> Self {
        let exit_code = report.exit_code();
        Self {
            generated_at: at.to_rfc3339(),
            root: report.root.clone(),
            findings: report.findings.clone(),
            stats: JsonStats::new(&report.stats, report.skipped_files),
            score: report.score.value,
            failure_threshold: report.score.failure_threshold,
            passed: report.score.passed,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.name(),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer, followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
