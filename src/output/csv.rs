//! CSV output formatter for check results.
//!
//! One row is generated for each finding.
//!
//! # Columns
//!
//! - `kind`: `full-document-duplicate`, `cross-file-paragraph-duplicate` or `same-file-paragraph-duplicate`
//! - `paths`: involved document paths joined with `;`
//! - `block_hash`: BLAKE3 hash of the paragraph (empty for full documents)
//! - `snippet`: the duplicated text

use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::duplicates::Finding;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A single row in the CSV output.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    kind: &'static str,
    paths: String,
    block_hash: String,
    snippet: &'a str,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    findings: &'a [Finding],
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(findings: &'a [Finding]) -> Self {
        Self { findings }
    }

    /// Write the CSV output, header first, to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        if self.findings.is_empty() {
            csv_writer.write_record(["kind", "paths", "block_hash", "snippet"])?;
        }

        for finding in self.findings {
            csv_writer.serialize(CsvRow {
                kind: finding.kind.label(),
                paths: finding.paths.join(";"),
                block_hash: finding
                    .block_hash
                    .map(|hash| hash.to_hex())
                    .unwrap_or_default(),
                snippet: &finding.snippet,
            })?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
