//! Originality score and pass/fail verdict.
//!
//! The score is the percentage of scanned lines that are not implicated in
//! any duplicate relationship:
//!
//! ```text
//! score = 100 - duped_lines / total_lines * 100
//! ```
//!
//! rounded to two decimal places. A run passes when the score is at least
//! the configured failure threshold.
//!
//! # Edge cases
//!
//! - `total_lines == 0` (nothing scanned) scores 100.00 and passes.
//! - Under legacy line counting `duped_lines` can exceed `total_lines`; the
//!   score is clamped to 0.00 rather than going negative.
//!
//! # Example
//!
//! ```
//! use textdupe::duplicates::RunStatistics;
//! use textdupe::score::OriginalityScore;
//!
//! let stats = RunStatistics { total_lines: 1000, duped_lines: 100, ..Default::default() };
//!
//! let score = OriginalityScore::compute(&stats, 85.0);
//! assert_eq!(score.value, 90.0);
//! assert!(score.passed);
//!
//! assert!(!OriginalityScore::compute(&stats, 95.0).passed);
//! ```

use serde::Serialize;

use crate::duplicates::RunStatistics;

/// Computed originality score for one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OriginalityScore {
    /// Score in percent, rounded to two decimals
    pub value: f64,
    /// Threshold the score was compared against
    pub failure_threshold: f64,
    /// Whether `value >= failure_threshold`
    pub passed: bool,
}

impl OriginalityScore {
    /// Compute the score for `stats` against `failure_threshold`.
    #[must_use]
    pub fn compute(stats: &RunStatistics, failure_threshold: f64) -> Self {
        let value = originality_percent(stats.duped_lines, stats.total_lines);
        Self {
            value,
            failure_threshold,
            passed: value >= failure_threshold,
        }
    }

    /// Score formatted with two decimals, e.g. `"90.00"`.
    #[must_use]
    pub fn display_value(&self) -> String {
        format!("{:.2}", self.value)
    }
}

/// Originality percentage for `duped_lines` out of `total_lines`.
#[must_use]
pub fn originality_percent(duped_lines: u64, total_lines: u64) -> f64 {
    if total_lines == 0 {
        return 100.0;
    }
    let raw = 100.0 - (duped_lines as f64 / total_lines as f64 * 100.0);
    round2(raw.max(0.0))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
