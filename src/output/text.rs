//! Human-readable console report.
//!
//! Layout:
//!
//! ```text
//! textdupe 0.1.0 - docs
//!
//! [same-file-paragraph-duplicate] guide.md
//!     Install the toolchain.
//!     ...
//! [full-document-duplicate] copy.md, readme.md
//!     Hello world
//!
//! Documents scanned                 4
//! ...
//!
//! Originality score: 90.00% (threshold 85.00%) PASS
//! ```
//!
//! Colors come from `yansi` and are switched off per formatter, so a report
//! rendered for a pipe or with `--no-color` contains no escape codes.

use std::fmt::Write as _;
use std::io;

use yansi::{Color, Condition, Paint, Painted, Style};

use super::Report;
use crate::duplicates::{Finding, FindingKind};

/// Snippet lines shown per finding before eliding the rest.
const SNIPPET_PREVIEW_LINES: usize = 6;

/// Width of the label column in the statistics table.
const LABEL_WIDTH: usize = 30;

/// Console formatter for a [`Report`].
pub struct TextOutput<'a> {
    report: &'a Report,
    color: bool,
}

impl<'a> TextOutput<'a> {
    /// Create a formatter; colors are on by default.
    #[must_use]
    pub fn new(report: &'a Report) -> Self {
        Self {
            report,
            color: true,
        }
    }

    /// Enable or disable ANSI colors.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn styled<'b, T: ?Sized>(&self, value: &'b T, style: Style) -> Painted<&'b T> {
        let condition = if self.color {
            Condition::ALWAYS
        } else {
            Condition::NEVER
        };
        value.paint(style).whenever(condition)
    }

    /// Render the full report.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_banner(&mut out);
        self.render_findings(&mut out);
        self.render_stats(&mut out);
        self.render_verdict(&mut out);
        out
    }

    /// Write the rendered report.
    ///
    /// # Errors
    ///
    /// Returns any error from the writer.
    pub fn write_to<W: io::Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(self.render().as_bytes())?;
        writer.flush()
    }

    fn render_banner(&self, out: &mut String) {
        let name = self.styled("textdupe", Style::new().bold());
        let _ = writeln!(
            out,
            "{} {} - {}\n",
            name,
            env!("CARGO_PKG_VERSION"),
            self.report.root
        );
    }

    fn render_findings(&self, out: &mut String) {
        if self.report.findings.is_empty() {
            let _ = writeln!(
                out,
                "{}\n",
                self.styled("No duplicates found.", Style::new().fg(Color::Green))
            );
            return;
        }

        for finding in &self.report.findings {
            self.render_finding(out, finding);
        }
        out.push('\n');
    }

    fn render_finding(&self, out: &mut String, finding: &Finding) {
        let tag = format!("[{}]", finding.kind.label());
        let style = match finding.kind {
            FindingKind::SameFileParagraphDuplicate => Style::new().fg(Color::Yellow).bold(),
            FindingKind::CrossFileParagraphDuplicate => Style::new().fg(Color::Magenta).bold(),
            FindingKind::FullDocumentDuplicate => Style::new().fg(Color::Red).bold(),
        };
        let _ = writeln!(
            out,
            "{} {}",
            self.styled(tag.as_str(), style),
            finding.paths.join(", ")
        );

        let dim = Style::new().dim();
        let mut lines = finding.snippet.lines();
        for line in lines.by_ref().take(SNIPPET_PREVIEW_LINES) {
            let _ = writeln!(out, "    {}", self.styled(line, dim));
        }
        if lines.next().is_some() {
            let _ = writeln!(out, "    {}", self.styled("...", dim));
        }
    }

    fn render_stats(&self, out: &mut String) {
        let stats = &self.report.stats;
        let rows: [(&str, String); 8] = [
            ("Documents scanned", stats.total_files.to_string()),
            ("Lines scanned", stats.total_lines.to_string()),
            ("Duplicated lines", stats.duped_lines.to_string()),
            ("Duplicate documents", stats.num_file_dupes.to_string()),
            ("Duplicate paragraphs", stats.num_paragraph_dupes.to_string()),
            (
                "  within a file",
                stats.num_paragraph_dupes_in_file.to_string(),
            ),
            (
                "  across files",
                stats.num_paragraph_dupes_cross_file().to_string(),
            ),
            ("Skipped files", self.report.skipped_files.to_string()),
        ];
        for (label, value) in rows {
            let _ = writeln!(out, "{label:<LABEL_WIDTH$}{value:>10}");
        }
        out.push('\n');
    }

    fn render_verdict(&self, out: &mut String) {
        let score = &self.report.score;
        let verdict = if score.passed {
            self.styled("PASS", Style::new().fg(Color::Green).bold())
        } else {
            self.styled("FAIL", Style::new().fg(Color::Red).bold())
        };
        let _ = writeln!(
            out,
            "Originality score: {}% (threshold {:.2}%) {}",
            score.display_value(),
            score.failure_threshold,
            verdict
        );
    }
}
