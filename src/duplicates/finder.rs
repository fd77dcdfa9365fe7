//! Duplication engine: whole-document and paragraph-block detection.
//!
//! # Overview
//!
//! [`DuplicationEngine::scan`] makes a single pass over an ordered list of
//! documents:
//!
//! 1. **Whole documents**: each document is hashed over its minified text
//!    (all whitespace removed). A hash that was already seen marks the
//!    document as a full duplicate of the first document with that hash. All
//!    copies of one document are grouped into a single finding, and the
//!    duplicate is not examined any further.
//! 2. **Paragraph blocks**: every other document is segmented (see
//!    [`crate::duplicates::segment`]) and each qualifying block is looked up
//!    in the block index. The first occurrence of a block owns it, and every
//!    later occurrence is reported as a same-file or cross-file duplicate.
//!
//! # Ordering
//!
//! The first document with a given hash becomes the origin, so the result
//! depends on the input order. Callers that need reproducible attribution
//! must pass documents in a canonical order;
//! [`crate::scanner::DocumentReader`] sorts by path before assigning
//! sequence indices.
//!
//! # Example
//!
//! ```
//! use textdupe::duplicates::{DetectionConfig, DuplicationEngine, FindingKind};
//! use textdupe::scanner::Document;
//!
//! let documents = vec![
//!     Document::new("a.md", "Hello world", 0),
//!     Document::new("b.md", "Hello   world\n", 1),
//! ];
//!
//! let outcome = DuplicationEngine::new(DetectionConfig::default()).scan(&documents);
//!
//! assert_eq!(outcome.findings.len(), 1);
//! assert_eq!(outcome.findings[0].kind, FindingKind::FullDocumentDuplicate);
//! assert_eq!(outcome.findings[0].paths, vec!["b.md", "a.md"]);
//! assert_eq!(outcome.stats.num_file_dupes, 1);
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::findings::{sort_findings, Finding};
use super::hasher::ContentHash;
use super::segment::{minify, segment};
use crate::scanner::Document;

/// How duplicated lines are counted for the `duped_lines` statistic.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LineCounting {
    /// Count occurrences of the letter `n` in the text.
    ///
    /// Matches the historical behavior of the tool, which counted `"n"`
    /// instead of `"\n"`. Kept as the default so scores stay comparable with
    /// earlier runs.
    #[default]
    Legacy,
    /// Count actual lines (`str::lines`), consistent with `total_lines`.
    Newlines,
}

impl LineCounting {
    /// Count the lines of `text` under this mode.
    #[must_use]
    pub fn count(self, text: &str) -> u64 {
        match self {
            Self::Legacy => text.matches('n').count() as u64,
            Self::Newlines => text.lines().count() as u64,
        }
    }
}

/// Engine configuration.
///
/// This is the subset of [`crate::config::Config`] that influences detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionConfig {
    /// A block needs at least `min_lines - 1` newlines to be compared.
    pub min_lines: usize,
    /// A block must be longer than `min_chars` characters to be compared.
    pub min_chars: usize,
    /// Counting mode for `duped_lines`.
    pub line_counting: LineCounting,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_lines: 3,
            min_chars: 50,
            line_counting: LineCounting::Legacy,
        }
    }
}

impl DetectionConfig {
    /// Set the minimum line threshold.
    #[must_use]
    pub fn with_min_lines(mut self, min_lines: usize) -> Self {
        self.min_lines = min_lines;
        self
    }

    /// Set the minimum character threshold.
    #[must_use]
    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    /// Set the line counting mode.
    #[must_use]
    pub fn with_line_counting(mut self, line_counting: LineCounting) -> Self {
        self.line_counting = line_counting;
        self
    }
}

/// Counters accumulated over one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    /// Number of documents handed to the engine
    pub total_files: u64,
    /// Sum of the reader's line count over all documents
    pub total_lines: u64,
    /// Lines implicated in duplicates, counted for both copies
    pub duped_lines: u64,
    /// Documents that are full duplicates of an earlier document
    pub num_file_dupes: u64,
    /// Paragraph blocks that duplicate an earlier block
    pub num_paragraph_dupes: u64,
    /// Paragraph duplicates whose origin is in the same document
    pub num_paragraph_dupes_in_file: u64,
}

impl RunStatistics {
    /// Number of cross-file paragraph duplicates.
    #[must_use]
    pub fn num_paragraph_dupes_cross_file(&self) -> u64 {
        self.num_paragraph_dupes - self.num_paragraph_dupes_in_file
    }
}

/// Result of a scan: sorted findings plus statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Findings in report order
    pub findings: Vec<Finding>,
    /// Counters for this scan
    pub stats: RunStatistics,
}

/// First document seen with a given whole-document hash.
#[derive(Debug, Clone, Copy)]
struct SeenDocument {
    /// Position of the origin document in the input slice
    origin: usize,
    /// Index of the full-duplicate finding for this hash, once one exists
    finding_index: Option<usize>,
}

/// Run-scoped state of a single scan.
///
/// Owns both indices; dropped when the scan returns.
struct ScanState<'d> {
    documents: &'d [Document],
    config: &'d DetectionConfig,
    seen_documents: HashMap<ContentHash, SeenDocument>,
    seen_blocks: HashMap<ContentHash, ContentHash>,
    reported_blocks: HashSet<ContentHash>,
    findings: Vec<Finding>,
    stats: RunStatistics,
}

impl<'d> ScanState<'d> {
    fn new(documents: &'d [Document], config: &'d DetectionConfig) -> Self {
        let stats = RunStatistics {
            total_files: documents.len() as u64,
            total_lines: documents.iter().map(Document::line_count).sum(),
            ..RunStatistics::default()
        };
        Self {
            documents,
            config,
            seen_documents: HashMap::new(),
            seen_blocks: HashMap::new(),
            reported_blocks: HashSet::new(),
            findings: Vec::new(),
            stats,
        }
    }

    fn process(&mut self, position: usize) {
        let documents = self.documents;
        let document = &documents[position];
        debug_assert_eq!(
            document.sequence_index, position,
            "document {} is out of canonical order",
            document.path
        );
        let doc_hash = ContentHash::of(&minify(&document.content));

        if let Some(seen) = self.seen_documents.get(&doc_hash).copied() {
            self.record_full_duplicate(doc_hash, seen, document);
            return;
        }

        self.seen_documents.insert(
            doc_hash,
            SeenDocument {
                origin: position,
                finding_index: None,
            },
        );
        self.scan_blocks(doc_hash, document);
    }

    fn record_full_duplicate(
        &mut self,
        doc_hash: ContentHash,
        seen: SeenDocument,
        document: &'d Document,
    ) {
        let origin = &self.documents[seen.origin];
        log::debug!(
            "Full duplicate: {} duplicates {}",
            document.path,
            origin.path
        );

        match seen.finding_index {
            Some(index) => self.findings[index].paths.push(document.path.clone()),
            None => {
                self.findings.push(Finding::full_document(
                    &document.path,
                    &origin.path,
                    &origin.content,
                ));
                let index = self.findings.len() - 1;
                if let Some(entry) = self.seen_documents.get_mut(&doc_hash) {
                    entry.finding_index = Some(index);
                }
            }
        }

        self.stats.duped_lines += 2 * self.config.line_counting.count(&document.content);
        self.stats.num_file_dupes += 1;
    }

    fn scan_blocks(&mut self, doc_hash: ContentHash, document: &'d Document) {
        let documents = self.documents;
        let blocks = segment(&document.content, self.config);
        log::trace!(
            "{}: {} qualifying paragraph block(s)",
            document.path,
            blocks.len()
        );

        for block in blocks {
            let Some(owner_hash) = self.seen_blocks.get(&block.hash).copied() else {
                self.seen_blocks.insert(block.hash, doc_hash);
                continue;
            };

            // Owners are always registered before their blocks.
            let Some(owner) = self.seen_documents.get(&owner_hash) else {
                continue;
            };
            let origin_path = &documents[owner.origin].path;

            self.stats.duped_lines += 2 * self.config.line_counting.count(block.raw);
            self.stats.num_paragraph_dupes += 1;

            if *origin_path == document.path {
                self.stats.num_paragraph_dupes_in_file += 1;
                self.findings
                    .push(Finding::same_file(&document.path, block.raw, block.hash));
                self.reported_blocks.insert(block.hash);
            } else if self.reported_blocks.insert(block.hash) {
                self.findings.push(Finding::cross_file(
                    &document.path,
                    origin_path,
                    block.raw,
                    block.hash,
                ));
            } else {
                log::trace!(
                    "{}: block {:?} already reported, suppressing",
                    document.path,
                    block.hash
                );
            }
        }
    }

    fn finish(mut self) -> ScanOutcome {
        sort_findings(&mut self.findings);
        ScanOutcome {
            findings: self.findings,
            stats: self.stats,
        }
    }
}

/// Exact-duplicate detector over an in-memory document list.
#[derive(Debug, Clone, Default)]
pub struct DuplicationEngine {
    config: DetectionConfig,
}

impl DuplicationEngine {
    /// Create an engine with the given configuration.
    #[must_use]
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// The engine's configuration.
    #[must_use]
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Scan `documents` in the order given.
    ///
    /// This is a pure function of its inputs: it performs no I/O, cannot
    /// fail, and builds fresh indices and statistics on every call.
    ///
    /// # Known limitation
    ///
    /// A paragraph block shared by three or more documents yields exactly
    /// one cross-file finding, covering the first pair encountered. Later
    /// copies still count toward `num_paragraph_dupes` and `duped_lines`.
    #[must_use]
    pub fn scan(&self, documents: &[Document]) -> ScanOutcome {
        let mut state = ScanState::new(documents, &self.config);
        for position in 0..documents.len() {
            state.process(position);
        }
        let outcome = state.finish();

        log::debug!(
            "Scanned {} document(s): {} file duplicate(s), {} paragraph duplicate(s)",
            outcome.stats.total_files,
            outcome.stats.num_file_dupes,
            outcome.stats.num_paragraph_dupes
        );
        outcome
    }
}
