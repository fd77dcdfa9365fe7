//! Paragraph segmentation and whitespace normalization.
//!
//! A document is split on the literal blank-line separator `"\n\n"`. Each
//! resulting block is a candidate for paragraph-level comparison, but only
//! blocks above the configured size thresholds qualify:
//!
//! - the raw block contains at least `min_lines - 1` newline characters, and
//! - the raw block is longer than `min_chars` characters.
//!
//! Both checks look at the raw text, before normalization. Qualifying blocks
//! are normalized by removing every whitespace character and then hashed.
//!
//! # Example
//!
//! ```
//! use textdupe::duplicates::{segment, DetectionConfig};
//!
//! let config = DetectionConfig { min_lines: 2, min_chars: 5, ..Default::default() };
//! let blocks = segment("first line\nsecond line\n\ntoo short", &config);
//!
//! assert_eq!(blocks.len(), 1);
//! assert_eq!(blocks[0].normalized, "firstlinesecondline");
//! ```

use super::finder::DetectionConfig;
use super::hasher::ContentHash;

/// Separator between paragraph blocks.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// A qualifying paragraph block of a document.
///
/// Blocks borrow their raw text from the document and only live for the
/// duration of one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphBlock<'a> {
    /// The block exactly as it appears in the document
    pub raw: &'a str,
    /// The block with all whitespace removed
    pub normalized: String,
    /// Fingerprint of `normalized`
    pub hash: ContentHash,
}

/// Split `content` into qualifying paragraph blocks.
///
/// Empty blocks and blocks below the thresholds in `config` are dropped
/// without being hashed.
#[must_use]
pub fn segment<'a>(content: &'a str, config: &DetectionConfig) -> Vec<ParagraphBlock<'a>> {
    content
        .split(BLOCK_SEPARATOR)
        .filter(|raw| !raw.is_empty())
        .filter(|raw| qualifies(raw, config.min_lines, config.min_chars))
        .map(|raw| {
            let normalized = minify(raw);
            let hash = ContentHash::of(&normalized);
            ParagraphBlock {
                raw,
                normalized,
                hash,
            }
        })
        .collect()
}

/// Check whether a raw block is large enough to be compared.
///
/// The newline check is `>= min_lines - 1`, so a block of `min_lines`
/// lines without a trailing newline still qualifies.
#[must_use]
pub fn qualifies(raw: &str, min_lines: usize, min_chars: usize) -> bool {
    let newlines = raw.matches('\n').count();
    newlines >= min_lines.saturating_sub(1) && raw.chars().count() > min_chars
}

/// Remove every whitespace character from `text`.
#[must_use]
pub fn minify(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
