//! Findings produced by the duplication engine.
//!
//! A [`Finding`] reports one duplicate relationship. Findings are appended
//! while a scan runs and sorted once at the end with [`sort_findings`].

use serde::Serialize;

use super::hasher::ContentHash;

/// Maximum number of characters kept in a full-document snippet.
pub const SNIPPET_MAX_CHARS: usize = 80;

/// Classification of a duplicate relationship.
///
/// The discriminant is the report priority: higher values are listed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingKind {
    /// Two or more documents are identical once whitespace is removed.
    FullDocumentDuplicate = 0,
    /// A paragraph block appears in two different documents.
    CrossFileParagraphDuplicate = 1,
    /// A paragraph block appears more than once in the same document.
    SameFileParagraphDuplicate = 2,
}

impl FindingKind {
    /// Report priority (`SameFile` > `CrossFile` > `FullDocument`).
    #[must_use]
    pub fn priority(self) -> u8 {
        self as u8
    }

    /// Machine-readable label, identical to the serialized form.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::FullDocumentDuplicate => "full-document-duplicate",
            Self::CrossFileParagraphDuplicate => "cross-file-paragraph-duplicate",
            Self::SameFileParagraphDuplicate => "same-file-paragraph-duplicate",
        }
    }
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One reported duplicate relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// What kind of duplication this is
    pub kind: FindingKind,
    /// Involved document paths, current occurrence first, origin second.
    ///
    /// Full-document findings grow as further copies are found; paragraph
    /// findings keep their initial pair (a single path for same-file).
    pub paths: Vec<String>,
    /// Excerpt of the duplicated text
    pub snippet: String,
    /// Fingerprint of the duplicated paragraph block (paragraph findings only)
    pub block_hash: Option<ContentHash>,
}

impl Finding {
    /// Create a full-document duplicate finding for `current` and its `origin`.
    #[must_use]
    pub fn full_document(current: &str, origin: &str, content: &str) -> Self {
        Self {
            kind: FindingKind::FullDocumentDuplicate,
            paths: vec![current.to_string(), origin.to_string()],
            snippet: make_snippet(content, SNIPPET_MAX_CHARS),
            block_hash: None,
        }
    }

    /// Create a cross-file paragraph finding.
    #[must_use]
    pub fn cross_file(current: &str, origin: &str, block: &str, hash: ContentHash) -> Self {
        Self {
            kind: FindingKind::CrossFileParagraphDuplicate,
            paths: vec![current.to_string(), origin.to_string()],
            snippet: block.to_string(),
            block_hash: Some(hash),
        }
    }

    /// Create a same-file paragraph finding.
    #[must_use]
    pub fn same_file(path: &str, block: &str, hash: ContentHash) -> Self {
        Self {
            kind: FindingKind::SameFileParagraphDuplicate,
            paths: vec![path.to_string()],
            snippet: block.to_string(),
            block_hash: Some(hash),
        }
    }
}

/// Sort findings into report order.
///
/// Kinds are ordered by descending priority; the sort is stable so findings
/// of the same kind keep their encounter order.
pub fn sort_findings(findings: &mut [Finding]) {
    findings.sort_by(|a, b| b.kind.priority().cmp(&a.kind.priority()));
}

/// Collapse whitespace runs and truncate to `max_chars` characters.
fn make_snippet(content: &str, max_chars: usize) -> String {
    let collapsed = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let mut out: String = collapsed.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        assert!(
            FindingKind::SameFileParagraphDuplicate.priority()
                > FindingKind::CrossFileParagraphDuplicate.priority()
        );
        assert!(
            FindingKind::CrossFileParagraphDuplicate.priority()
                > FindingKind::FullDocumentDuplicate.priority()
        );
    }

    #[test]
    fn test_sort_is_stable_within_kind() {
        let h = ContentHash::of("x");
        let mut findings = vec![
            Finding::full_document("a", "b", "doc"),
            Finding::cross_file("c", "d", "p1", h),
            Finding::same_file("e", "p2", h),
            Finding::full_document("f", "g", "doc"),
            Finding::same_file("h", "p3", h),
        ];
        sort_findings(&mut findings);

        let firsts: Vec<_> = findings.iter().map(|f| f.paths[0].as_str()).collect();
        assert_eq!(firsts, vec!["e", "h", "c", "a", "f"]);
    }

    #[test]
    fn test_snippet_collapses_and_truncates() {
        assert_eq!(make_snippet("a\n\n  b\tc", 80), "a b c");
        let long = "word ".repeat(40);
        let snippet = make_snippet(&long, 10);
        assert_eq!(snippet, "word word ...");
    }

    #[test]
    fn test_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&FindingKind::SameFileParagraphDuplicate).unwrap();
        assert_eq!(json, "\"same-file-paragraph-duplicate\"");
    }

    #[test]
    fn test_label_matches_serialized_kind() {
        for kind in [
            FindingKind::FullDocumentDuplicate,
            FindingKind::CrossFileParagraphDuplicate,
            FindingKind::SameFileParagraphDuplicate,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.label()));
        }
    }
}
