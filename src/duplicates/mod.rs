//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Content hashing of normalized text ([`hasher`])
//! - Paragraph segmentation and normalization ([`segment`])
//! - The duplication engine itself ([`finder`])
//! - Finding types and report ordering ([`findings`])

pub mod finder;
pub mod findings;
pub mod hasher;
pub mod segment;

pub use finder::{DetectionConfig, DuplicationEngine, LineCounting, RunStatistics, ScanOutcome};
pub use findings::{sort_findings, Finding, FindingKind};
pub use hasher::ContentHash;
pub use segment::{minify, qualifies, segment, ParagraphBlock};
