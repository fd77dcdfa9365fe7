//! Scanner module for document discovery and reading.
//!
//! This module provides functionality for:
//! - Parallel directory walking using jwalk with include/ignore globs
//! - Concurrent document reading on a rayon thread pool
//! - Unicode path normalization for canonical document order
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and document discovery
//! - [`reader`]: Concurrent reading into [`Document`]s
//! - [`path_utils`]: NFC path normalization and display paths
//!
//! # Example
//!
//! ```no_run
//! use textdupe::scanner::{DocumentReader, ReaderConfig, Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let root = Path::new(".");
//! let walker = Walker::new(root, WalkerConfig::default());
//! let paths: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//!
//! let summary = DocumentReader::new(ReaderConfig::default()).read(root, paths).unwrap();
//! for doc in &summary.documents {
//!     println!("{} ({} lines)", doc.path, doc.line_count());
//! }
//! ```

pub mod path_utils;
pub mod reader;
pub mod walker;

use std::path::PathBuf;

pub use reader::{DocumentReader, ReadSummary, ReaderConfig};
pub use walker::Walker;

/// A text document handed to the duplication engine.
///
/// The engine only reads documents; they are owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Display path, relative to the scanned root with `/` separators
    pub path: String,
    /// Full text of the document
    pub content: String,
    /// Canonical position of the document in the engine's input.
    ///
    /// The engine attributes origins by slice position, so callers must pass
    /// documents with `sequence_index` equal to their index in the slice.
    /// [`DocumentReader`] guarantees this; debug builds assert it.
    pub sequence_index: usize,
}

impl Document {
    /// Create a new document.
    ///
    /// # Arguments
    ///
    /// * `path` - Identifier used in findings
    /// * `content` - Raw text
    /// * `sequence_index` - Position in the engine's input
    #[must_use]
    pub fn new(path: impl Into<String>, content: impl Into<String>, sequence_index: usize) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            sequence_index,
        }
    }

    /// Number of lines in the document, as counted for `total_lines`.
    #[must_use]
    pub fn line_count(&self) -> u64 {
        self.content.lines().count() as u64
    }
}

/// Configuration for document discovery.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Gitignore-style globs selecting documents (e.g. `**/*.md`).
    pub include_patterns: Vec<String>,

    /// Gitignore-style globs excluded from the scan.
    pub ignore_patterns: Vec<String>,

    /// Also apply the root `.gitignore` file.
    pub respect_gitignore: bool,

    /// Follow symbolic links during traversal.
    pub follow_symlinks: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            include_patterns: vec!["**/*".to_string()],
            ignore_patterns: Vec::new(),
            respect_gitignore: true,
            follow_symlinks: false,
        }
    }
}

/// Errors that can occur while discovering or reading documents.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The file is not valid UTF-8 text.
    #[error("Not valid UTF-8: {0}")]
    InvalidUtf8(PathBuf),

    /// The file contains NUL bytes and is treated as binary.
    #[error("Binary file skipped: {0}")]
    Binary(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The reader thread pool could not be created.
    #[error("Failed to start reader threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Reading was interrupted by the user.
    #[error("Scan interrupted")]
    Interrupted,
}

impl ScanError {
    /// Build a `ScanError` from an I/O error for `path`.
    #[must_use]
    pub fn from_io(path: PathBuf, error: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::NotFound => Self::NotFound(path),
            ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io {
                path,
                source: error,
            },
        }
    }
}
