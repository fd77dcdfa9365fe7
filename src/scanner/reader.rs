//! Concurrent document reading.
//!
//! # Overview
//!
//! [`DocumentReader`] reads discovered paths on a dedicated rayon thread pool
//! sized by `io_threads`. Reads complete in arbitrary order, so the collected
//! documents are put into canonical order afterwards: sorted by their
//! NFC-normalized display path, then numbered with `sequence_index`. The
//! duplication engine attributes origins by input position, which makes this
//! ordering the thing that keeps results reproducible across runs.
//!
//! Files that cannot be used as text (NUL bytes, invalid UTF-8, permission
//! or I/O failures) are skipped with a warning and reported in
//! [`ReadSummary::errors`].

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rayon::prelude::*;

use super::path_utils::display_path;
use super::{Document, ScanError};
use crate::progress::{ProgressCallback, PHASE_READ};

/// Configuration for [`DocumentReader`].
#[derive(Clone)]
pub struct ReaderConfig {
    /// Number of reader threads.
    pub io_threads: usize,
    /// Optional shutdown flag checked before every read.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress reporter.
    pub progress: Option<Arc<dyn ProgressCallback>>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            io_threads: 4,
            shutdown_flag: None,
            progress: None,
        }
    }
}

impl std::fmt::Debug for ReaderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderConfig")
            .field("io_threads", &self.io_threads)
            .field("shutdown_flag", &self.shutdown_flag.is_some())
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl ReaderConfig {
    /// Set the number of reader threads (at least one).
    #[must_use]
    pub fn with_io_threads(mut self, io_threads: usize) -> Self {
        self.io_threads = io_threads.max(1);
        self
    }

    /// Set the shutdown flag.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress reporter.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = Some(progress);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Result of reading a set of paths.
#[derive(Debug, Default)]
pub struct ReadSummary {
    /// Documents in canonical order
    pub documents: Vec<Document>,
    /// Files that were skipped
    pub errors: Vec<ScanError>,
}

impl ReadSummary {
    /// Sum of `line_count()` over all documents.
    #[must_use]
    pub fn total_lines(&self) -> u64 {
        self.documents.iter().map(Document::line_count).sum()
    }
}

/// Reads document contents concurrently.
#[derive(Debug, Default)]
pub struct DocumentReader {
    config: ReaderConfig,
}

impl DocumentReader {
    /// Create a new reader.
    #[must_use]
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read every path in `paths`, naming documents relative to `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Interrupted`] when the shutdown flag is raised
    /// and [`ScanError::ThreadPool`] when the reader threads cannot start.
    /// Per-file failures do not abort the read.
    pub fn read(&self, root: &Path, paths: Vec<PathBuf>) -> Result<ReadSummary, ScanError> {
        if let Some(progress) = &self.config.progress {
            progress.on_phase_start(PHASE_READ, paths.len());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.io_threads.max(1))
            .build()?;

        let loaded: Mutex<Vec<(String, String)>> = Mutex::new(Vec::with_capacity(paths.len()));
        let failed: Mutex<Vec<ScanError>> = Mutex::new(Vec::new());
        let completed = AtomicUsize::new(0);

        pool.install(|| {
            paths.into_par_iter().for_each(|path| {
                if self.config.is_shutdown_requested() {
                    return;
                }

                let name = display_path(root, &path);
                match read_text(&path) {
                    Ok(content) => {
                        log::trace!("Read {} ({} bytes)", name, content.len());
                        if let Ok(mut loaded) = loaded.lock() {
                            loaded.push((name.clone(), content));
                        }
                    }
                    Err(e) => {
                        log::warn!("Skipping {}: {}", name, e);
                        if let Ok(mut failed) = failed.lock() {
                            failed.push(e);
                        }
                    }
                }

                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(progress) = &self.config.progress {
                    progress.on_progress(done, &name);
                }
            });
        });

        if let Some(progress) = &self.config.progress {
            progress.on_phase_end(PHASE_READ);
        }

        if self.config.is_shutdown_requested() {
            log::debug!("Reader: Shutdown requested, discarding partial results");
            return Err(ScanError::Interrupted);
        }

        let loaded = loaded.into_inner().unwrap_or_else(|e| e.into_inner());
        let errors = failed.into_inner().unwrap_or_else(|e| e.into_inner());
        let documents = into_canonical_order(loaded);
        log::debug!(
            "Read {} documents, skipped {} files",
            documents.len(),
            errors.len()
        );

        Ok(ReadSummary { documents, errors })
    }
}

/// Sort `(path, content)` pairs by NFC path and number them.
///
/// The input order is irrelevant; equal inputs always yield equal output.
#[must_use]
pub fn into_canonical_order(mut entries: Vec<(String, String)>) -> Vec<Document> {
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
        .into_iter()
        .enumerate()
        .map(|(index, (path, content))| Document::new(path, content, index))
        .collect()
}

/// Read a single file as UTF-8 text.
///
/// # Errors
///
/// Returns [`ScanError::Binary`] for content with NUL bytes,
/// [`ScanError::InvalidUtf8`] for undecodable content, and an I/O derived
/// [`ScanError`] when the file cannot be read.
pub fn read_text(path: &Path) -> Result<String, ScanError> {
    let bytes = std::fs::read(path).map_err(|e| ScanError::from_io(path.to_path_buf(), e))?;
    if bytes.contains(&0) {
        return Err(ScanError::Binary(path.to_path_buf()));
    }
    String::from_utf8(bytes).map_err(|_| ScanError::InvalidUtf8(path.to_path_buf()))
}
