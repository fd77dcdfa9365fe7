//! Document discovery using jwalk for parallel traversal.
//!
//! # Overview
//!
//! [`Walker`] traverses a root directory and yields the paths of documents
//! selected by the include globs and not excluded by the ignore globs (plus
//! the root `.gitignore` when enabled). Both pattern lists use gitignore
//! syntax via the `ignore` crate. Ignored directories are pruned during the
//! walk, so large trees such as `node_modules/` are never descended into.
//!
//! # Example
//!
//! ```no_run
//! use textdupe::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     include_patterns: vec!["**/*.md".to_string()],
//!     ignore_patterns: vec!["vendor/".to_string()],
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("."), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(path) => println!("{}", path.display()),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use jwalk::WalkDir;

use super::{ScanError, WalkerConfig};

/// Directory walker for document discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given root directory.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the walker stops yielding paths.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// The root directory being walked.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Check that the root exists and is a directory.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::NotFound`] or [`ScanError::NotADirectory`].
    pub fn validate_root(&self) -> Result<(), ScanError> {
        let metadata = std::fs::metadata(&self.root)
            .map_err(|e| ScanError::from_io(self.root.clone(), e))?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(self.root.clone()));
        }
        Ok(())
    }

    /// Build the matcher for excluded paths.
    fn build_ignore(&self) -> Gitignore {
        let mut builder = GitignoreBuilder::new(&self.root);

        if self.config.respect_gitignore {
            let gitignore_path = self.root.join(".gitignore");
            if gitignore_path.exists() {
                if let Some(e) = builder.add(&gitignore_path) {
                    log::warn!(
                        "Failed to load .gitignore from {}: {}",
                        gitignore_path.display(),
                        e
                    );
                } else {
                    log::debug!("Loaded .gitignore from {}", gitignore_path.display());
                }
            }
        }

        for pattern in &self.config.ignore_patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                log::warn!("Invalid ignore pattern '{}': {}", pattern, e);
            }
        }

        build_or_empty(&builder)
    }

    /// Build the matcher selecting documents. `None` selects every file.
    fn build_include(&self) -> Option<Gitignore> {
        if self.config.include_patterns.is_empty() {
            return None;
        }

        let mut builder = GitignoreBuilder::new(&self.root);
        for pattern in &self.config.include_patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                log::warn!("Invalid include pattern '{}': {}", pattern, e);
            }
        }
        Some(build_or_empty(&builder))
    }

    /// Walk the directory tree, yielding document paths.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration. Paths are yielded in a sorted, deterministic order.
    pub fn walk(&self) -> impl Iterator<Item = Result<PathBuf, ScanError>> + '_ {
        let ignore = Arc::new(self.build_ignore());
        let include = self.build_include();

        let prune_ignore = Arc::clone(&ignore);
        let prune_root = self.root.clone();

        let walk_dir = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .skip_hidden(false)
            .process_read_dir(move |_depth, _path, _read_dir_state, children| {
                // Sort children for deterministic output
                children.sort_by(|a, b| match (a, b) {
                    (Ok(a), Ok(b)) => a.file_name().cmp(b.file_name()),
                    (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                    (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                    (Err(_), Err(_)) => std::cmp::Ordering::Equal,
                });
                // Prune ignored directories before they are read
                children.retain(|entry| match entry {
                    Ok(e) if e.file_type().is_dir() => {
                        !is_ignored(&prune_ignore, &prune_root, &e.path(), true)
                    }
                    _ => true,
                });
            });

        walk_dir.into_iter().filter_map(move |entry_result| {
            if self.is_shutdown_requested() {
                log::debug!("Walker: Shutdown requested, stopping iteration");
                return None;
            }

            match entry_result {
                Ok(entry) => {
                    let path = entry.path();
                    let file_type = entry.file_type();

                    if path == self.root || file_type.is_dir() {
                        return None;
                    }

                    if file_type.is_symlink() && !self.config.follow_symlinks {
                        log::trace!("Skipping symlink: {}", path.display());
                        return None;
                    }

                    if is_ignored(&ignore, &self.root, &path, false) {
                        log::trace!("Ignoring file: {}", path.display());
                        return None;
                    }

                    if let Some(include) = &include {
                        if !is_included(include, &self.root, &path) {
                            log::trace!("Not an included document: {}", path.display());
                            return None;
                        }
                    }

                    match std::fs::metadata(&path) {
                        Ok(metadata) if metadata.is_file() => Some(Ok(path)),
                        Ok(_) => None,
                        Err(e) => {
                            log::warn!("Cannot stat {}: {}", path.display(), e);
                            Some(Err(ScanError::from_io(path, e)))
                        }
                    }
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), std::borrow::ToOwned::to_owned);
                    log::warn!("Walker error for {}: {}", path.display(), e);
                    Some(Err(ScanError::Io {
                        path,
                        source: std::io::Error::other(e.to_string()),
                    }))
                }
            }
        })
    }
}

fn build_or_empty(builder: &GitignoreBuilder) -> Gitignore {
    match builder.build() {
        Ok(gitignore) => gitignore,
        Err(e) => {
            log::warn!("Failed to build patterns: {}", e);
            Gitignore::empty()
        }
    }
}

/// Check `path` against an exclusion matcher, including its parents.
fn is_ignored(matcher: &Gitignore, root: &Path, path: &Path, is_dir: bool) -> bool {
    if matcher.is_empty() {
        return false;
    }
    let relative = path.strip_prefix(root).unwrap_or(path);
    if relative.has_root() {
        return matcher.matched(relative, is_dir).is_ignore();
    }
    matcher
        .matched_path_or_any_parents(relative, is_dir)
        .is_ignore()
}

/// Check whether `path` matches one of the include globs.
fn is_included(matcher: &Gitignore, root: &Path, path: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    matcher.matched(relative, false).is_ignore()
}
