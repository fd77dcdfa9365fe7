//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`Progress`] struct which implements
//! [`ProgressCallback`] to display a discovery spinner and a read progress
//! bar while documents are collected. The duplication engine itself is fast
//! enough that it reports nothing.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Phase name used while discovering documents.
pub const PHASE_DISCOVER: &str = "discover";
/// Phase name used while reading documents.
pub const PHASE_READ: &str = "read";

/// Progress callback for the document acquisition phases.
///
/// Implementations must be thread-safe: `on_progress` is called from the
/// reader's worker threads.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase ([`PHASE_DISCOVER`] or [`PHASE_READ`])
    /// * `total` - Total number of items to process (0 if unknown)
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each item processed.
    ///
    /// # Arguments
    ///
    /// * `current` - Number of items completed so far
    /// * `path` - Path being processed
    fn on_progress(&self, current: usize, path: &str);

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);
}

/// Progress reporter using indicatif.
pub struct Progress {
    multi: MultiProgress,
    discover: Mutex<Option<ProgressBar>>,
    read: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bars will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use textdupe::progress::Progress;
    ///
    /// let progress = Progress::new(true);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        let multi = if quiet {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        } else {
            MultiProgress::with_draw_target(ProgressDrawTarget::stderr())
        };
        Self {
            multi,
            discover: Mutex::new(None),
            read: Mutex::new(None),
            quiet,
        }
    }

    fn discover_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} documents")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn read_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        match phase {
            PHASE_DISCOVER => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::discover_style());
                pb.set_message("Discovering documents");
                pb.enable_steady_tick(Duration::from_millis(100));
                if let Ok(mut slot) = self.discover.lock() {
                    *slot = Some(pb);
                }
            }
            PHASE_READ => {
                let pb = self.multi.add(ProgressBar::new(total as u64));
                pb.set_style(Self::read_style());
                pb.set_message("Reading");
                if let Ok(mut slot) = self.read.lock() {
                    *slot = Some(pb);
                }
            }
            other => log::trace!("Unknown progress phase: {}", other),
        }
    }

    fn on_progress(&self, current: usize, path: &str) {
        if self.quiet {
            return;
        }

        let message = truncate_path(path, 30);
        if let Ok(slot) = self.read.lock() {
            if let Some(pb) = slot.as_ref() {
                pb.set_position(current as u64);
                pb.set_message(message);
                return;
            }
        }
        if let Ok(slot) = self.discover.lock() {
            if let Some(pb) = slot.as_ref() {
                pb.set_position(current as u64);
            }
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }

        let (slot, done) = match phase {
            PHASE_DISCOVER => (&self.discover, "Discovery complete"),
            PHASE_READ => (&self.read, "Reading complete"),
            _ => return,
        };
        if let Some(pb) = slot.lock().ok().and_then(|mut s| s.take()) {
            pb.finish_and_clear();
            log::debug!("{}", done);
        }
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = path.rsplit('/').next().unwrap_or(path);
    let name_len = file_name.chars().count();
    if name_len + 4 > max_len {
        let tail: String = file_name
            .chars()
            .skip(name_len.saturating_sub(max_len.saturating_sub(3)))
            .collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}
