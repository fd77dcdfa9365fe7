//! Ctrl+C handling.
//!
//! A single [`ShutdownHandler`] wraps an `Arc<AtomicBool>` that the walker
//! and reader poll between files. Pressing Ctrl+C sets the flag; discovery
//! and reading stop at the next file and the run ends with exit code 130.
//! The duplication engine is not interruptible: once documents are loaded
//! it always runs to completion.
//!
//! # Usage
//!
//! ```rust,no_run
//! use textdupe::signal::install_handler;
//! use textdupe::scanner::ReaderConfig;
//!
//! let handler = install_handler().expect("signal handler");
//! let reader = ReaderConfig::default().with_shutdown_flag(handler.get_flag());
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Exit code for SIGINT (Ctrl+C), 128 + 2.
pub const EXIT_CODE_INTERRUPTED: i32 = 130;

/// Shared shutdown flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a handler with no shutdown requested.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether Ctrl+C was pressed or [`request_shutdown`](Self::request_shutdown) called.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Raise the flag manually.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// A clone of the flag for the walker and reader.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Clear the flag.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install the process-wide Ctrl+C handler.
///
/// Repeated calls (for example from several `run_app` invocations in one
/// test process) return the already installed handler with its flag
/// cleared. If another library registered a handler first, an unhooked
/// handler is returned; it still honours [`ShutdownHandler::request_shutdown`].
///
/// # Errors
///
/// Returns [`SignalError::InstallFailed`] when the OS refuses the hook.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    if let Some(handler) = GLOBAL_HANDLER.get() {
        handler.reset();
        return Ok(handler.clone());
    }

    let handler = ShutdownHandler::new();
    let flag = handler.get_flag();

    let installed = ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        let mut stderr = std::io::stderr();
        let _ = writeln!(stderr, "\nInterrupted. Stopping...");
        let _ = stderr.flush();
        log::info!("Shutdown signal received");
    });

    match installed {
        Ok(()) => {}
        Err(ctrlc::Error::MultipleHandlers) => {
            log::debug!("Ctrl+C handler already registered, using unhooked handler");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(GLOBAL_HANDLER.get_or_init(|| handler).clone())
}
