//! Exit codes and structured error reporting.
//!
//! | code | variant | prefix |
//! |------|---------|--------|
//! | 0 | [`ExitCode::Passed`] | `TD000` |
//! | 1 | [`ExitCode::Failed`] | `TD001` |
//! | 2 | [`ExitCode::ConfigError`] | `TD002` |
//! | 3 | [`ExitCode::GeneralError`] | `TD003` |
//! | 130 | [`ExitCode::Interrupted`] | `TD130` |

use serde::Serialize;

use crate::config::ConfigError;
use crate::scanner::ScanError;

/// Process exit codes for textdupe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// The originality score met the threshold (or `init` succeeded).
    Passed = 0,
    /// The originality score is below the threshold.
    Failed = 1,
    /// Configuration could not be loaded or is invalid.
    ConfigError = 2,
    /// Any other failure, such as a missing scan root.
    GeneralError = 3,
    /// Interrupted by Ctrl+C.
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Passed => "TD000",
            Self::Failed => "TD001",
            Self::ConfigError => "TD002",
            Self::GeneralError => "TD003",
            Self::Interrupted => "TD130",
        }
    }

    /// Variant name as shown in JSON reports.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Passed => "Passed",
            Self::Failed => "Failed",
            Self::ConfigError => "ConfigError",
            Self::GeneralError => "GeneralError",
            Self::Interrupted => "Interrupted",
        }
    }

    /// Exit code for a pass/fail verdict.
    #[must_use]
    pub fn from_verdict(passed: bool) -> Self {
        if passed {
            Self::Passed
        } else {
            Self::Failed
        }
    }

    /// Classify an application error.
    ///
    /// Configuration errors map to [`ExitCode::ConfigError`], an interrupted
    /// scan to [`ExitCode::Interrupted`], everything else to
    /// [`ExitCode::GeneralError`].
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        if err.downcast_ref::<ConfigError>().is_some() {
            Self::ConfigError
        } else if err
            .downcast_ref::<ScanError>()
            .is_some_and(|e| matches!(e, ScanError::Interrupted))
        {
            Self::Interrupted
        } else {
            Self::GeneralError
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "TD002")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
