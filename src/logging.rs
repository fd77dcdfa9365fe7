//! Logging setup for textdupe.
//!
//! Diagnostics go through the `log` facade to stderr via `env_logger`, so
//! they never mix with reports written to stdout. The level is chosen by, in
//! priority order:
//!
//! 1. `RUST_LOG` (full env_logger filter syntax)
//! 2. `--quiet`: errors only
//! 3. `-vv`: trace, `-v`: debug
//! 4. otherwise info
//!
//! Debug builds prefix every line with a timestamp and, in verbose modes,
//! the module path. Release builds print only the level and message.
//!
//! # Example
//!
//! ```rust,no_run
//! use textdupe::logging::init_logging;
//!
//! init_logging(1, false);
//! log::debug!("visible with -v");
//! ```

use env_logger::Builder;
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Initialize logging from the CLI verbosity flags.
///
/// Calling this more than once is harmless: later calls leave the first
/// logger in place.
///
/// # Arguments
///
/// * `verbose` - Verbosity count from CLI (0=normal, 1=debug, 2+=trace)
/// * `quiet` - If true, only show errors (overridden by RUST_LOG)
pub fn init_logging(verbose: u8, quiet: bool) {
    let from_env = env::var("RUST_LOG").is_ok();
    let mut builder = Builder::new();

    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }
    configure_format(&mut builder, verbose);

    if builder.try_init().is_err() {
        return;
    }

    if from_env {
        log::debug!("Logging configured from RUST_LOG");
    } else {
        log::debug!(
            "Logging initialized at level: {}",
            determine_level(verbose, quiet)
        );
    }
}

/// Map CLI flags to a level filter. `quiet` wins over `verbose`.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

fn configure_format(builder: &mut Builder, verbose: u8) {
    #[cfg(debug_assertions)]
    {
        builder.format(move |buf, record| {
            let timestamp = buf.timestamp_seconds();
            let level = record.level();
            let style = buf.default_level_style(level);
            if verbose > 0 {
                writeln!(
                    buf,
                    "{timestamp} {style}{level:<5}{style:#} [{}] {}",
                    record.module_path().unwrap_or("unknown"),
                    record.args()
                )
            } else {
                writeln!(
                    buf,
                    "{timestamp} {style}{level:<5}{style:#} {}",
                    record.args()
                )
            }
        });
    }

    #[cfg(not(debug_assertions))]
    {
        let _ = verbose;
        builder.format(|buf, record| {
            let level = record.level();
            let style = buf.default_level_style(level);
            writeln!(buf, "{style}{level:<5}{style:#} {}", record.args())
        });
    }
}

/// Name of the currently active maximum level.
#[must_use]
pub fn current_level_name() -> &'static str {
    match log::max_level() {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}
