//! Helpers shared by integration tests that touch the process environment.

use std::sync::{Mutex, MutexGuard};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Take exclusive access to the process environment, starting from a clean slate.
///
/// Hold the guard for as long as the test reads or writes variables, including
/// any call that loads configuration.
pub fn lock_env() -> MutexGuard<'static, ()> {
    let guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();
    guard
}

/// Remove `TEXTDUPE_*` and `NO_COLOR` from the environment.
pub fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("TEXTDUPE_") {
            std::env::remove_var(key);
        }
    }
    std::env::remove_var("NO_COLOR");
}
