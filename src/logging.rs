//! Diagnostic logging to stderr.
//!
//! Quiet by default. `RUST_LOG` picks the filter, and
//! `SESSION_HOURS_DEBUG_LOG=1` forces debug output (per-file skip reasons,
//! unreadable directories).

use tracing_subscriber::EnvFilter;

const DEBUG_ENV: &str = "SESSION_HOURS_DEBUG_LOG";

fn debug_requested(value: Option<&str>) -> bool {
    matches!(value, Some("1" | "true" | "TRUE" | "yes" | "YES"))
}

pub fn init() {
    let filter = if debug_requested(std::env::var(DEBUG_ENV).ok().as_deref()) {
        EnvFilter::new("session_hours=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // Ignore the error if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
