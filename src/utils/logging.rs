//! Diagnostic logging setup.
//!
//! Diagnostics go to stderr so they never mix with replies printed on stdout.
//! The filter is read from `CHATDOCK_LOG` using the usual `tracing` directive
//! syntax (`debug`, `chatdock=trace`, ...).

use tracing_subscriber::EnvFilter;

pub const LOG_FILTER_ENV: &str = "CHATDOCK_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Build the filter from `CHATDOCK_LOG`, falling back to warnings only when the
/// variable is unset or unparsable.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Calling this twice is harmless; the second
/// call leaves the first subscriber in place.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
