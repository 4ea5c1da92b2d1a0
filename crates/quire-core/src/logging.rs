//! Structured logging with `tracing`.
//!
//! Components emit `tracing` events with structured fields; the binary calls
//! [`init_subscriber`] once at startup to print them to stderr.

use tracing_subscriber::EnvFilter;

/// Default filter when neither `RUST_LOG` nor settings specify one.
pub const DEFAULT_LEVEL: &str = "info";

/// Initialize the global tracing subscriber with stderr output only.
///
/// Call once at application startup. Subsequent calls are no-ops.
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init_subscriber(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| build_filter(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    // set_global_default is a no-op if already set
    let _ = subscriber.try_init();
}

/// Build a filter from a configured level, falling back to [`DEFAULT_LEVEL`]
/// when the directive does not parse.
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}
