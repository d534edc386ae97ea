//! Log output setup

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set
const DEFAULT_LOG_FILTER: &str = "info";

/// Install a line-oriented subscriber writing to stderr.
///
/// Lines are prefixed with the active span, which the binary opens per
/// subcommand (`upgrade-go-version: ...`).
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
