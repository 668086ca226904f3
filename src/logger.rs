//! Logging setup shared by binaries and tests.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` overrides the default; otherwise the given binary name and
/// this crate log at `default_level`.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{bin_name}={default_level},masschat={default_level}"
        ))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
