//! Diagnostic logging setup.

use tracing_subscriber::EnvFilter;

/// Environment variable consulted when `RUST_LOG` is unset.
pub const LOG_ENV: &str = "RELAYBROWSER_LOG";

/// Builds the log filter from `RUST_LOG`, then `RELAYBROWSER_LOG`, defaulting to `warn`.
pub fn log_filter() -> EnvFilter {
    let level = std::env::var("RUST_LOG")
        .or_else(|_| std::env::var(LOG_ENV))
        .map(|v| match v.as_str() {
            "silent" => "off".to_string(),
            _ => v,
        })
        .unwrap_or_else(|_| "warn".to_string());

    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Installs the stderr subscriber. Later calls are no-ops.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .try_init();
}
