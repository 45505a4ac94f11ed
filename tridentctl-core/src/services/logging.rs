//! Logging service

use crate::config::LogLevel;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Filter directives for `level`, covering both the library and the binary
pub fn filter_directives(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "tridentctl=error,tridentctl_core=error",
        LogLevel::Warn => "tridentctl=warn,tridentctl_core=warn",
        LogLevel::Info => "tridentctl=info,tridentctl_core=info",
        LogLevel::Debug => "tridentctl=debug,tridentctl_core=debug",
        LogLevel::Trace => "tridentctl=trace,tridentctl_core=trace",
    }
}

/// Initialize logging with the specified level.
///
/// Logs go to stderr so they never mix with output relayed from the Trident
/// pod. `RUST_LOG` replaces the level-derived filter when set.
pub fn init_logging(level: LogLevel) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init()
}
