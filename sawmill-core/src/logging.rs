use std::io::{self, IsTerminal};
use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global diagnostics subscriber.
///
/// Diagnostics go to stderr so stdout stays clean for log output. The filter
/// comes from `RUST_LOG` and defaults to `warn`. Setting `SAWMILL_LOG_JSON`
/// switches to flattened JSON lines.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if std::env::var("SAWMILL_LOG_JSON").is_ok() {
        fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .flatten_event(true)
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
}

pub fn default_log_mode() -> LogMode {
    if io::stdout().is_terminal() {
        LogMode::Pretty
    } else {
        LogMode::Raw
    }
}

/// How the CLI renders entries on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// The wire format, suitable for re-parsing.
    Raw,
    /// The wire format, colored by level.
    Pretty,
}
