//! Logging setup for the binary.
//!
//! Libraries log through the `log` facade; the subscriber installed here
//! also receives those records.

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::cli::LogFormat;

/// Default filter when neither `--log-level` nor `RUST_LOG` is set
pub const DEFAULT_FILTER: &str = "info";

/// Build the filter: explicit level, then `RUST_LOG`, then [`DEFAULT_FILTER`]
pub fn filter(level: Option<&str>) -> Result<EnvFilter> {
    match level {
        Some(level) => {
            EnvFilter::try_new(level).with_context(|| format!("Invalid log level '{level}'"))
        }
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

/// Install the global subscriber, writing to stderr
pub fn init(level: Option<&str>, format: LogFormat) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter(level)?)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Human => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}
