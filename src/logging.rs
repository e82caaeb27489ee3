// src/logging.rs

//! Global `tracing` subscriber for the `unibuild` binary.
//!
//! The level comes from `--log-level` when given, then from `UNIBUILD_LOG`,
//! and is `info` otherwise. Output goes to stderr; stdout is reserved for
//! what the subcommands print (marker paths, status lines).

use anyhow::Result;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Install the subscriber. A second call returns an error instead of
/// replacing the first subscriber.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let level = match cli_level {
        Some(lvl) => tracing::Level::from(lvl),
        None => std::env::var("UNIBUILD_LOG")
            .ok()
            .and_then(|s| s.trim().parse::<tracing::Level>().ok())
            .unwrap_or(tracing::Level::INFO),
    };

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing tracing subscriber: {e}"))?;

    Ok(())
}

impl From<LogLevel> for tracing::Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
