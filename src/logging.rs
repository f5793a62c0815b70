//! Structured logging setup for the binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to whoever embeds it.

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a full filter directive, e.g. `splitmind=trace`
pub const LOG_ENV: &str = "SPLITMIND_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Level for a `-v` count: none is warnings only
    pub fn from_verbosity(count: u8) -> Self {
        match count {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    /// Filter directive scoped to this crate
    pub fn directive(&self) -> String {
        format!("splitmind={}", self)
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };
        write!(f, "{}", name)
    }
}

/// Install the global subscriber, writing to `file` or stderr.
///
/// `SPLITMIND_LOG` wins over `level` when set.
pub fn init(level: LogLevel, file: Option<&Path>) -> Result<()> {
    let filter = match std::env::var(LOG_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(&directives)
            .with_context(|| format!("Invalid {} filter '{}'", LOG_ENV, directives))?,
        _ => EnvFilter::new(level.directive()),
    };

    let registry = tracing_subscriber::registry().with(filter);
    match file {
        Some(path) => {
            let out = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_ansi(false)
                        .with_writer(std::sync::Mutex::new(out)),
                )
                .try_init()
                .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;
        }
        None => {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;
        }
    }

    tracing::debug!(%level, "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_verbosity() {
        assert_eq!(LogLevel::from_verbosity(0), LogLevel::Warn);
        assert_eq!(LogLevel::from_verbosity(1), LogLevel::Info);
        assert_eq!(LogLevel::from_verbosity(2), LogLevel::Debug);
        assert_eq!(LogLevel::from_verbosity(7), LogLevel::Trace);
    }

    #[test]
    fn test_directive_parses() {
        let directive = LogLevel::Debug.directive();
        assert_eq!(directive, "splitmind=debug");
        assert!(EnvFilter::try_new(&directive).is_ok());
    }
}
