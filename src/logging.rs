// src/logging.rs

//! Logging setup for `lessbatch` using `tracing` + `tracing-subscriber`.
//!
//! Where the filter comes from, first match wins:
//! 1. `--log-level` on the command line
//! 2. `LESSBATCH_LOG`, either a plain level (`debug`, or the batch severity
//!    names `verbose` / `notice` / `error`) or a full filter directive such
//!    as `lessbatch=debug,warn`
//! 3. `info`
//!
//! Per-file skip and success lines are `debug`, so the default output is
//! just failures and the summary. Everything goes to stderr; stdout is
//! reserved for `--dry-run` listings.

use anyhow::{Result, anyhow};
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "LESSBATCH_LOG";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV).ok();
    let filter = build_filter(cli_level, env_value.as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}

/// Resolve the filter from the CLI level and the raw `LESSBATCH_LOG` value.
///
/// An unparsable environment value falls back to `info` rather than
/// failing the run.
pub fn build_filter(cli_level: Option<LogLevel>, env_value: Option<&str>) -> EnvFilter {
    if let Some(lvl) = cli_level {
        return EnvFilter::new(level_from_log_level(lvl).as_str());
    }

    let Some(raw) = env_value.map(str::trim).filter(|s| !s.is_empty()) else {
        return EnvFilter::new(Level::INFO.as_str());
    };

    if let Some(level) = parse_level_str(raw) {
        return EnvFilter::new(level.as_str());
    }
    EnvFilter::try_new(raw).unwrap_or_else(|_| EnvFilter::new(Level::INFO.as_str()))
}

fn level_from_log_level(lvl: LogLevel) -> Level {
    match lvl {
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    }
}

/// Plain level names, plus the batch severities mapped the way
/// `TracingSink` emits them.
pub fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" | "notice" => Some(Level::INFO),
        "debug" | "verbose" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}
