// src/report.rs

//! Where the batch driver sends its user-facing messages.
//!
//! `BatchExecutor` receives a [`LogSink`] at construction instead of calling
//! the global `tracing` macros itself, so tests can assert on exactly what a
//! run reported. Messages are fire-and-forget; nothing a sink does feeds
//! back into the batch.

use std::fmt;

use tracing::{debug, error, info};

/// Severity of a batch message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Per-file detail: skips, successful transformations, version checks.
    Verbose,
    /// Progress the user normally wants to see, e.g. the batch summary.
    Notice,
    /// A file failed, or the batch as a whole did.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Verbose => "verbose",
            Severity::Notice => "notice",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

pub trait LogSink: Send + Sync {
    fn log(&self, severity: Severity, message: &str);
}

/// Default sink: forwards to `tracing` (`debug!`, `info!`, `error!`).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Verbose => debug!(target: "lessbatch", "{message}"),
            Severity::Notice => info!(target: "lessbatch", "{message}"),
            Severity::Error => error!(target: "lessbatch", "{message}"),
        }
    }
}

/// Render `s` in double quotes for log messages.
pub fn quote(s: &str) -> String {
    format!("\"{s}\"")
}
