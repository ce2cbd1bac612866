// src/exec/probe.rs

//! Asking the compiler for its version.
//!
//! The result is only used for a log line before the batch starts, so
//! callers treat a [`ProbeError`] as a warning rather than a reason to stop.

use std::path::Path;

use thiserror::Error;

use crate::exec::result::LaunchError;
use crate::exec::runner::CommandRunner;

pub const VERSION_FLAG: &str = "-v";

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("failed to execute command \"{command}\": {source}")]
    Launch {
        command: String,
        #[source]
        source: LaunchError,
    },

    #[error(
        "failed to execute command \"{command}\" with the argument \"-v\"; received exit code {exit_code}"
    )]
    ExitCode { command: String, exit_code: i32 },
}

/// Runs `<command> -v` and extracts the version it reports.
pub struct VersionProbe<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> VersionProbe<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    pub async fn probe(&self, command: &str) -> Result<String, ProbeError> {
        let args = [VERSION_FLAG.to_string()];
        let result = self.runner.run(None, command, &args).await;

        if result.failed() {
            let exit_code = result.exit_code();
            return Err(match result.into_launch_error() {
                Some(source) => ProbeError::Launch {
                    command: command.to_string(),
                    source,
                },
                None => ProbeError::ExitCode {
                    command: command.to_string(),
                    exit_code,
                },
            });
        }

        Ok(parse_version(&result.stdout(), command))
    }
}

/// Pull the version out of `<command> -v` output.
///
/// Accepts `"lessc 2.3.1"`, `"lessc v2.3.1"`, `"v2.3.1"` and `"2.3.1"`. When
/// `command` is a path, its file name is also tried as the prefix.
pub fn parse_version(output: &str, command: &str) -> String {
    let mut version = output.trim();

    let file_name = Path::new(command)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(command);

    for prefix in [command, file_name] {
        if !prefix.is_empty() {
            if let Some(rest) = version.strip_prefix(prefix) {
                version = rest.trim();
                break;
            }
        }
    }

    if let Some(rest) = version.strip_prefix('v') {
        version = rest.trim();
    }

    version.to_string()
}
