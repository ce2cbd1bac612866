// src/exec/result.rs

use std::borrow::Cow;
use std::time::Duration;

use thiserror::Error;

/// Exit code reported when the process never produced one of its own.
pub const LAUNCH_FAILURE_EXIT_CODE: i32 = -1;

/// Why an invocation did not run to a normal exit.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("failed to start \"{command}\": {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for \"{command}\" to exit: {source}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("\"{command}\" did not finish within {} ms and was killed", .timeout.as_millis())]
    TimedOut { command: String, timeout: Duration },
}

/// Outcome of a single external process invocation.
///
/// Created by a `CommandRunner` for every call and handed to the caller by
/// value. Output is kept as raw bytes; the text accessors decode lossily.
#[derive(Debug)]
pub struct ProcessResult {
    duration: Duration,
    exit_code: i32,
    launch_error: Option<LaunchError>,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    /// `false` when capture stopped before both streams reached end-of-stream.
    output_complete: bool,
}

impl ProcessResult {
    /// A process that ran and exited with `exit_code`.
    pub fn completed(exit_code: i32, stdout: impl Into<Vec<u8>>, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            duration: Duration::ZERO,
            exit_code,
            launch_error: None,
            stdout: stdout.into(),
            stderr: stderr.into(),
            output_complete: true,
        }
    }

    /// A process that could not be started, or was killed by the watchdog.
    pub fn launch_failed(error: LaunchError) -> Self {
        Self {
            duration: Duration::ZERO,
            exit_code: LAUNCH_FAILURE_EXIT_CODE,
            launch_error: Some(error),
            stdout: Vec::new(),
            stderr: Vec::new(),
            output_complete: true,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Replace the captured output (e.g. partial output of a killed process).
    pub fn with_output(mut self, stdout: Vec<u8>, stderr: Vec<u8>) -> Self {
        self.stdout = stdout;
        self.stderr = stderr;
        self
    }

    /// Mark the captured output as cut short.
    pub fn with_incomplete_output(mut self) -> Self {
        self.output_complete = false;
        self
    }

    /// Whether stdout and stderr were read to end-of-stream. A background
    /// process that inherited the pipes can keep them open after the
    /// command itself exited.
    pub fn output_complete(&self) -> bool {
        self.output_complete
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Exit code; only meaningful when [`launch_error`](Self::launch_error)
    /// is `None`.
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    pub fn launch_error(&self) -> Option<&LaunchError> {
        self.launch_error.as_ref()
    }

    pub fn into_launch_error(self) -> Option<LaunchError> {
        self.launch_error
    }

    pub fn succeeded(&self) -> bool {
        self.launch_error.is_none() && self.exit_code == 0
    }

    pub fn failed(&self) -> bool {
        !self.succeeded()
    }

    pub fn stdout(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    pub fn stderr(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }

    pub fn stdout_bytes(&self) -> &[u8] {
        &self.stdout
    }

    pub fn stderr_bytes(&self) -> &[u8] {
        &self.stderr
    }

    /// Diagnostic text the compiler produced: stderr when it is not blank,
    /// otherwise stdout when `fall_back_to_stdout` is set and stdout is not
    /// blank.
    pub fn diagnostic_output(&self, fall_back_to_stdout: bool) -> Option<Cow<'_, str>> {
        let stderr = self.stderr();
        if !stderr.trim().is_empty() {
            return Some(stderr);
        }
        if fall_back_to_stdout {
            let stdout = self.stdout();
            if !stdout.trim().is_empty() {
                return Some(stdout);
            }
        }
        None
    }
}
