// src/exec/runner.rs

//! Running one external command to completion.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::{debug, warn};

use crate::exec::capture::StreamCapture;
use crate::exec::result::{LAUNCH_FAILURE_EXIT_CODE, LaunchError, ProcessResult};

/// Default per-invocation time-out.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(60_000);

/// How long to keep draining output after the watchdog killed a process,
/// or after a normal exit when there is no time-out.
const KILL_GRACE: Duration = Duration::from_secs(2);

/// Least time given to read what an exiting process left in its pipes.
const MIN_DRAIN: Duration = Duration::from_millis(100);

/// Millisecond setting to watchdog duration; `<= 0` means none.
pub fn timeout_from_millis(timeout_ms: i64) -> Option<Duration> {
    u64::try_from(timeout_ms)
        .ok()
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
}

/// Trait abstracting how a command is executed.
///
/// Production code uses [`ProcessRunner`]; tests can provide their own
/// implementation that returns scripted results without spawning anything.
///
/// Implementations make exactly one attempt per call and report every
/// failure through the returned [`ProcessResult`]; they never panic or
/// return early with an error.
pub trait CommandRunner: Send + Sync {
    /// Run `command` with `args`, in `working_dir` if given.
    fn run<'a>(
        &'a self,
        working_dir: Option<&'a Path>,
        command: &'a str,
        args: &'a [String],
    ) -> Pin<Box<dyn Future<Output = ProcessResult> + Send + 'a>>;
}

/// Real runner backed by `tokio::process`.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
    kill_grace: Duration,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(Some(DEFAULT_TIMEOUT))
    }
}

impl ProcessRunner {
    /// `None` (or a zero duration) disables the watchdog.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            timeout: timeout.filter(|t| !t.is_zero()),
            kill_grace: KILL_GRACE,
        }
    }

    /// Build from a millisecond setting where `<= 0` means "no time-out".
    pub fn from_millis(timeout_ms: i64) -> Self {
        Self::new(timeout_from_millis(timeout_ms))
    }

    /// Override how long output is still collected after a forced kill.
    pub fn with_kill_grace(mut self, grace: Duration) -> Self {
        self.kill_grace = grace;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    async fn run_inner(
        &self,
        working_dir: Option<&Path>,
        command: &str,
        args: &[String],
    ) -> ProcessResult {
        let start = Instant::now();

        let mut cmd = Command::new(command);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        debug!(command, ?args, ?working_dir, "spawning process");

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(source) => {
                warn!(command, error = %source, "failed to spawn process");
                return ProcessResult::launch_failed(LaunchError::Spawn {
                    command: command.to_string(),
                    source,
                })
                .with_duration(start.elapsed());
            }
        };

        // Pipes are drained from here on, before anything waits on the child.
        let capture = StreamCapture::attach(child.stdout.take(), child.stderr.take());

        let waited = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => status.map_err(|source| LaunchError::Wait {
                    command: command.to_string(),
                    source,
                }),
                Err(_) => {
                    warn!(
                        command,
                        timeout_ms = limit.as_millis() as u64,
                        "process exceeded time-out; killing it"
                    );
                    if let Err(err) = child.kill().await {
                        warn!(command, error = %err, "failed to kill timed-out process");
                    }
                    Err(LaunchError::TimedOut {
                        command: command.to_string(),
                        timeout: limit,
                    })
                }
            },
            None => child.wait().await.map_err(|source| LaunchError::Wait {
                command: command.to_string(),
                source,
            }),
        };

        let drain_limit = match (&waited, self.timeout) {
            (Ok(_), Some(limit)) => limit.saturating_sub(start.elapsed()).max(MIN_DRAIN),
            _ => self.kill_grace,
        };
        let output = capture.await_completion_within(drain_limit).await;
        let duration = start.elapsed();
        if !output.complete {
            warn!(
                command,
                drain_limit_ms = drain_limit.as_millis() as u64,
                "output pipes still open after the process ended; keeping partial output"
            );
        }

        let output_complete = output.complete;
        let result = match waited {
            Ok(status) => {
                // Killed by a signal: no code of its own.
                let exit_code = status.code().unwrap_or(LAUNCH_FAILURE_EXIT_CODE);
                debug!(
                    command,
                    exit_code,
                    duration_ms = duration.as_millis() as u64,
                    stdout_bytes = output.stdout.len(),
                    stderr_bytes = output.stderr.len(),
                    "process exited"
                );
                ProcessResult::completed(exit_code, output.stdout, output.stderr)
                    .with_duration(duration)
            }
            Err(error) => ProcessResult::launch_failed(error)
                .with_output(output.stdout, output.stderr)
                .with_duration(duration),
        };
        if output_complete {
            result
        } else {
            result.with_incomplete_output()
        }
    }
}

impl CommandRunner for ProcessRunner {
    fn run<'a>(
        &'a self,
        working_dir: Option<&'a Path>,
        command: &'a str,
        args: &'a [String],
    ) -> Pin<Box<dyn Future<Output = ProcessResult> + Send + 'a>> {
        Box::pin(self.run_inner(working_dir, command, args))
    }
}
