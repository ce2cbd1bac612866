// src/exec/mod.rs

//! Process execution layer.
//!
//! This module runs the external compiler with `tokio::process::Command` and
//! turns each invocation into a [`ProcessResult`].
//!
//! - [`result`] holds `ProcessResult` and the `LaunchError` taxonomy.
//! - [`capture`] drains a child's stdout and stderr concurrently so neither
//!   pipe can fill up and block the child.
//! - [`runner`] provides the `CommandRunner` trait and the production
//!   `ProcessRunner` with its time-out watchdog. Tests can swap in their own
//!   runner that never spawns a process.
//! - [`probe`] asks the compiler for its version before a batch starts.

pub mod capture;
pub mod probe;
pub mod result;
pub mod runner;

pub use capture::{CapturedOutput, StreamCapture};
pub use probe::{ProbeError, VersionProbe, parse_version};
pub use result::{LAUNCH_FAILURE_EXIT_CODE, LaunchError, ProcessResult};
pub use runner::{CommandRunner, DEFAULT_TIMEOUT, ProcessRunner, timeout_from_millis};
