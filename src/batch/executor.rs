// src/batch/executor.rs

//! The incremental batch driver.
//!
//! Files are handled strictly one after another, in the order given. For
//! each candidate the executor decides between three outcomes:
//!
//! - **Skipped**: the name lacks the source suffix, the input is gone, or
//!   (unless `overwrite` is set) the output exists and is strictly newer than
//!   the input. Equal timestamps are recompiled.
//! - **Succeeded**: the compiler ran cleanly.
//! - **Failed**: the compiler could not be run, exited non-zero, (in
//!   strict mode) printed diagnostics while exiting 0, or an earlier
//!   candidate in the same batch already maps to the same output file.
//!   Outputs are flat in the destination dir, so `a/x.less` and
//!   `b/x.less` collide on `x.css`.
//!
//! A failing file never stops the batch; only the final tally decides
//! whether `execute` returns `BatchFailure`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::batch::outcome::{BatchError, BatchOutcome, FileOutcome};
use crate::batch::paths::SuffixRule;
use crate::batch::preflight::check_dirs;
use crate::exec::probe::VersionProbe;
use crate::exec::result::ProcessResult;
use crate::exec::runner::CommandRunner;
use crate::fs::FileSystem;
use crate::report::{LogSink, Severity, quote};
use crate::types::OutputMode;

/// Resolved settings for one batch run.
///
/// Directories should be absolute: the compiler runs with the input file's
/// directory as its working directory and receives these paths verbatim.
#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub command: String,
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub overwrite: bool,
    pub output_mode: OutputMode,
    /// Treat non-empty diagnostic output as failure even on exit code 0.
    pub strict: bool,
    pub suffix: SuffixRule,
}

impl BatchSettings {
    pub fn captures_stdout(&self) -> bool {
        self.output_mode.captures_stdout(&self.command)
    }
}

pub struct BatchExecutor {
    settings: BatchSettings,
    runner: Arc<dyn CommandRunner>,
    fs: Arc<dyn FileSystem>,
    log: Arc<dyn LogSink>,
}

impl BatchExecutor {
    pub fn new(
        settings: BatchSettings,
        runner: Arc<dyn CommandRunner>,
        fs: Arc<dyn FileSystem>,
        log: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            settings,
            runner,
            fs,
            log,
        }
    }

    pub fn settings(&self) -> &BatchSettings {
        &self.settings
    }

    /// Run the whole batch over `candidates` (paths relative to the source
    /// directory).
    ///
    /// Returns the counters when no file failed. Pre-flight problems abort
    /// before anything is spawned; otherwise every candidate is considered
    /// and a `BatchFailure` is returned if at least one failed.
    pub async fn execute(&self, candidates: &[String]) -> Result<BatchOutcome, BatchError> {
        let settings = &self.settings;
        check_dirs(self.fs.as_ref(), &settings.source_dir, &settings.dest_dir)?;

        self.log_command_version().await;

        self.log.log(
            Severity::Verbose,
            &format!(
                "Transforming from {} to {}.",
                settings.source_dir.display(),
                settings.dest_dir.display()
            ),
        );

        let start = Instant::now();
        let mut outcome = BatchOutcome::default();
        let mut claimed = HashMap::new();
        for in_file_name in candidates {
            let file_outcome = self.process_file(in_file_name, &mut claimed).await;
            outcome.record(file_outcome);
        }
        outcome.duration = start.elapsed();

        self.finish(outcome)
    }

    async fn log_command_version(&self) {
        let command = &self.settings.command;
        match VersionProbe::new(self.runner.as_ref()).probe(command).await {
            Ok(version) => self.log.log(
                Severity::Verbose,
                &format!("Using command {}, version is {}.", quote(command), quote(&version)),
            ),
            Err(err) => self.log.log(
                Severity::Notice,
                &format!("Failed to determine command version: {err}."),
            ),
        }
    }

    /// `claimed` maps each output path to the candidate that produced it.
    async fn process_file<'c>(
        &self,
        in_file_name: &'c str,
        claimed: &mut HashMap<PathBuf, &'c str>,
    ) -> FileOutcome {
        let settings = &self.settings;
        let start = Instant::now();
        let in_file = settings.source_dir.join(in_file_name);

        let Some(out_file) = settings.suffix.output_path(&in_file, &settings.dest_dir) else {
            self.log.log(
                Severity::Verbose,
                &format!(
                    "Skipping {} because it does not end in {}.",
                    quote(in_file_name),
                    quote(settings.suffix.source_suffix())
                ),
            );
            return FileOutcome::Skipped;
        };

        if !self.fs.is_file(&in_file) {
            self.log.log(
                Severity::Verbose,
                &format!("Skipping {} because it no longer exists.", quote(in_file_name)),
            );
            return FileOutcome::Skipped;
        }

        if let Some(first) = claimed.get(&out_file) {
            self.log.log(
                Severity::Error,
                &format!(
                    "Failed to transform {}: output file {} is already produced by {}.",
                    quote(in_file_name),
                    quote(&out_file.to_string_lossy()),
                    quote(first)
                ),
            );
            return FileOutcome::Failed;
        }
        claimed.insert(out_file.clone(), in_file_name);

        if self.is_up_to_date(&in_file, &out_file) {
            self.log.log(
                Severity::Verbose,
                &format!("Skipping {} because output file is newer.", quote(in_file_name)),
            );
            return FileOutcome::Skipped;
        }

        self.transform(in_file_name, &in_file, &out_file, start).await
    }

    /// Output exists and its mtime is strictly greater than the input's.
    fn is_up_to_date(&self, in_file: &Path, out_file: &Path) -> bool {
        if self.settings.overwrite || !self.fs.exists(out_file) {
            return false;
        }
        match (self.fs.modified(out_file), self.fs.modified(in_file)) {
            (Some(out_time), Some(in_time)) => out_time > in_time,
            _ => false,
        }
    }

    async fn transform(
        &self,
        in_file_name: &str,
        in_file: &Path,
        out_file: &Path,
        start: Instant,
    ) -> FileOutcome {
        let settings = &self.settings;
        let stdout_is_output = settings.captures_stdout();

        let in_path = in_file.to_string_lossy().into_owned();
        let args = if stdout_is_output {
            vec![in_path]
        } else {
            vec![in_path, out_file.to_string_lossy().into_owned()]
        };
        let working_dir = in_file.parent();

        let result = self.runner.run(working_dir, &settings.command, &args).await;

        // Partial stdout must not be written out as the compiled result.
        let truncated = stdout_is_output && !result.output_complete();
        let mut failed = result.failed()
            || truncated
            || (settings.strict && result.diagnostic_output(!stdout_is_output).is_some());

        let mut write_error = None;
        if stdout_is_output && !failed {
            if let Err(err) = self.fs.write(out_file, result.stdout_bytes()) {
                write_error = Some(format!(
                    "Failed to write output to file {}: {err:#}",
                    quote(&out_file.to_string_lossy())
                ));
                failed = true;
            }
        }

        let elapsed = start.elapsed();
        if failed {
            let message = failure_message(
                &in_file.to_string_lossy(),
                elapsed,
                &result,
                stdout_is_output,
                write_error.as_deref(),
            );
            self.log.log(Severity::Error, &message);
            FileOutcome::Failed
        } else {
            self.log.log(
                Severity::Verbose,
                &format!(
                    "Transformed {} (took {} ms).",
                    quote(in_file_name),
                    elapsed.as_millis()
                ),
            );
            FileOutcome::Succeeded
        }
    }

    fn finish(&self, outcome: BatchOutcome) -> Result<BatchOutcome, BatchError> {
        match outcome.into_result() {
            Ok(outcome) => {
                self.log.log(
                    Severity::Notice,
                    &format!(
                        "{} file(s) transformed in {} ms; {} unmodified file(s) skipped.",
                        outcome.succeeded,
                        outcome.duration.as_millis(),
                        outcome.skipped
                    ),
                );
                Ok(outcome)
            }
            Err(failure) => {
                self.log.log(Severity::Error, &failure.to_string());
                Err(failure.into())
            }
        }
    }
}

/// Build the per-file error line: the cause, then whatever the compiler
/// printed (stderr first, stdout as fallback unless stdout is the output).
fn failure_message(
    in_path: &str,
    elapsed: Duration,
    result: &ProcessResult,
    stdout_is_output: bool,
    write_error: Option<&str>,
) -> String {
    let mut message = format!(
        "Failed to transform {} (took {} ms). ",
        quote(in_path),
        elapsed.as_millis()
    );

    if let Some(err) = write_error {
        message.push_str(err);
        message.push_str(". ");
    } else if let Some(err) = result.launch_error() {
        message.push_str(&format!("{err}. "));
    } else if result.exit_code() != 0 {
        message.push_str(&format!("Exit code {}. ", result.exit_code()));
    } else if stdout_is_output && !result.output_complete() {
        message.push_str("Output was cut short because the pipes stayed open after exit. ");
    }

    let stderr = result.stderr();
    let stdout = result.stdout();
    if !stderr.trim().is_empty() {
        message.push_str("Stderr output was received:\n");
        message.push_str(stderr.trim_end());
    } else if stdout_is_output {
        message.push_str("No stderr output was received.");
    } else if !stdout.trim().is_empty() {
        message.push_str("No stderr output was received, but stdout was received:\n");
        message.push_str(stdout.trim_end());
    } else {
        message.push_str("No output was received on either stderr or stdout.");
    }

    message
}
