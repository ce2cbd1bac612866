// src/batch/outcome.rs

use std::time::Duration;

use thiserror::Error;

use crate::batch::preflight::PreflightError;

/// Classification of a single candidate file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Not compiled: output up to date, wrong suffix, or input gone.
    Skipped,
    Succeeded,
    Failed,
}

/// Counters for one batch run.
///
/// `succeeded + failed + skipped` always equals the number of candidates
/// the run has considered so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration: Duration,
}

impl BatchOutcome {
    pub fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Skipped => self.skipped += 1,
            FileOutcome::Succeeded => self.succeeded += 1,
            FileOutcome::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.skipped
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// `Ok(self)` when nothing failed, otherwise the matching `BatchFailure`.
    pub fn into_result(self) -> Result<BatchOutcome, BatchFailure> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(BatchFailure {
                failed: self.failed,
                succeeded: self.succeeded,
                skipped: self.skipped,
                duration: self.duration,
            })
        }
    }
}

/// One or more files failed to transform.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "{failed} file(s) failed to transform, while {succeeded} succeeded. Total duration is {} ms.",
    .duration.as_millis()
)]
pub struct BatchFailure {
    pub failed: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub duration: Duration,
}

/// Everything that can stop `BatchExecutor::execute` from returning an
/// outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    #[error(transparent)]
    Preflight(#[from] PreflightError),

    #[error(transparent)]
    Failed(#[from] BatchFailure),
}
