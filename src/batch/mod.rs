// src/batch/mod.rs

//! Incremental batch driver.
//!
//! - [`executor`] walks the candidate list one file at a time, decides
//!   whether each needs compiling, runs the compiler and keeps the counts.
//! - [`outcome`] holds the per-file classification, the aggregate counters
//!   and the `BatchFailure` raised when any file failed.
//! - [`paths`] maps a source file name onto its output file name.
//! - [`preflight`] validates source and destination directories before any
//!   process is spawned.

pub mod executor;
pub mod outcome;
pub mod paths;
pub mod preflight;

pub use executor::{BatchExecutor, BatchSettings};
pub use outcome::{BatchError, BatchFailure, BatchOutcome, FileOutcome};
pub use paths::SuffixRule;
pub use preflight::{PreflightError, check_dir, check_dirs};
