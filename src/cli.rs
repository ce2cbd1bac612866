// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every option here overrides the matching key of the TOML config file;
//! options left unset fall through to the file and then to built-in defaults.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::OutputMode;

/// Command-line arguments for `lessbatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "lessbatch",
    version,
    about = "Compile .less files to .css, skipping outputs that are already up to date.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Lessbatch.toml` in the current working directory, used only
    /// if it exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory to read source files from.
    #[arg(long, value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// Directory to write compiled files to (defaults to the source dir).
    #[arg(long, value_name = "DIR")]
    pub dest_dir: Option<PathBuf>,

    /// Compiler command to run, e.g. `lessc` or `/usr/local/bin/plessc`.
    #[arg(long, value_name = "CMD")]
    pub command: Option<String>,

    /// Per-file time-out in milliseconds; 0 or lower disables it.
    #[arg(long, value_name = "MS", allow_negative_numbers = true)]
    pub timeout_ms: Option<i64>,

    /// Recompile even when the output file is newer than its source.
    #[arg(long)]
    pub overwrite: bool,

    /// Glob selecting source files, relative to the source dir (repeatable).
    #[arg(long = "include", value_name = "GLOB")]
    pub includes: Vec<String>,

    /// Glob excluding source files, relative to the source dir (repeatable).
    #[arg(long = "exclude", value_name = "GLOB")]
    pub excludes: Vec<String>,

    /// Also scan dotfiles and hidden directories.
    #[arg(long)]
    pub hidden: bool,

    /// How the compiler delivers its output: auto, argument or stdout.
    #[arg(long, value_name = "MODE")]
    pub output_mode: Option<OutputMode>,

    /// Only the exit code decides success; diagnostic output is tolerated.
    #[arg(long)]
    pub lenient: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `LESSBATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve settings and list candidate files, but don't run the compiler.
    #[arg(long)]
    pub dry_run: bool,

    /// Explicit source files relative to the source dir; skips scanning.
    #[arg(value_name = "FILES")]
    pub files: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
