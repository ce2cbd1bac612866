// src/config/resolve.rs

//! Merging CLI overrides on top of the config file.
//!
//! Precedence per setting: CLI flag, then config file, then built-in
//! default. The one exception is `exclude`, where CLI patterns are added to
//! the file's list rather than replacing it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::batch::{BatchSettings, SuffixRule};
use crate::cli::CliArgs;
use crate::config::model::ConfigFile;
use crate::errors::{LessbatchError, Result};
use crate::exec::runner::timeout_from_millis;
use crate::scan::FileSelector;

/// Everything a run needs, with paths made absolute.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub settings: BatchSettings,
    /// Per-invocation watchdog; `None` disables it.
    pub timeout: Option<Duration>,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub selector: FileSelector,
}

pub fn resolve(cfg: &ConfigFile, args: &CliArgs) -> Result<ResolvedConfig> {
    let compiler = cfg.compiler();
    let files = cfg.files();
    let base_dir = cfg.base_dir().unwrap_or(Path::new("."));

    let command = args
        .command
        .clone()
        .unwrap_or_else(|| compiler.command.clone());
    if command.trim().is_empty() {
        return Err(LessbatchError::ConfigError(
            "--command must not be empty".to_string(),
        ));
    }

    let source_dir = match (&args.source_dir, &files.source_dir) {
        (Some(cli), _) => cli.clone(),
        (None, Some(from_file)) => base_dir.join(from_file),
        (None, None) => base_dir.to_path_buf(),
    };
    let dest_dir = match (&args.dest_dir, &files.dest_dir) {
        (Some(cli), _) => cli.clone(),
        (None, Some(from_file)) => base_dir.join(from_file),
        (None, None) => source_dir.clone(),
    };

    let includes = if args.includes.is_empty() {
        files.include.clone()
    } else {
        args.includes.clone()
    };
    let mut excludes = files.exclude.clone();
    excludes.extend(args.excludes.iter().cloned());

    let selector = FileSelector::new(&includes, &excludes)
        .map_err(|e| LessbatchError::ConfigError(format!("{e:#}")))?
        .with_hidden(files.hidden || args.hidden);

    let suffix = SuffixRule::new(&files.source_suffix, &files.target_suffix)
        .map_err(|e| LessbatchError::ConfigError(format!("invalid suffix: {e}")))?;

    let settings = BatchSettings {
        command,
        source_dir: absolute(&source_dir)?,
        dest_dir: absolute(&dest_dir)?,
        overwrite: files.overwrite || args.overwrite,
        output_mode: args.output_mode.unwrap_or(compiler.output_mode),
        strict: compiler.strict && !args.lenient,
        suffix,
    };

    Ok(ResolvedConfig {
        settings,
        timeout: timeout_from_millis(args.timeout_ms.unwrap_or(compiler.timeout_ms)),
        includes,
        excludes,
        selector,
    })
}

fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(std::path::absolute(path)?)
}
