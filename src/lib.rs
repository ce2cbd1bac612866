// src/lib.rs

pub mod batch;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod report;
pub mod scan;
pub mod types;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::batch::{BatchError, BatchExecutor, check_dirs};
use crate::cli::CliArgs;
use crate::config::{ConfigFile, RawConfigFile, ResolvedConfig, default_config_path, load_and_validate, resolve};
use crate::errors::LessbatchError;
use crate::exec::ProcessRunner;
use crate::fs::{FileSystem, RealFileSystem};
use crate::report::TracingSink;
use crate::scan::scan_candidates;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and CLI overrides
/// - directory pre-flight and candidate scanning
/// - the process runner and the batch executor
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_config(&args)?;
    let resolved = resolve(&cfg, &args)?;
    let settings = &resolved.settings;

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    // Fail on bad directories before scanning, with the same error the
    // executor would raise.
    check_dirs(fs.as_ref(), &settings.source_dir, &settings.dest_dir)
        .map_err(|e| LessbatchError::Batch(BatchError::Preflight(e)))?;

    let candidates = if args.files.is_empty() {
        scan_candidates(fs.as_ref(), &settings.source_dir, &resolved.selector)
            .with_context(|| format!("scanning {:?}", settings.source_dir))?
    } else {
        args.files.clone()
    };
    info!(count = candidates.len(), "candidate files collected");

    if args.dry_run {
        print_dry_run(&resolved, &candidates);
        return Ok(());
    }

    let runner = Arc::new(ProcessRunner::new(resolved.timeout));
    let executor = BatchExecutor::new(resolved.settings, runner, fs, Arc::new(TracingSink));

    executor
        .execute(&candidates)
        .await
        .map_err(LessbatchError::from)?;
    Ok(())
}

/// Explicit `--config` must load; the default path is optional.
fn load_config(args: &CliArgs) -> Result<ConfigFile> {
    if let Some(path) = &args.config {
        return load_and_validate(path).with_context(|| format!("loading config from {:?}", path));
    }

    let default_path = default_config_path();
    if default_path.is_file() {
        debug!(path = ?default_path, "using default config file");
        load_and_validate(&default_path)
            .with_context(|| format!("loading config from {:?}", default_path))
    } else {
        Ok(ConfigFile::try_from(RawConfigFile::default())?)
    }
}

/// Simple dry-run output: print resolved settings and the candidate list.
fn print_dry_run(resolved: &ResolvedConfig, candidates: &[String]) {
    let settings = &resolved.settings;
    println!("lessbatch dry-run");
    println!("  command = {}", settings.command);
    match resolved.timeout {
        Some(t) => println!("  timeout_ms = {}", t.as_millis()),
        None => println!("  timeout_ms = (disabled)"),
    }
    println!("  source_dir = {}", settings.source_dir.display());
    println!("  dest_dir = {}", settings.dest_dir.display());
    println!("  overwrite = {}", settings.overwrite);
    println!("  strict = {}", settings.strict);
    println!(
        "  output = {}",
        if settings.captures_stdout() { "stdout" } else { "argument" }
    );
    println!("  include = {:?}", resolved.includes);
    if !resolved.excludes.is_empty() {
        println!("  exclude = {:?}", resolved.excludes);
    }
    println!();

    println!("files ({}):", candidates.len());
    for name in candidates {
        let input = settings.source_dir.join(name);
        match settings.suffix.output_path(&input, &settings.dest_dir) {
            Some(output) => println!("  - {name} -> {}", output.display()),
            None => println!("  - {name} (ignored: not {})", settings.suffix.source_suffix()),
        }
    }

    debug!("dry-run complete (no execution)");
}
