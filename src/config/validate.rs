// src/config/validate.rs

use crate::config::model::RawConfigFile;
use crate::errors::{LessbatchError, Result};
use crate::scan::build_globset;

/// Run basic semantic validation against a loaded configuration.
///
/// This checks:
/// - the compiler command is not empty
/// - both suffixes start with `.` and differ
/// - there is at least one include pattern
/// - every include/exclude glob compiles
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    validate_compiler(cfg)?;
    validate_suffixes(cfg)?;
    validate_patterns(cfg)?;
    Ok(())
}

fn config_error(msg: impl Into<String>) -> LessbatchError {
    LessbatchError::ConfigError(msg.into())
}

fn validate_compiler(cfg: &RawConfigFile) -> Result<()> {
    if cfg.compiler.command.trim().is_empty() {
        return Err(config_error("[compiler].command must not be empty"));
    }
    Ok(())
}

fn validate_suffixes(cfg: &RawConfigFile) -> Result<()> {
    let files = &cfg.files;
    for (key, suffix) in [
        ("source_suffix", &files.source_suffix),
        ("target_suffix", &files.target_suffix),
    ] {
        if suffix.len() < 2 || !suffix.starts_with('.') {
            return Err(config_error(format!(
                "[files].{key} must start with '.' and name an extension (got {suffix:?})"
            )));
        }
    }
    if files.source_suffix.eq_ignore_ascii_case(&files.target_suffix) {
        return Err(config_error(format!(
            "[files].source_suffix and target_suffix are both {:?}; output would overwrite input",
            files.source_suffix
        )));
    }
    Ok(())
}

fn validate_patterns(cfg: &RawConfigFile) -> Result<()> {
    if cfg.files.include.is_empty() {
        return Err(config_error("[files].include must contain at least one pattern"));
    }
    build_globset(&cfg.files.include)
        .map_err(|e| config_error(format!("[files].include: {e:#}")))?;
    build_globset(&cfg.files.exclude)
        .map_err(|e| config_error(format!("[files].exclude: {e:#}")))?;
    Ok(())
}
