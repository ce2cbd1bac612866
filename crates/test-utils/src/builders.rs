#![allow(dead_code)]

use std::path::PathBuf;

use lessbatch::batch::{BatchSettings, SuffixRule};
use lessbatch::types::OutputMode;

/// Builder for `BatchSettings` to simplify test setup.
///
/// Defaults: command `lessc`, `.less` -> `.css`, strict, no overwrite,
/// argument output mode.
pub struct BatchSettingsBuilder {
    command: String,
    source_dir: PathBuf,
    dest_dir: PathBuf,
    overwrite: bool,
    output_mode: OutputMode,
    strict: bool,
    source_suffix: String,
    target_suffix: String,
}

impl BatchSettingsBuilder {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        let source_dir = source_dir.into();
        Self {
            command: "lessc".to_string(),
            dest_dir: source_dir.clone(),
            source_dir,
            overwrite: false,
            output_mode: OutputMode::Argument,
            strict: true,
            source_suffix: ".less".to_string(),
            target_suffix: ".css".to_string(),
        }
    }

    pub fn dest_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dest_dir = dir.into();
        self
    }

    pub fn command(mut self, command: &str) -> Self {
        self.command = command.to_string();
        self
    }

    pub fn overwrite(mut self, val: bool) -> Self {
        self.overwrite = val;
        self
    }

    pub fn output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    pub fn strict(mut self, val: bool) -> Self {
        self.strict = val;
        self
    }

    pub fn suffixes(mut self, source: &str, target: &str) -> Self {
        self.source_suffix = source.to_string();
        self.target_suffix = target.to_string();
        self
    }

    pub fn build(self) -> BatchSettings {
        BatchSettings {
            command: self.command,
            source_dir: self.source_dir,
            dest_dir: self.dest_dir,
            overwrite: self.overwrite,
            output_mode: self.output_mode,
            strict: self.strict,
            suffix: SuffixRule::new(&self.source_suffix, &self.target_suffix)
                .expect("valid suffix rule"),
        }
    }
}
