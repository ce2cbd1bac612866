// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::LessbatchError;
use crate::scan::DEFAULT_INCLUDE;
use crate::types::OutputMode;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [compiler]
/// command = "lessc"
/// timeout_ms = 60000
/// output_mode = "auto"
/// strict = true
///
/// [files]
/// source_dir = "styles"
/// dest_dir = "public/css"
/// include = ["*.less"]
/// exclude = ["_*.less"]
/// overwrite = false
/// hidden = false
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    /// How the compiler is invoked, from `[compiler]`.
    #[serde(default)]
    pub compiler: CompilerSection,

    /// Which files are compiled and where output goes, from `[files]`.
    #[serde(default)]
    pub files: FilesSection,
}

/// `[compiler]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CompilerSection {
    /// The command to execute, e.g. `"lessc"` or `"/usr/local/bin/plessc"`.
    #[serde(default = "default_command")]
    pub command: String,

    /// Time-out for a single compiler invocation, in milliseconds.
    /// `0` or lower disables it.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: i64,

    #[serde(default)]
    pub output_mode: OutputMode,

    /// If true, a file whose compiler run printed diagnostics counts as
    /// failed even when the exit code was 0.
    #[serde(default = "default_strict")]
    pub strict: bool,
}

fn default_command() -> String {
    "lessc".to_string()
}

fn default_timeout_ms() -> i64 {
    60_000
}

fn default_strict() -> bool {
    true
}

impl Default for CompilerSection {
    fn default() -> Self {
        Self {
            command: default_command(),
            timeout_ms: default_timeout_ms(),
            output_mode: OutputMode::default(),
            strict: default_strict(),
        }
    }
}

/// `[files]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesSection {
    /// Source directory; relative paths are taken from the config file's
    /// directory. Defaults to the current directory.
    #[serde(default)]
    pub source_dir: Option<PathBuf>,

    /// Destination directory; defaults to the source directory.
    #[serde(default)]
    pub dest_dir: Option<PathBuf>,

    #[serde(default = "default_include")]
    pub include: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,

    /// Recompile even when the output is newer than the input.
    #[serde(default)]
    pub overwrite: bool,

    /// Also scan files and directories whose name starts with `.`.
    #[serde(default)]
    pub hidden: bool,

    #[serde(default = "default_source_suffix")]
    pub source_suffix: String,

    #[serde(default = "default_target_suffix")]
    pub target_suffix: String,
}

fn default_include() -> Vec<String> {
    vec![DEFAULT_INCLUDE.to_string()]
}

fn default_source_suffix() -> String {
    ".less".to_string()
}

fn default_target_suffix() -> String {
    ".css".to_string()
}

impl Default for FilesSection {
    fn default() -> Self {
        Self {
            source_dir: None,
            dest_dir: None,
            include: default_include(),
            exclude: Vec::new(),
            overwrite: false,
            hidden: false,
            source_suffix: default_source_suffix(),
            target_suffix: default_target_suffix(),
        }
    }
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>`, so holders can rely on
/// the checks in `validate.rs` having passed.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    compiler: CompilerSection,
    files: FilesSection,
    /// Directory relative `[files]` paths are resolved against.
    base_dir: Option<PathBuf>,
}

impl ConfigFile {
    pub fn compiler(&self) -> &CompilerSection {
        &self.compiler
    }

    pub fn files(&self) -> &FilesSection {
        &self.files
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }
}

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = LessbatchError;

    fn try_from(raw: RawConfigFile) -> Result<Self, Self::Error> {
        crate::config::validate::validate_config(&raw)?;
        Ok(Self {
            compiler: raw.compiler,
            files: raw.files,
            base_dir: None,
        })
    }
}
