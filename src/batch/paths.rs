// src/batch/paths.rs

use std::path::{Path, PathBuf};

use regex::{NoExpand, Regex};

/// Source-to-target suffix mapping, e.g. `.less` -> `.css`.
///
/// Matching is case-insensitive and anchored at the end of the file name.
#[derive(Debug, Clone)]
pub struct SuffixRule {
    source_suffix: String,
    target_suffix: String,
    pattern: Regex,
}

impl SuffixRule {
    pub fn new(source_suffix: &str, target_suffix: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!("(?i){}$", regex::escape(source_suffix)))?;
        Ok(Self {
            source_suffix: source_suffix.to_string(),
            target_suffix: target_suffix.to_string(),
            pattern,
        })
    }

    pub fn source_suffix(&self) -> &str {
        &self.source_suffix
    }

    pub fn target_suffix(&self) -> &str {
        &self.target_suffix
    }

    /// Whether `file_name` ends in the source suffix.
    pub fn matches(&self, file_name: &str) -> bool {
        self.pattern.is_match(file_name)
    }

    /// `"site.less"` -> `Some("site.css")`; `None` for names without the
    /// source suffix.
    pub fn output_file_name(&self, file_name: &str) -> Option<String> {
        if !self.matches(file_name) {
            return None;
        }
        Some(
            self.pattern
                .replace(file_name, NoExpand(&self.target_suffix))
                .into_owned(),
        )
    }

    /// Output path for `input`: its file name with the target suffix,
    /// placed directly in `dest_dir`.
    pub fn output_path(&self, input: &Path, dest_dir: &Path) -> Option<PathBuf> {
        let file_name = input.file_name()?.to_str()?;
        Some(dest_dir.join(self.output_file_name(file_name)?))
    }
}
