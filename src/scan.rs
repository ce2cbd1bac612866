// src/scan.rs

//! Candidate discovery: which files under the source dir get considered.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::fs::FileSystem;

/// Default include pattern when neither config nor CLI gives one.
pub const DEFAULT_INCLUDE: &str = "*.less";

/// Compiled include/exclude patterns.
///
/// Patterns are matched against `/`-separated paths relative to the source
/// dir. `*` stops at `/`, so `*.less` only picks up top-level files; use
/// `**/*.less` to descend. Outputs are written flat into the destination,
/// so a recursive pattern can map two inputs onto one output.
///
/// Paths with a component starting with `.` (dotfiles, editor lock files
/// like `.#site.less`, hidden dirs) are left out unless `with_hidden(true)`
/// is set.
#[derive(Clone)]
pub struct FileSelector {
    include_set: GlobSet,
    exclude_set: Option<GlobSet>,
    include_hidden: bool,
}

impl fmt::Debug for FileSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSelector")
            .field("includes", &self.include_set.len())
            .field("excludes", &self.exclude_set.as_ref().map_or(0, |s| s.len()))
            .field("include_hidden", &self.include_hidden)
            .finish()
    }
}

impl FileSelector {
    pub fn new(includes: &[String], excludes: &[String]) -> Result<Self> {
        let include_set = build_globset(includes).context("building include globset")?;
        let exclude_set = if excludes.is_empty() {
            None
        } else {
            Some(build_globset(excludes).context("building exclude globset")?)
        };
        Ok(Self {
            include_set,
            exclude_set,
            include_hidden: false,
        })
    }

    pub fn with_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    /// True if `rel_path` matches an include pattern and no exclude pattern.
    pub fn matches(&self, rel_path: &str) -> bool {
        if !self.include_hidden && is_hidden(rel_path) {
            return false;
        }
        if !self.include_set.is_match(rel_path) {
            return false;
        }
        if let Some(exclude) = &self.exclude_set {
            if exclude.is_match(rel_path) {
                return false;
            }
        }
        true
    }
}

fn is_hidden(rel_path: &str) -> bool {
    rel_path.split('/').any(|part| part.starts_with('.'))
}

/// Build a GlobSet from string patterns; `*` and `?` do not match `/`.
pub fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = GlobBuilder::new(pat)
            .literal_separator(true)
            .build()
            .with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Collect all files under `root` accepted by `selector`.
///
/// Returns `/`-separated paths relative to `root`, sorted so that runs over
/// the same tree always visit files in the same order.
pub fn scan_candidates(
    fs: &dyn FileSystem,
    root: &Path,
    selector: &FileSelector,
) -> Result<Vec<String>> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        for path in fs.read_dir(&dir)? {
            if fs.is_dir(&path) {
                stack.push(path);
            } else if fs.is_file(&path) {
                if let Ok(rel) = path.strip_prefix(root) {
                    let rel_str = rel.to_string_lossy().replace('\\', "/");
                    if selector.matches(&rel_str) {
                        files.push(rel_str);
                    }
                }
            }
        }
    }

    files.sort();
    Ok(files)
}
