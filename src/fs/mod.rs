// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};

pub mod mock;

/// Abstract filesystem interface.
///
/// All queries are synchronous; the batch driver only asks about a handful
/// of paths per file.
pub trait FileSystem: Send + Sync + Debug {
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;

    /// Last-modified time, or `None` if the path does not exist or the
    /// platform cannot report it.
    fn modified(&self, path: &Path) -> Option<SystemTime>;

    /// Whether the directory's entries can be listed.
    fn can_read_dir(&self, path: &Path) -> bool;

    /// Whether files can be created in the directory.
    fn can_write_dir(&self, path: &Path) -> bool;

    /// Return a list of entries in a directory.
    /// Returns full paths.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        // Callers write into an already checked destination dir; no mkdir.
        fs::write(path, contents).with_context(|| format!("writing {} bytes to {:?}", contents.len(), path))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn modified(&self, path: &Path) -> Option<SystemTime> {
        fs::metadata(path).and_then(|m| m.modified()).ok()
    }

    fn can_read_dir(&self, path: &Path) -> bool {
        fs::read_dir(path).is_ok()
    }

    /// Permission bits alone are not enough (root ignores them, ownership
    /// and ACLs matter), so this creates and removes a scratch file.
    fn can_write_dir(&self, path: &Path) -> bool {
        path.is_dir()
            && tempfile::Builder::new()
                .prefix(".lessbatch-write-check-")
                .tempfile_in(path)
                .is_ok()
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).with_context(|| format!("reading dir {:?}", path))? {
            let entry = entry?;
            entries.push(entry.path());
        }
        Ok(entries)
    }
}
