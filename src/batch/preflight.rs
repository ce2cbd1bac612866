// src/batch/preflight.rs

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::fs::FileSystem;

/// A directory failed its pre-flight check; the batch does not start.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreflightError {
    #[error("{description} (\"{}\") does not exist", .path.display())]
    Missing {
        description: &'static str,
        path: PathBuf,
    },

    #[error("{description} (\"{}\") is not a directory", .path.display())]
    NotADirectory {
        description: &'static str,
        path: PathBuf,
    },

    #[error("{description} (\"{}\") is not readable", .path.display())]
    NotReadable {
        description: &'static str,
        path: PathBuf,
    },

    #[error("{description} (\"{}\") is not writable", .path.display())]
    NotWritable {
        description: &'static str,
        path: PathBuf,
    },
}

/// Check that `path` is an existing directory with the required access.
pub fn check_dir(
    fs: &dyn FileSystem,
    description: &'static str,
    path: &Path,
    must_be_readable: bool,
    must_be_writable: bool,
) -> Result<(), PreflightError> {
    let path_buf = || path.to_path_buf();

    if !fs.exists(path) {
        return Err(PreflightError::Missing {
            description,
            path: path_buf(),
        });
    }
    if !fs.is_dir(path) {
        return Err(PreflightError::NotADirectory {
            description,
            path: path_buf(),
        });
    }
    if must_be_readable && !fs.can_read_dir(path) {
        return Err(PreflightError::NotReadable {
            description,
            path: path_buf(),
        });
    }
    if must_be_writable && !fs.can_write_dir(path) {
        return Err(PreflightError::NotWritable {
            description,
            path: path_buf(),
        });
    }
    Ok(())
}

/// Source must be readable, destination writable.
pub fn check_dirs(fs: &dyn FileSystem, source_dir: &Path, dest_dir: &Path) -> Result<(), PreflightError> {
    check_dir(fs, "Source directory", source_dir, true, false)?;
    check_dir(fs, "Destination directory", dest_dir, false, true)?;
    Ok(())
}
