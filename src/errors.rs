// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! The batch engine has its own typed errors close to where they are raised
//! (`LaunchError`, `ProbeError`, `PreflightError`, `BatchFailure`); this enum
//! is what the configuration and application layers return.

use thiserror::Error;

use crate::batch::BatchError;

#[derive(Error, Debug)]
pub enum LessbatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Batch(#[from] BatchError),
}

pub type Result<T> = std::result::Result<T, LessbatchError>;
