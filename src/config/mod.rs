// src/config/mod.rs

//! Configuration loading and validation for lessbatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate basic invariants like suffixes and globs (`validate.rs`).
//! - Merge file values with CLI overrides into the settings a batch run
//!   needs (`resolve.rs`).

pub mod loader;
pub mod model;
pub mod resolve;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{CompilerSection, ConfigFile, FilesSection, RawConfigFile};
pub use resolve::{ResolvedConfig, resolve};
pub use validate::validate_config;
