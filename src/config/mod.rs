//! Configuration module for user-cert-report
//!
//! Handles loading and managing configuration from TOML files.

pub mod settings;

pub use settings::{DirectorySettings, ReportSettings, RunSettings, Settings};

use crate::utils::ConfigError;
use std::path::Path;

/// Load settings from `path`, or from the default location when `None`
pub fn load_config(path: Option<&Path>) -> Result<Settings, ConfigError> {
    match path {
        Some(path) => Settings::load_from_file(path),
        None => Settings::load_default(),
    }
}
