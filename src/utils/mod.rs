//! Utility modules for user-cert-report
//!
//! This module contains error types and other shared helpers.

pub mod error;

pub use error::{ConfigError, DecodeError, DirectoryError, ReportError, Result, ToolkitError};
