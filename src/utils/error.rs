//! Custom error types for user-cert-report
//!
//! This module defines domain-specific error types using `thiserror` for
//! the failure modes of decoding, directory lookup, configuration and report
//! writing. Missing certificates and missing template extensions are not
//! errors and never appear here.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the exporter
#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error("Certificate decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raw certificate bytes that could not be turned into a certificate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Failed to parse certificate: {message}")]
    Malformed { message: String },

    #[error("Certificate {field} time is out of range")]
    InvalidTime { field: &'static str },

    #[error("Failed to decode PEM certificate: {message}")]
    Pem { message: String },
}

/// Directory source errors
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Failed to read directory export {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid directory export at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Identifier '{identifier}' matches {count} directory entries")]
    Ambiguous { identifier: String, count: usize },
}

/// Report output errors
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Output location {path} is not usable: {message}")]
    OutputPath { path: PathBuf, message: String },

    #[error("Failed to write report to {path}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("Failed to serialize report: {message}")]
    Serialize { message: String },
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias using ToolkitError
pub type Result<T> = std::result::Result<T, ToolkitError>;
