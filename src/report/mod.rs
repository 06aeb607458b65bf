//! Report generation module
//!
//! Resolves the output directory, names report files and writes a user's
//! batch as CSV or JSON.

pub mod csv;
pub mod json;

use crate::config::ReportSettings;
use crate::models::UserCertificateBatch;
use crate::utils::ReportError;
use chrono::{DateTime, Local};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Report file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Delimited text, one row per certificate (default)
    #[default]
    Csv,
    /// Pretty-printed JSON document
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Csv => write!(f, "csv"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

/// Where reports will be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDir {
    pub path: PathBuf,
    /// Set when the requested path was a file and its parent is used instead
    pub fallback_from: Option<PathBuf>,
}

/// Validate or create the output directory.
///
/// An existing directory is used as is. An existing file makes its parent
/// directory the output location. A missing path is created.
pub fn resolve_output_dir(path: &Path) -> Result<OutputDir, ReportError> {
    if path.is_dir() {
        return Ok(OutputDir {
            path: path.to_path_buf(),
            fallback_from: None,
        });
    }

    if path.exists() {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        warn!(
            requested = %path.display(),
            using = %parent.display(),
            "output path is a file, using its directory"
        );
        return Ok(OutputDir {
            path: parent,
            fallback_from: Some(path.to_path_buf()),
        });
    }

    std::fs::create_dir_all(path).map_err(|e| ReportError::OutputPath {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    debug!(path = %path.display(), "created output directory");

    Ok(OutputDir {
        path: path.to_path_buf(),
        fallback_from: None,
    })
}

/// Replace characters that are not allowed in file names
pub fn sanitize_file_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if trimmed.is_empty() {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Writes per-user report files into one directory
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
    settings: ReportSettings,
}

impl ReportWriter {
    pub fn new(dir: PathBuf, settings: ReportSettings) -> Self {
        Self { dir, settings }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn format(&self) -> ReportFormat {
        self.settings.format
    }

    /// `<account>_Certificates_<timestamp>.<ext>`
    pub fn file_name(&self, account: &str, generated_at: DateTime<Local>) -> String {
        format!(
            "{}_Certificates_{}.{}",
            sanitize_file_component(account),
            generated_at.format(&self.settings.timestamp_format),
            self.settings.format.extension()
        )
    }

    /// Write the batch, overwriting any existing file of the same name
    pub fn write(
        &self,
        batch: &UserCertificateBatch,
        account: &str,
    ) -> Result<PathBuf, ReportError> {
        let generated_at = Local::now();
        let path = self.dir.join(self.file_name(account, generated_at));
        let write_err = |message: String| ReportError::Write {
            path: path.clone(),
            message,
        };

        match self.settings.format {
            ReportFormat::Csv => {
                let file = File::create(&path).map_err(|e| write_err(e.to_string()))?;
                csv::write_csv(
                    BufWriter::new(file),
                    &batch.records,
                    self.settings.delimiter,
                    &self.settings.date_format,
                )
                .map_err(|e| write_err(e.to_string()))?;
            }
            ReportFormat::Json => {
                let content = json::to_json_string(batch, account, generated_at)?;
                std::fs::write(&path, content).map_err(|e| write_err(e.to_string()))?;
            }
        }

        debug!(path = %path.display(), records = batch.records.len(), "wrote report");
        Ok(path)
    }
}
