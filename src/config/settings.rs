//! Application settings configuration
//!
//! Defines report output, directory source, concurrency and template-name
//! settings.

use crate::certificate::names::is_dotted_oid;
use crate::certificate::TemplateNames;
use crate::report::ReportFormat;
use crate::utils::ConfigError;
use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Directory name used under the system temp dir when no output dir is set
pub const DEFAULT_OUTPUT_SUBDIR: &str = "user-cert-report";

/// Report output settings
#[derive(Debug, Clone, Deserialize)]
pub struct ReportSettings {
    #[serde(default)]
    pub format: ReportFormat,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// chrono format for NotBefore/NotAfter columns
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// chrono format for the timestamp in report file names
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

fn default_delimiter() -> char {
    ','
}

fn default_date_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

fn default_timestamp_format() -> String {
    "%Y%m%d-%H%M%S".to_string()
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            format: ReportFormat::default(),
            delimiter: default_delimiter(),
            date_format: default_date_format(),
            timestamp_format: default_timestamp_format(),
            output_dir: None,
        }
    }
}

impl ReportSettings {
    /// Configured output directory, or `<temp>/user-cert-report`
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_OUTPUT_SUBDIR))
    }
}

/// Directory source settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectorySettings {
    /// LDIF export to read users from
    #[serde(default)]
    pub ldif: Option<PathBuf>,
}

/// Run settings
#[derive(Debug, Clone, Deserialize)]
pub struct RunSettings {
    #[serde(default = "default_parallel")]
    pub parallel: usize,
}

fn default_parallel() -> usize {
    4
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
        }
    }
}

/// Application settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub report: ReportSettings,
    #[serde(default)]
    pub directory: DirectorySettings,
    #[serde(default)]
    pub run: RunSettings,
    /// Template OID to display name
    #[serde(default)]
    pub templates: BTreeMap<String, String>,
}

impl Settings {
    /// Load settings from the default config file
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_path = Path::new("config/default.toml");
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load settings from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        Self::from_toml(&content)
    }

    /// Parse and validate settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check values serde cannot check on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_delimiter(self.report.delimiter)?;
        validate_time_format("report.date_format", &self.report.date_format)?;
        validate_time_format("report.timestamp_format", &self.report.timestamp_format)?;

        if self.run.parallel == 0 {
            return Err(ConfigError::InvalidValue {
                key: "run.parallel".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if let Some(oid) = self.templates.keys().find(|oid| !is_dotted_oid(oid)) {
            return Err(ConfigError::InvalidValue {
                key: format!("templates.{}", oid),
                message: "template keys must be dotted OIDs".to_string(),
            });
        }

        Ok(())
    }

    /// Template display names from the `[templates]` table
    pub fn template_names(&self) -> TemplateNames {
        self.templates
            .iter()
            .map(|(oid, name)| (oid.clone(), name.clone()))
            .collect()
    }
}

/// Delimiters must be a single printable ASCII character other than `"`
pub fn validate_delimiter(delimiter: char) -> Result<(), ConfigError> {
    if delimiter == '"' || !(delimiter.is_ascii_graphic() || delimiter == '\t' || delimiter == ' ')
    {
        return Err(ConfigError::InvalidValue {
            key: "report.delimiter".to_string(),
            message: format!("'{}' cannot be used as a delimiter", delimiter.escape_default()),
        });
    }
    Ok(())
}

/// chrono formats with unknown specifiers fail when rendered
pub fn validate_time_format(key: &str, format: &str) -> Result<(), ConfigError> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("'{}' is not a valid time format", format),
        });
    }
    Ok(())
}
