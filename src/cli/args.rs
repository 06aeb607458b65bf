//! CLI argument definitions using clap

use crate::certificate::TemplateNames;
use crate::config::settings::validate_delimiter;
use crate::config::Settings;
use crate::report::ReportFormat;
use crate::runner::{dedup_identifiers, read_identifiers_file};
use crate::utils::ConfigError;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "user-cert-report")]
#[command(version)]
#[command(
    about = "Export the certificates issued to directory users, with their template metadata",
    long_about = None
)]
pub struct Cli {
    /// Users to export: common name, account name or user principal name
    #[arg(value_name = "IDENTITY", required_unless_present = "file")]
    pub identities: Vec<String>,

    /// File with one identity per line (# starts a comment)
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// LDIF directory export to read users and templates from
    #[arg(long, value_name = "FILE")]
    pub ldif: Option<PathBuf>,

    /// Directory for report files
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Field delimiter for CSV reports
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<char>,

    /// Path to a settings file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of users processed concurrently
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub parallel: Option<u16>,

    /// Display name for a template OID, as OID=NAME (repeatable)
    #[arg(long = "template-name", value_name = "OID=NAME")]
    pub template_names: Vec<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

fn parse_delimiter(value: &str) -> Result<char, String> {
    let value = match value {
        "\\t" | "tab" => "\t",
        other => other,
    };
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => validate_delimiter(c).map(|_| c).map_err(|e| e.to_string()),
        _ => Err("delimiter must be a single character".to_string()),
    }
}

impl Cli {
    /// Override settings with any flags given on the command line
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(format) = self.format {
            settings.report.format = format;
        }
        if let Some(delimiter) = self.delimiter {
            settings.report.delimiter = delimiter;
        }
        if let Some(dir) = &self.output_dir {
            settings.report.output_dir = Some(dir.clone());
        }
        if let Some(ldif) = &self.ldif {
            settings.directory.ldif = Some(ldif.clone());
        }
        if let Some(parallel) = self.parallel {
            settings.run.parallel = usize::from(parallel);
        }
    }

    /// Template names given with `--template-name`
    pub fn template_names(&self) -> Result<TemplateNames, ConfigError> {
        self.template_names
            .iter()
            .map(|arg| TemplateNames::parse_assignment(arg))
            .collect()
    }

    /// Positional identities followed by those from `--file`, deduplicated
    pub fn identifiers(&self) -> Result<Vec<String>, ConfigError> {
        let mut identifiers: Vec<String> = self
            .identities
            .iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();

        if let Some(path) = &self.file {
            let from_file = read_identifiers_file(path).map_err(|e| ConfigError::InvalidValue {
                key: "file".to_string(),
                message: format!("{}: {}", path.display(), e),
            })?;
            identifiers.extend(from_file);
        }

        Ok(dedup_identifiers(identifiers))
    }
}
