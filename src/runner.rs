//! Export orchestration
//!
//! Looks each requested identifier up in the directory, processes the user's
//! certificates and writes the report. Users are independent: a failure for
//! one is recorded in its [`UserReport`] and the run moves on.

use crate::directory::DirectoryLookup;
use crate::processor::BatchProcessor;
use crate::report::ReportWriter;
use crate::utils::ToolkitError;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// What happened for one requested user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserOutcome {
    /// A report file was written
    Exported {
        account: String,
        path: PathBuf,
        records: usize,
        /// Indices of certificate values that could not be decoded, with the reason
        decode_failures: Vec<(usize, String)>,
        template_mismatches: usize,
    },
    /// The user exists but has no certificate values
    NoCertificates { account: String },
    /// No directory entry matched the identifier
    NotFound,
    /// Lookup or report writing failed
    Failed(String),
}

/// Outcome for one identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserReport {
    pub identifier: String,
    pub outcome: UserOutcome,
}

/// Per-user results of a run, in request order
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    pub users: Vec<UserReport>,
}

impl ExportSummary {
    pub fn total(&self) -> usize {
        self.users.len()
    }

    pub fn exported(&self) -> usize {
        self.count(|o| matches!(o, UserOutcome::Exported { .. }))
    }

    pub fn no_certificates(&self) -> usize {
        self.count(|o| matches!(o, UserOutcome::NoCertificates { .. }))
    }

    pub fn not_found(&self) -> usize {
        self.count(|o| matches!(o, UserOutcome::NotFound))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, UserOutcome::Failed(_)))
    }

    pub fn certificates_exported(&self) -> usize {
        self.users
            .iter()
            .map(|u| match &u.outcome {
                UserOutcome::Exported { records, .. } => *records,
                _ => 0,
            })
            .sum()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    fn count(&self, pred: impl Fn(&UserOutcome) -> bool) -> usize {
        self.users.iter().filter(|u| pred(&u.outcome)).count()
    }
}

/// Directory, processor and writer for one run
pub struct Exporter {
    directory: Arc<dyn DirectoryLookup>,
    processor: BatchProcessor,
    writer: ReportWriter,
}

impl Exporter {
    pub fn new(
        directory: Arc<dyn DirectoryLookup>,
        processor: BatchProcessor,
        writer: ReportWriter,
    ) -> Self {
        Self {
            directory,
            processor,
            writer,
        }
    }

    /// Look up, process and write one user
    pub fn export_user(&self, identifier: &str) -> UserReport {
        let outcome = match self.directory.find_user(identifier) {
            Err(e) => {
                warn!(identifier, error = %e, "directory lookup failed");
                UserOutcome::Failed(ToolkitError::from(e).to_string())
            }
            Ok(None) => {
                warn!(identifier, "no directory user matches");
                UserOutcome::NotFound
            }
            Ok(Some(user)) => {
                let account = user.report_name(identifier).to_string();
                let batch = self.processor.process(identifier, &user.certificates);

                if batch.certificates_found() == 0 {
                    warn!(identifier, account = account.as_str(), "user has no certificates");
                    UserOutcome::NoCertificates { account }
                } else {
                    match self.writer.write(&batch, &account) {
                        Ok(path) => {
                            info!(
                                identifier,
                                path = %path.display(),
                                records = batch.records.len(),
                                "exported certificates"
                            );
                            UserOutcome::Exported {
                                account,
                                path,
                                records: batch.records.len(),
                                decode_failures: batch
                                    .decode_failures
                                    .iter()
                                    .map(|f| (f.index, f.error.to_string()))
                                    .collect(),
                                template_mismatches: batch.template_mismatches.len(),
                            }
                        }
                        Err(e) => {
                            warn!(identifier, error = %e, "report write failed");
                            UserOutcome::Failed(ToolkitError::from(e).to_string())
                        }
                    }
                }
            }
        };

        UserReport {
            identifier: identifier.to_string(),
            outcome,
        }
    }

    /// Export every identifier, up to `parallel` at a time.
    ///
    /// Reports are yielded to `on_report` and returned in request order.
    pub async fn run<F>(
        self: Arc<Self>,
        identifiers: Vec<String>,
        parallel: usize,
        on_report: F,
    ) -> ExportSummary
    where
        F: FnMut(&UserReport),
    {
        let users = stream::iter(identifiers)
            .map(|identifier| {
                let exporter = Arc::clone(&self);
                async move {
                    let requested = identifier.clone();
                    match tokio::task::spawn_blocking(move || exporter.export_user(&identifier))
                        .await
                    {
                        Ok(report) => report,
                        Err(e) => UserReport {
                            identifier: requested,
                            outcome: UserOutcome::Failed(format!("export task failed: {}", e)),
                        },
                    }
                }
            })
            .buffered(parallel.max(1))
            .inspect(on_report)
            .collect()
            .await;

        ExportSummary { users }
    }
}

/// Read identifiers from a file: one per line, blank lines and `#` comments skipped
pub fn read_identifiers_file(path: &Path) -> std::io::Result<Vec<String>> {
    let file = std::fs::File::open(path)?;
    let mut identifiers = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() && !trimmed.starts_with('#') {
            identifiers.push(trimmed.to_string());
        }
    }
    Ok(identifiers)
}

/// Drop repeated identifiers (case-insensitive), keeping first occurrences
pub fn dedup_identifiers(identifiers: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    identifiers
        .into_iter()
        .filter(|id| seen.insert(id.to_lowercase()))
        .collect()
}
