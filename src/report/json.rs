//! JSON report

use crate::models::{CertificateRecord, UserCertificateBatch};
use crate::utils::ReportError;
use chrono::{DateTime, Local};
use serde::Serialize;

/// JSON-serializable report structure
#[derive(Serialize)]
pub struct JsonReport<'a> {
    pub user: &'a str,
    pub account: &'a str,
    pub generated_at: DateTime<Local>,
    pub certificate_count: usize,
    pub certificates: &'a [CertificateRecord],
}

/// Render a batch as pretty-printed JSON
pub fn to_json_string(
    batch: &UserCertificateBatch,
    account: &str,
    generated_at: DateTime<Local>,
) -> Result<String, ReportError> {
    let report = JsonReport {
        user: &batch.user_id,
        account,
        generated_at,
        certificate_count: batch.records.len(),
        certificates: &batch.records,
    };

    serde_json::to_string_pretty(&report).map_err(|e| ReportError::Serialize {
        message: e.to_string(),
    })
}
