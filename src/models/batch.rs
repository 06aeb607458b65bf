//! Per-user batch types

use crate::models::CertificateRecord;
use crate::utils::DecodeError;

/// A certificate that was skipped because it could not be decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeFailure {
    /// Position of the certificate in the user's attribute values
    pub index: usize,
    pub error: DecodeError,
}

/// A certificate whose template extension rendering had an unexpected shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMismatch {
    pub index: usize,
    pub first_line: String,
}

/// Records produced for one user in one processing pass
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserCertificateBatch {
    pub user_id: String,
    /// One record per decodable certificate, in input order
    pub records: Vec<CertificateRecord>,
    pub decode_failures: Vec<DecodeFailure>,
    pub template_mismatches: Vec<TemplateMismatch>,
}

impl UserCertificateBatch {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    /// Number of certificate values found for the user, decodable or not
    pub fn certificates_found(&self) -> usize {
        self.records.len() + self.decode_failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
