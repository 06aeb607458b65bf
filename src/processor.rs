//! Per-user batch processing
//!
//! Decodes each of a user's certificate values in order, reads template
//! metadata and collects report records. A certificate that fails to decode
//! is skipped and remembered; the rest of the batch is still processed.

use crate::certificate::{extract_template, CertificateDecoder};
use crate::models::{
    CertificateRecord, DecodeFailure, RawCertificate, TemplateMismatch, TemplateStatus,
    UserCertificateBatch,
};
use tracing::{debug, warn};

/// Drives decoding and template extraction for one user at a time
#[derive(Debug, Clone, Default)]
pub struct BatchProcessor {
    decoder: CertificateDecoder,
}

impl BatchProcessor {
    pub fn new(decoder: CertificateDecoder) -> Self {
        Self { decoder }
    }

    /// Build the batch for `user_id` from its raw certificate values
    pub fn process(&self, user_id: &str, raw_certs: &[RawCertificate]) -> UserCertificateBatch {
        let mut batch = UserCertificateBatch::new(user_id);

        if raw_certs.is_empty() {
            debug!(user = user_id, "no certificates to process");
            return batch;
        }

        for (index, raw) in raw_certs.iter().enumerate() {
            let parsed = match self.decoder.decode(raw) {
                Ok(parsed) => parsed,
                Err(error) => {
                    warn!(user = user_id, index, %error, "skipping undecodable certificate");
                    batch.decode_failures.push(DecodeFailure { index, error });
                    continue;
                }
            };

            let template = extract_template(&parsed.extensions);
            match &template.status {
                TemplateStatus::Present => {}
                TemplateStatus::Absent => {
                    debug!(user = user_id, index, "certificate has no template extension");
                }
                TemplateStatus::Unrecognized { first_line } => {
                    warn!(
                        user = user_id,
                        index,
                        first_line = first_line.as_str(),
                        "unexpected template extension rendering"
                    );
                    batch.template_mismatches.push(TemplateMismatch {
                        index,
                        first_line: first_line.clone(),
                    });
                }
            }

            batch
                .records
                .push(CertificateRecord::normalize(&parsed, &template));
        }

        debug!(
            user = user_id,
            records = batch.records.len(),
            failures = batch.decode_failures.len(),
            "processed certificates"
        );

        batch
    }
}

/// Process with a default decoder
pub fn process(user_id: &str, raw_certs: &[RawCertificate]) -> UserCertificateBatch {
    BatchProcessor::default().process(user_id, raw_certs)
}
