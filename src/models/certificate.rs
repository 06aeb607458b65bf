//! Certificate information types

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Certificate bytes exactly as stored in a directory attribute value
pub type RawCertificate = Vec<u8>;

/// A single certificate extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extension {
    /// Dotted-numeric extension OID
    pub identifier: String,
    /// Whether the extension is marked critical
    pub critical: bool,
    /// Multi-line descriptive rendering of the extension value
    pub rendered_text: String,
}

/// Decoded certificate fields needed for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedCertificate {
    /// Subject distinguished name
    pub subject: String,
    /// Issuer distinguished name
    pub issuer: String,
    /// Not valid before
    pub not_before: DateTime<Utc>,
    /// Not valid after
    pub not_after: DateTime<Utc>,
    /// Extensions in encoding order
    pub extensions: Vec<Extension>,
}

impl ParsedCertificate {
    /// First extension carrying the given OID
    pub fn extension(&self, identifier: &str) -> Option<&Extension> {
        self.extensions.iter().find(|ext| ext.identifier == identifier)
    }
}

/// How the template metadata of a certificate was obtained
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum TemplateStatus {
    /// The template extension was found and its rendering understood
    Present,
    /// The certificate carries no template extension
    #[default]
    Absent,
    /// The template extension was found but its first line had an unexpected shape
    Unrecognized { first_line: String },
}

impl fmt::Display for TemplateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateStatus::Present => write!(f, "Present"),
            TemplateStatus::Absent => write!(f, "Absent"),
            TemplateStatus::Unrecognized { first_line } => {
                write!(f, "Unrecognized ({})", first_line)
            }
        }
    }
}

/// Enterprise certificate template name and OID
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TemplateMetadata {
    pub name: String,
    pub oid: String,
    pub status: TemplateStatus,
}

impl TemplateMetadata {
    /// Metadata for a certificate without a template extension
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn is_present(&self) -> bool {
        self.status == TemplateStatus::Present
    }
}

/// One row of a user's certificate report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateRecord {
    pub subject: String,
    pub issuer: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    pub template_name: String,
    pub template_oid: String,
}

impl CertificateRecord {
    /// Flatten a decoded certificate and its template metadata into a record
    pub fn normalize(parsed: &ParsedCertificate, template: &TemplateMetadata) -> Self {
        Self {
            subject: parsed.subject.clone(),
            issuer: parsed.issuer.clone(),
            not_before: parsed.not_before,
            not_after: parsed.not_after,
            template_name: template.name.clone(),
            template_oid: template.oid.clone(),
        }
    }
}

/// Free-function form of [`CertificateRecord::normalize`]
pub fn normalize(parsed: &ParsedCertificate, template: &TemplateMetadata) -> CertificateRecord {
    CertificateRecord::normalize(parsed, template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn parsed() -> ParsedCertificate {
        ParsedCertificate {
            subject: "CN=Jane Doe, OU=Users, DC=corp, DC=example".to_string(),
            issuer: "CN=Corp Issuing CA, DC=corp, DC=example".to_string(),
            not_before: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            not_after: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            extensions: vec![Extension {
                identifier: "2.5.29.15".to_string(),
                critical: true,
                rendered_text: "Digital Signature".to_string(),
            }],
        }
    }

    #[test]
    fn test_normalize_copies_fields() {
        let template = TemplateMetadata {
            name: "Acme-SmartCard".to_string(),
            oid: "1.3.6.1.4.1.311.21.8.123456.789".to_string(),
            status: TemplateStatus::Present,
        };
        let record = normalize(&parsed(), &template);

        assert_eq!(record.subject, "CN=Jane Doe, OU=Users, DC=corp, DC=example");
        assert_eq!(record.issuer, "CN=Corp Issuing CA, DC=corp, DC=example");
        assert_eq!(record.not_before, parsed().not_before);
        assert_eq!(record.not_after, parsed().not_after);
        assert_eq!(record.template_name, "Acme-SmartCard");
        assert_eq!(record.template_oid, "1.3.6.1.4.1.311.21.8.123456.789");
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let template = TemplateMetadata::absent();
        let cert = parsed();
        assert_eq!(normalize(&cert, &template), normalize(&cert, &template));
    }

    #[test]
    fn test_extension_lookup() {
        let cert = parsed();
        assert!(cert.extension("2.5.29.15").is_some());
        assert!(cert.extension("2.5.29.17").is_none());
    }
}
