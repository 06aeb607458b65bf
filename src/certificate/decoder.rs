//! Certificate decoding
//!
//! Turns raw directory attribute bytes into a [`ParsedCertificate`] using
//! x509-parser.

use crate::certificate::names::TemplateNames;
use crate::certificate::render::render_extension;
use crate::models::{Extension, ParsedCertificate};
use crate::utils::DecodeError;
use chrono::{DateTime, TimeZone, Utc};
use x509_parser::prelude::*;

/// Certificate decoder
///
/// Holds the template display names used when rendering the certificate
/// template extension. Decoding itself is stateless.
#[derive(Debug, Clone, Default)]
pub struct CertificateDecoder {
    names: TemplateNames,
}

impl CertificateDecoder {
    /// Create a decoder that renders template names from `names`
    pub fn new(names: TemplateNames) -> Self {
        Self { names }
    }

    /// Decode a DER certificate, or a single PEM `CERTIFICATE` block
    pub fn decode(&self, bytes: &[u8]) -> Result<ParsedCertificate, DecodeError> {
        if looks_like_pem(bytes) {
            let block = ::pem::parse(bytes).map_err(|e| DecodeError::Pem {
                message: e.to_string(),
            })?;
            if block.tag() != "CERTIFICATE" {
                return Err(DecodeError::Pem {
                    message: format!("expected a CERTIFICATE block, found {}", block.tag()),
                });
            }
            return self.decode_der(block.contents());
        }

        self.decode_der(bytes)
    }

    fn decode_der(&self, der: &[u8]) -> Result<ParsedCertificate, DecodeError> {
        let (rest, cert) = X509Certificate::from_der(der).map_err(|e| DecodeError::Malformed {
            message: e.to_string(),
        })?;
        if !rest.is_empty() {
            return Err(DecodeError::Malformed {
                message: format!("{} trailing bytes after certificate", rest.len()),
            });
        }

        let not_before = asn1_time_to_datetime(cert.validity().not_before, "notBefore")?;
        let not_after = asn1_time_to_datetime(cert.validity().not_after, "notAfter")?;

        let extensions = cert
            .extensions()
            .iter()
            .map(|ext| Extension {
                identifier: ext.oid.to_id_string(),
                critical: ext.critical,
                rendered_text: render_extension(ext, &self.names),
            })
            .collect();

        Ok(ParsedCertificate {
            subject: cert.subject().to_string(),
            issuer: cert.issuer().to_string(),
            not_before,
            not_after,
            extensions,
        })
    }
}

/// Decode with no template display names configured
pub fn decode(bytes: &[u8]) -> Result<ParsedCertificate, DecodeError> {
    CertificateDecoder::default().decode(bytes)
}

fn looks_like_pem(bytes: &[u8]) -> bool {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    bytes[start..].starts_with(b"-----BEGIN ")
}

/// Convert ASN.1 time to chrono DateTime
fn asn1_time_to_datetime(time: ASN1Time, field: &'static str) -> Result<DateTime<Utc>, DecodeError> {
    Utc.timestamp_opt(time.timestamp(), 0)
        .single()
        .ok_or(DecodeError::InvalidTime { field })
}
