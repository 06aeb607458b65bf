//! Data models for user-cert-report
//!
//! This module contains the certificate and batch structures passed between
//! the decoder, the batch processor and the report writers.

pub mod batch;
pub mod certificate;

pub use batch::{DecodeFailure, TemplateMismatch, UserCertificateBatch};
pub use certificate::{
    normalize, CertificateRecord, Extension, ParsedCertificate, RawCertificate, TemplateMetadata,
    TemplateStatus,
};
