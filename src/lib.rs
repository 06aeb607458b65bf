//! user-cert-report library
//!
//! Reads directory users, decodes the X.509 certificates stored on them,
//! extracts the certificate template (OID 1.3.6.1.4.1.311.21.7) and writes
//! one report per user.
//!
//! # Usage
//!
//! ```rust,ignore
//! use user_cert_report::processor::process;
//!
//! let batch = process("jdoe", &raw_certificates);
//! for record in &batch.records {
//!     println!("{} {}", record.subject, record.template_name);
//! }
//! ```

pub mod certificate;
pub mod cli;
pub mod config;
pub mod directory;
pub mod models;
pub mod output;
pub mod processor;
pub mod report;
pub mod runner;
pub mod utils;

pub use certificate::{decode, extract_template, CertificateDecoder, TemplateNames};
pub use models::{CertificateRecord, ParsedCertificate, TemplateMetadata, UserCertificateBatch};
pub use processor::{process, BatchProcessor};
pub use utils::{Result, ToolkitError};
