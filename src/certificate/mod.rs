//! Certificate handling module
//!
//! This module provides functionality for:
//! - Decoding raw certificate bytes into subject, issuer, validity and extensions
//! - Rendering extension values as inspector-style text
//! - Reading enterprise certificate template metadata

pub mod decoder;
pub mod names;
pub mod render;
pub mod template;

/// Certificate template information (v2 templates)
pub const OID_CERTIFICATE_TEMPLATE: &str = "1.3.6.1.4.1.311.21.7";
/// Certificate template name (v1 templates, BMPString)
pub const OID_CERTIFICATE_TEMPLATE_NAME: &str = "1.3.6.1.4.1.311.20.2";
/// User principal name other-name in subject alternative names
pub const OID_USER_PRINCIPAL_NAME: &str = "1.3.6.1.4.1.311.20.2.3";

pub use decoder::{decode, CertificateDecoder};
pub use names::TemplateNames;
pub use template::{extract_template, parse_template_line};
