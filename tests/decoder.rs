mod common;

use chrono::{TimeZone, Utc};
use common::*;
use user_cert_report::certificate::{CertificateDecoder, OID_CERTIFICATE_TEMPLATE};
use user_cert_report::utils::DecodeError;
use user_cert_report::{decode, TemplateNames};

#[test]
fn test_decode_matches_issued_fields() {
    let ca = issuer();
    let der = smartcard_certificate(&ca, "Jane Doe");

    let parsed = decode(&der).unwrap();
    assert_eq!(parsed.subject, "CN=Jane Doe");
    assert_eq!(parsed.issuer, ISSUER_DN);
    assert_eq!(
        parsed.not_before,
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
    );
    assert_eq!(
        parsed.not_after,
        Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap()
    );
}

#[test]
fn test_template_extension_rendering() {
    let ca = issuer();
    let der = smartcard_certificate(&ca, "Jane Doe");

    let parsed = decode(&der).unwrap();
    let ext = parsed.extension(OID_CERTIFICATE_TEMPLATE).unwrap();
    assert_eq!(
        ext.rendered_text,
        format!(
            "Template={}\r\nMajor Version Number=100\r\nMinor Version Number=4\r\n",
            SMARTCARD_OID
        )
    );
}

#[test]
fn test_template_extension_rendering_with_name() {
    let ca = issuer();
    let der = smartcard_certificate(&ca, "Jane Doe");

    let mut names = TemplateNames::new();
    names.insert(SMARTCARD_OID, "Acme-SmartCard");
    let parsed = CertificateDecoder::new(names).decode(&der).unwrap();

    let ext = parsed.extension(OID_CERTIFICATE_TEMPLATE).unwrap();
    assert!(ext
        .rendered_text
        .starts_with("Template=Acme-SmartCard(1.3.6.1.4.1.311.21.8.123456.789)\r\n"));
}

#[test]
fn test_decode_pem() {
    let ca = issuer();
    let der = smartcard_certificate(&ca, "Jane Doe");
    let pem_text = pem::encode(&pem::Pem::new("CERTIFICATE", der));

    let parsed = decode(pem_text.as_bytes()).unwrap();
    assert_eq!(parsed.subject, "CN=Jane Doe");
}

#[test]
fn test_decode_pem_wrong_block() {
    let pem_text = pem::encode(&pem::Pem::new("PRIVATE KEY", vec![1, 2, 3]));
    assert!(matches!(
        decode(pem_text.as_bytes()),
        Err(DecodeError::Pem { .. })
    ));
}

#[test]
fn test_decode_garbage() {
    assert!(matches!(
        decode(b"definitely not a certificate"),
        Err(DecodeError::Malformed { .. })
    ));
    assert!(decode(&[]).is_err());
}

#[test]
fn test_decode_truncated() {
    let ca = issuer();
    let der = smartcard_certificate(&ca, "Jane Doe");
    assert!(decode(&der[..der.len() / 2]).is_err());
}

#[test]
fn test_decode_rejects_trailing_bytes() {
    let ca = issuer();
    let mut der = user_certificate(&ca, "Jane Doe", None);
    der.extend_from_slice(b"trailing junk");

    match decode(&der) {
        Err(DecodeError::Malformed { message }) => {
            assert_eq!(message, "13 trailing bytes after certificate")
        }
        other => panic!("expected a malformed certificate, got {:?}", other),
    }
}
