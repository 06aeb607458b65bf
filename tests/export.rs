mod common;

use common::*;
use std::sync::Arc;
use tempfile::tempdir;
use user_cert_report::certificate::CertificateDecoder;
use user_cert_report::config::ReportSettings;
use user_cert_report::directory::{DirectoryLookup, DirectoryUser, InMemoryDirectory, LdifDirectory};
use user_cert_report::report::{resolve_output_dir, ReportFormat, ReportWriter};
use user_cert_report::runner::{Exporter, UserOutcome};
use user_cert_report::BatchProcessor;

fn sample_ldif(ca: &Issuer) -> String {
    let mut ldif = String::from("version: 1\n\n");
    ldif.push_str(&ldif_template("AcmeSmartCard", "Acme-SmartCard", SMARTCARD_OID));
    ldif.push_str(&ldif_user(
        "Jane Doe",
        "jdoe",
        "jdoe@corp.example",
        &[
            smartcard_certificate(ca, "Jane Doe"),
            b"not a certificate".to_vec(),
            user_certificate(ca, "Jane Doe", None),
        ],
    ));
    ldif.push_str(&ldif_user("John Roe", "jroe", "jroe@corp.example", &[]));
    ldif
}

fn exporter(directory: Arc<dyn DirectoryLookup>, dir: &std::path::Path, format: ReportFormat) -> Arc<Exporter> {
    let settings = ReportSettings {
        format,
        ..ReportSettings::default()
    };
    Arc::new(Exporter::new(
        Arc::clone(&directory),
        BatchProcessor::new(CertificateDecoder::new(directory.template_names())),
        ReportWriter::new(dir.to_path_buf(), settings),
    ))
}

#[test]
fn test_ldif_users_and_templates() {
    let ca = issuer();
    let directory = LdifDirectory::parse(&sample_ldif(&ca)).unwrap();

    assert_eq!(directory.users().len(), 2);
    assert_eq!(
        directory.template_names().get(SMARTCARD_OID),
        Some("Acme-SmartCard")
    );

    let user = directory.find_user("JDOE@corp.example").unwrap().unwrap();
    assert_eq!(user.account_name.as_deref(), Some("jdoe"));
    assert_eq!(user.certificates.len(), 3);
}

#[tokio::test]
async fn test_export_csv_end_to_end() {
    let ca = issuer();
    let dir = tempdir().unwrap();
    let directory: Arc<dyn DirectoryLookup> =
        Arc::new(LdifDirectory::parse(&sample_ldif(&ca)).unwrap());

    let exporter = exporter(directory, dir.path(), ReportFormat::Csv);
    let mut seen = Vec::new();
    let summary = exporter
        .run(
            vec![
                "Jane Doe".to_string(),
                "nobody".to_string(),
                "jroe".to_string(),
            ],
            4,
            |report| seen.push(report.identifier.clone()),
        )
        .await;

    assert_eq!(seen, vec!["Jane Doe", "nobody", "jroe"]);
    assert_eq!(summary.exported(), 1);
    assert_eq!(summary.not_found(), 1);
    assert_eq!(summary.no_certificates(), 1);
    assert!(!summary.has_failures());

    let UserOutcome::Exported {
        account,
        path,
        records,
        decode_failures,
        ..
    } = &summary.users[0].outcome
    else {
        panic!("expected an export for Jane Doe");
    };
    assert_eq!(account, "jdoe");
    assert_eq!(*records, 2);
    assert_eq!(decode_failures.len(), 1);
    assert_eq!(decode_failures[0].0, 1);

    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("jdoe_Certificates_"));
    assert!(name.ends_with(".csv"));

    let content = std::fs::read_to_string(path).unwrap();
    let rows: Vec<&str> = content.split("\r\n").collect();
    assert_eq!(
        rows[0],
        "\"Subject\",\"Issuer\",\"NotBefore\",\"NotAfter\",\"TemplateName\",\"TemplateOID\""
    );
    assert_eq!(
        rows[1],
        format!(
            "\"CN=Jane Doe\",\"{}\",\"2024-01-15 00:00:00\",\"2026-01-15 00:00:00\",\"Acme-SmartCard\",\"{}\"",
            ISSUER_DN, SMARTCARD_OID
        )
    );
    assert!(rows[2].ends_with(",\"\",\"\""));
    assert_eq!(rows.len(), 4);

    // Only Jane Doe produced a file
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_export_json() {
    let ca = issuer();
    let dir = tempdir().unwrap();
    let directory: Arc<dyn DirectoryLookup> =
        Arc::new(LdifDirectory::parse(&sample_ldif(&ca)).unwrap());

    let summary = exporter(directory, dir.path(), ReportFormat::Json)
        .run(vec!["jdoe".to_string()], 1, |_| {})
        .await;

    let UserOutcome::Exported { path, .. } = &summary.users[0].outcome else {
        panic!("expected an export");
    };
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(value["user"], "jdoe");
    assert_eq!(value["account"], "jdoe");
    assert_eq!(value["certificate_count"], 2);
    assert_eq!(value["certificates"][0]["template_name"], "Acme-SmartCard");
    assert_eq!(value["certificates"][0]["template_oid"], SMARTCARD_OID);
}

#[tokio::test]
async fn test_ambiguous_user_fails_without_stopping_run() {
    let ca = issuer();
    let dir = tempdir().unwrap();
    let cert = smartcard_certificate(&ca, "Alex Smith");
    let directory: Arc<dyn DirectoryLookup> = Arc::new(InMemoryDirectory::new(vec![
        DirectoryUser {
            distinguished_name: "CN=Alex Smith,OU=Sales".to_string(),
            common_name: Some("Alex Smith".to_string()),
            account_name: Some("asmith".to_string()),
            principal_name: None,
            certificates: vec![cert.clone()],
        },
        DirectoryUser {
            distinguished_name: "CN=Alex Smith,OU=Support".to_string(),
            common_name: Some("Alex Smith".to_string()),
            account_name: Some("asmith2".to_string()),
            principal_name: None,
            certificates: vec![cert],
        },
    ]));

    let summary = exporter(directory, dir.path(), ReportFormat::Csv)
        .run(
            vec!["Alex Smith".to_string(), "asmith2".to_string()],
            2,
            |_| {},
        )
        .await;

    assert!(matches!(summary.users[0].outcome, UserOutcome::Failed(_)));
    assert!(matches!(summary.users[1].outcome, UserOutcome::Exported { .. }));
    assert!(summary.has_failures());
}

#[test]
fn test_all_undecodable_still_writes_report() {
    let dir = tempdir().unwrap();
    let directory: Arc<dyn DirectoryLookup> = Arc::new(InMemoryDirectory::new(vec![
        DirectoryUser {
            distinguished_name: "CN=Broken".to_string(),
            common_name: Some("Broken".to_string()),
            account_name: None,
            principal_name: None,
            certificates: vec![vec![0x30, 0x03, 0x02, 0x01, 0x00]],
        },
    ]));

    let report = exporter(directory, dir.path(), ReportFormat::Csv).export_user("broken");

    let UserOutcome::Exported {
        account,
        path,
        records,
        decode_failures,
        ..
    } = report.outcome
    else {
        panic!("expected an export");
    };
    assert_eq!(account, "Broken");
    assert_eq!(records, 0);
    assert_eq!(decode_failures.len(), 1);
    let content = std::fs::read_to_string(path).unwrap();
    assert_eq!(content.matches("\r\n").count(), 1);
}

#[test]
fn test_output_dir_resolution() {
    let dir = tempdir().unwrap();

    let nested = dir.path().join("reports").join("2024");
    let resolved = resolve_output_dir(&nested).unwrap();
    assert!(nested.is_dir());
    assert_eq!(resolved.path, nested);
    assert!(resolved.fallback_from.is_none());

    let file = dir.path().join("existing.txt");
    std::fs::write(&file, "x").unwrap();
    let resolved = resolve_output_dir(&file).unwrap();
    assert_eq!(resolved.path, dir.path());
    assert_eq!(resolved.fallback_from, Some(file));
}
