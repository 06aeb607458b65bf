//! Shared fixtures: certificates issued at test time with rcgen
#![allow(dead_code)]

use base64::Engine;
use rcgen::{
    BasicConstraints, Certificate, CertificateParams, CustomExtension, DistinguishedName, DnType,
    IsCa, KeyPair,
};

pub const TEMPLATE_EXTENSION_ARCS: &[u64] = &[1, 3, 6, 1, 4, 1, 311, 21, 7];
pub const SMARTCARD_OID: &str = "1.3.6.1.4.1.311.21.8.123456.789";
pub const ISSUER_DN: &str = "CN=Corp Issuing CA";

pub struct Issuer {
    pub cert: Certificate,
    pub key: KeyPair,
}

pub fn issuer() -> Issuer {
    let mut params = CertificateParams::new(Vec::<String>::new()).unwrap();
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, "Corp Issuing CA");
    params.distinguished_name = dn;
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    let key = KeyPair::generate().unwrap();
    let cert = params.self_signed(&key).unwrap();
    Issuer { cert, key }
}

/// DER encoding of a dotted OID (tag, length, body)
pub fn encode_oid(dotted: &str) -> Vec<u8> {
    let arcs: Vec<u64> = dotted.split('.').map(|a| a.parse().unwrap()).collect();
    let mut body = vec![(arcs[0] * 40 + arcs[1]) as u8];
    for &arc in &arcs[2..] {
        let mut chunk = vec![(arc & 0x7f) as u8];
        let mut rest = arc >> 7;
        while rest > 0 {
            chunk.push(((rest & 0x7f) as u8) | 0x80);
            rest >>= 7;
        }
        chunk.reverse();
        body.extend(chunk);
    }
    let mut out = vec![0x06, body.len() as u8];
    out.extend(body);
    out
}

/// Value of the certificate template extension for `oid`
pub fn template_value(oid: &str, major: u8, minor: u8) -> Vec<u8> {
    let mut body = encode_oid(oid);
    body.extend([0x02, 0x01, major, 0x02, 0x01, minor]);
    let mut out = vec![0x30, body.len() as u8];
    out.extend(body);
    out
}

/// Issue a user certificate, valid 2024-01-15 to 2026-01-15, optionally
/// carrying a certificate template extension with the given raw value
pub fn user_certificate(issuer: &Issuer, common_name: &str, template: Option<Vec<u8>>) -> Vec<u8> {
    let mut params = CertificateParams::new(Vec::<String>::new()).unwrap();
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, common_name);
    params.distinguished_name = dn;
    params.not_before = rcgen::date_time_ymd(2024, 1, 15);
    params.not_after = rcgen::date_time_ymd(2026, 1, 15);
    if let Some(value) = template {
        params
            .custom_extensions
            .push(CustomExtension::from_oid_content(TEMPLATE_EXTENSION_ARCS, value));
    }
    let key = KeyPair::generate().unwrap();
    params
        .signed_by(&key, &issuer.cert, &issuer.key)
        .unwrap()
        .der()
        .to_vec()
}

/// Smartcard certificate with the template extension
pub fn smartcard_certificate(issuer: &Issuer, common_name: &str) -> Vec<u8> {
    user_certificate(
        issuer,
        common_name,
        Some(template_value(SMARTCARD_OID, 100, 4)),
    )
}

pub fn to_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// LDIF user entry with base64 `userCertificate;binary` values
pub fn ldif_user(cn: &str, account: &str, upn: &str, certificates: &[Vec<u8>]) -> String {
    let mut entry = format!(
        "dn: CN={cn},OU=Users,DC=corp,DC=example\n\
         objectClass: user\n\
         cn: {cn}\n\
         sAMAccountName: {account}\n\
         userPrincipalName: {upn}\n"
    );
    for cert in certificates {
        entry.push_str(&format!("userCertificate;binary:: {}\n", to_base64(cert)));
    }
    entry.push('\n');
    entry
}

/// LDIF certificate template object
pub fn ldif_template(cn: &str, display_name: &str, oid: &str) -> String {
    format!(
        "dn: CN={cn},CN=Certificate Templates,CN=Public Key Services,CN=Services,\n \
         CN=Configuration,DC=corp,DC=example\n\
         objectClass: pKICertificateTemplate\n\
         cn: {cn}\n\
         displayName: {display_name}\n\
         msPKI-Cert-Template-OID: {oid}\n\n"
    )
}
