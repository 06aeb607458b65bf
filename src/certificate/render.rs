//! Human-readable extension rendering
//!
//! Produces the multi-line text a certificate inspector shows for each
//! extension. Lines are CRLF-terminated, as on the platform whose inspector
//! output the template grammar was written against.

use crate::certificate::names::TemplateNames;
use crate::certificate::{
    OID_CERTIFICATE_TEMPLATE, OID_CERTIFICATE_TEMPLATE_NAME, OID_USER_PRINCIPAL_NAME,
};
use x509_parser::der_parser::asn1_rs::{Any, BmpString, Class, Tag};
use x509_parser::der_parser::parse_der;
use x509_parser::prelude::*;

/// Line terminator used in rendered text
pub const CRLF: &str = "\r\n";

const INDENT: &str = "     ";

/// Render one extension value as descriptive text
pub fn render_extension(ext: &X509Extension<'_>, names: &TemplateNames) -> String {
    let oid = ext.oid.to_id_string();
    let rendered = match oid.as_str() {
        OID_CERTIFICATE_TEMPLATE => render_certificate_template(ext.value, names),
        OID_CERTIFICATE_TEMPLATE_NAME => decode_der_string(ext.value).map(|name| join(vec![name])),
        _ => render_parsed(ext.parsed_extension()),
    };
    rendered.unwrap_or_else(|| hex_dump(ext.value))
}

/// Render the v2 certificate template extension:
/// `SEQUENCE { templateID OID, majorVersion INTEGER, minorVersion INTEGER OPTIONAL }`
pub fn render_certificate_template(value: &[u8], names: &TemplateNames) -> Option<String> {
    let (_, obj) = parse_der(value).ok()?;
    let fields = obj.as_sequence().ok()?;
    let oid = fields.first()?.as_oid().ok()?.to_id_string();

    let mut lines = vec![match names.get(&oid) {
        Some(name) => format!("Template={}({})", name, oid),
        None => format!("Template={}", oid),
    }];
    if let Some(major) = fields.get(1).and_then(|f| f.as_u32().ok()) {
        lines.push(format!("Major Version Number={}", major));
    }
    if let Some(minor) = fields.get(2).and_then(|f| f.as_u32().ok()) {
        lines.push(format!("Minor Version Number={}", minor));
    }

    Some(join(lines))
}

fn render_parsed(parsed: &ParsedExtension<'_>) -> Option<String> {
    let lines = match parsed {
        ParsedExtension::KeyUsage(ku) => {
            let mut usages = Vec::new();
            if ku.digital_signature() {
                usages.push("Digital Signature");
            }
            if ku.non_repudiation() {
                usages.push("Non-Repudiation");
            }
            if ku.key_encipherment() {
                usages.push("Key Encipherment");
            }
            if ku.data_encipherment() {
                usages.push("Data Encipherment");
            }
            if ku.key_agreement() {
                usages.push("Key Agreement");
            }
            if ku.key_cert_sign() {
                usages.push("Certificate Signing");
            }
            if ku.crl_sign() {
                usages.push("CRL Signing");
            }
            if ku.encipher_only() {
                usages.push("Encipher Only");
            }
            if ku.decipher_only() {
                usages.push("Decipher Only");
            }
            vec![usages.join(", ")]
        }
        ParsedExtension::ExtendedKeyUsage(eku) => {
            let mut oids: Vec<String> = Vec::new();
            if eku.any {
                oids.push("2.5.29.37.0".to_string());
            }
            let flagged = [
                (eku.server_auth, "1.3.6.1.5.5.7.3.1"),
                (eku.client_auth, "1.3.6.1.5.5.7.3.2"),
                (eku.code_signing, "1.3.6.1.5.5.7.3.3"),
                (eku.email_protection, "1.3.6.1.5.5.7.3.4"),
                (eku.time_stamping, "1.3.6.1.5.5.7.3.8"),
                (eku.ocsp_signing, "1.3.6.1.5.5.7.3.9"),
            ];
            oids.extend(
                flagged
                    .iter()
                    .filter(|(set, _)| *set)
                    .map(|(_, oid)| oid.to_string()),
            );
            oids.extend(eku.other.iter().map(|oid| oid.to_id_string()));
            oids.iter().map(|oid| describe_oid(oid)).collect()
        }
        ParsedExtension::BasicConstraints(bc) => {
            let subject_type = if bc.ca { "CA" } else { "End Entity" };
            let path_len = bc
                .path_len_constraint
                .map(|n| n.to_string())
                .unwrap_or_else(|| "None".to_string());
            vec![
                format!("Subject Type={}", subject_type),
                format!("Path Length Constraint={}", path_len),
            ]
        }
        ParsedExtension::SubjectKeyIdentifier(ki) => vec![hex_compact(ki.0)],
        ParsedExtension::AuthorityKeyIdentifier(aki) => match &aki.key_identifier {
            Some(ki) => vec![format!("KeyID={}", hex_compact(ki.0))],
            None => return None,
        },
        ParsedExtension::SubjectAlternativeName(san) => {
            san.general_names.iter().map(describe_general_name).collect()
        }
        ParsedExtension::CRLDistributionPoints(cdp) => {
            let mut lines = Vec::new();
            for (i, point) in cdp.points.iter().enumerate() {
                lines.push(format!("[{}]CRL Distribution Point", i + 1));
                if let Some(DistributionPointName::FullName(names)) = &point.distribution_point {
                    for name in names {
                        lines.push(format!("{}{}", INDENT, describe_general_name(name)));
                    }
                }
            }
            lines
        }
        ParsedExtension::AuthorityInfoAccess(aia) => {
            let mut lines = Vec::new();
            for (i, desc) in aia.accessdescs.iter().enumerate() {
                lines.push(format!("[{}]Authority Info Access", i + 1));
                lines.push(format!(
                    "{}Access Method={}",
                    INDENT,
                    describe_oid(&desc.access_method.to_id_string())
                ));
                lines.push(format!(
                    "{}{}",
                    INDENT,
                    describe_general_name(&desc.access_location)
                ));
            }
            lines
        }
        ParsedExtension::CertificatePolicies(policies) => {
            let mut lines = Vec::new();
            for (i, policy) in policies.iter().enumerate() {
                lines.push(format!("[{}]Certificate Policy:", i + 1));
                lines.push(format!(
                    "{}Policy Identifier={}",
                    INDENT,
                    policy.policy_id.to_id_string()
                ));
            }
            lines
        }
        _ => return None,
    };

    Some(join(lines))
}

fn describe_general_name(name: &GeneralName<'_>) -> String {
    match name {
        GeneralName::DNSName(dns) => format!("DNS Name={}", dns),
        GeneralName::RFC822Name(email) => format!("RFC822 Name={}", email),
        GeneralName::URI(uri) => format!("URL={}", uri),
        GeneralName::DirectoryName(dn) => format!("Directory Address={}", dn),
        GeneralName::IPAddress(ip) => format!("IP Address={}", describe_ip(ip)),
        GeneralName::RegisteredID(oid) => format!("Registered ID={}", oid.to_id_string()),
        GeneralName::OtherName(oid, value) => {
            let oid = oid.to_id_string();
            match decode_der_string(value) {
                Some(text) if oid == OID_USER_PRINCIPAL_NAME => {
                    format!("Other Name:Principal Name={}", text)
                }
                Some(text) => format!("Other Name:{}={}", oid, text),
                None => format!("Other Name:{}={}", oid, hex_compact(value)),
            }
        }
        _ => "Unsupported General Name".to_string(),
    }
}

fn describe_ip(ip: &[u8]) -> String {
    match ip.len() {
        4 => format!("{}.{}.{}.{}", ip[0], ip[1], ip[2], ip[3]),
        16 => ip
            .chunks(2)
            .map(|c| format!("{:02x}{:02x}", c[0], c[1]))
            .collect::<Vec<_>>()
            .join(":"),
        _ => hex_compact(ip),
    }
}

/// `Friendly Name (oid)` for well-known OIDs, the bare OID otherwise
fn describe_oid(oid: &str) -> String {
    let name = match oid {
        "2.5.29.37.0" => "Any Purpose",
        "1.3.6.1.5.5.7.3.1" => "Server Authentication",
        "1.3.6.1.5.5.7.3.2" => "Client Authentication",
        "1.3.6.1.5.5.7.3.3" => "Code Signing",
        "1.3.6.1.5.5.7.3.4" => "Secure Email",
        "1.3.6.1.5.5.7.3.8" => "Time Stamping",
        "1.3.6.1.5.5.7.3.9" => "OCSP Signing",
        "1.3.6.1.4.1.311.10.3.4" => "Encrypting File System",
        "1.3.6.1.4.1.311.10.3.12" => "Document Signing",
        "1.3.6.1.4.1.311.20.2.2" => "Smart Card Logon",
        "1.3.6.1.5.5.7.48.1" => "On-line Certificate Status Protocol",
        "1.3.6.1.5.5.7.48.2" => "Certification Authority Issuer",
        _ => return oid.to_string(),
    };
    format!("{} ({})", name, oid)
}

fn join(lines: Vec<String>) -> String {
    let mut text = String::new();
    for line in lines {
        text.push_str(&line);
        text.push_str(CRLF);
    }
    text
}

fn hex_compact(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Space-separated hex bytes, sixteen per line
pub fn hex_dump(bytes: &[u8]) -> String {
    join(
        bytes
            .chunks(16)
            .map(|chunk| {
                chunk
                    .iter()
                    .map(|b| format!("{:02x}", b))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect(),
    )
}

/// Decode a DER string value, unwrapping an `[0] EXPLICIT` tag if present
fn decode_der_string(data: &[u8]) -> Option<String> {
    let (_, any) = Any::from_der(data).ok()?;
    if any.class() == Class::ContextSpecific {
        return decode_der_string(any.data);
    }
    // UTF-16BE content; der-parser's generic string view only accepts UTF-8
    if any.tag() == Tag::BmpString {
        return BmpString::try_from(any).ok().map(|s| s.string());
    }

    let (_, obj) = parse_der(data).ok()?;
    obj.as_str().ok().map(str::to_string)
}
