//! LDIF export directory source
//!
//! Reads an LDIF content file (RFC 2849), such as one produced by `ldifde`
//! or `ldapsearch`, and serves user lookups from it. Certificate template
//! objects found in the same export provide template display names.

use crate::certificate::TemplateNames;
use crate::directory::{find_unique, DirectoryLookup, DirectoryUser};
use crate::utils::DirectoryError;
use base64::Engine;
use std::path::Path;
use tracing::debug;

const ATTR_CN: &str = "cn";
const ATTR_ACCOUNT_NAME: &str = "samaccountname";
const ATTR_PRINCIPAL_NAME: &str = "userprincipalname";
const ATTR_USER_CERTIFICATE: &str = "usercertificate";
const ATTR_DISPLAY_NAME: &str = "displayname";
const ATTR_TEMPLATE_OID: &str = "mspki-cert-template-oid";

/// One attribute value with the line it started on
#[derive(Debug)]
struct AttrValue {
    name: String,
    value: Vec<u8>,
    line: usize,
}

#[derive(Debug, Default)]
struct Entry {
    dn: String,
    attrs: Vec<AttrValue>,
}

impl Entry {
    fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a AttrValue> + 'a {
        self.attrs.iter().filter(move |a| a.name == name)
    }

    fn text(&self, name: &str) -> Result<Option<String>, DirectoryError> {
        match self.values(name).next() {
            Some(attr) => String::from_utf8(attr.value.clone())
                .map(Some)
                .map_err(|_| DirectoryError::Parse {
                    line: attr.line,
                    message: format!("attribute {} is not valid UTF-8", attr.name),
                }),
            None => Ok(None),
        }
    }
}

/// Directory backed by an LDIF export
#[derive(Debug, Clone, Default)]
pub struct LdifDirectory {
    users: Vec<DirectoryUser>,
    templates: TemplateNames,
}

impl LdifDirectory {
    /// Load and parse an LDIF file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DirectoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse LDIF content
    pub fn parse(text: &str) -> Result<Self, DirectoryError> {
        let mut directory = Self::default();

        for entry in parse_entries(text)? {
            if let Some(oid) = entry.text(ATTR_TEMPLATE_OID)? {
                let name = match entry.text(ATTR_DISPLAY_NAME)? {
                    Some(name) => Some(name),
                    None => entry.text(ATTR_CN)?,
                };
                if let Some(name) = name {
                    debug!(oid = oid.as_str(), name = name.as_str(), "template object");
                    directory.templates.insert(oid, name);
                }
                continue;
            }

            let common_name = entry.text(ATTR_CN)?;
            let account_name = entry.text(ATTR_ACCOUNT_NAME)?;
            let principal_name = entry.text(ATTR_PRINCIPAL_NAME)?;
            if common_name.is_none() && account_name.is_none() && principal_name.is_none() {
                continue;
            }

            let certificates = entry
                .values(ATTR_USER_CERTIFICATE)
                .map(|attr| attr.value.clone())
                .collect();

            directory.users.push(DirectoryUser {
                distinguished_name: entry.dn.clone(),
                common_name,
                account_name,
                principal_name,
                certificates,
            });
        }

        debug!(
            users = directory.users.len(),
            templates = directory.templates.len(),
            "loaded LDIF directory"
        );
        Ok(directory)
    }

    pub fn users(&self) -> &[DirectoryUser] {
        &self.users
    }
}

impl DirectoryLookup for LdifDirectory {
    fn find_user(&self, identifier: &str) -> Result<Option<DirectoryUser>, DirectoryError> {
        find_unique(&self.users, identifier)
    }

    fn template_names(&self) -> TemplateNames {
        self.templates.clone()
    }
}

/// Split LDIF text into entries, unfolding continuation lines
fn parse_entries(text: &str) -> Result<Vec<Entry>, DirectoryError> {
    let mut entries = Vec::new();
    let mut current: Option<Entry> = None;
    let mut logical: Option<(usize, String)> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;

        if let Some(cont) = raw.strip_prefix(' ') {
            match logical.as_mut() {
                Some((_, buf)) => buf.push_str(cont),
                None => {
                    return Err(DirectoryError::Parse {
                        line: line_no,
                        message: "continuation line without a preceding line".to_string(),
                    })
                }
            }
            continue;
        }

        if let Some((start, line)) = logical.take() {
            apply_line(&mut current, &mut entries, start, &line)?;
        }

        if raw.is_empty() {
            if let Some(entry) = current.take() {
                entries.push(entry);
            }
            continue;
        }

        logical = Some((line_no, raw.to_string()));
    }

    if let Some((start, line)) = logical.take() {
        apply_line(&mut current, &mut entries, start, &line)?;
    }
    if let Some(entry) = current.take() {
        entries.push(entry);
    }

    Ok(entries)
}

fn apply_line(
    current: &mut Option<Entry>,
    entries: &mut Vec<Entry>,
    line_no: usize,
    line: &str,
) -> Result<(), DirectoryError> {
    if line.starts_with('#') {
        return Ok(());
    }

    let (name, value) = parse_attr_line(line, line_no)?;

    match current {
        None if name == "version" && entries.is_empty() => Ok(()),
        None if name == "dn" => {
            let dn = String::from_utf8(value).map_err(|_| DirectoryError::Parse {
                line: line_no,
                message: "dn is not valid UTF-8".to_string(),
            })?;
            *current = Some(Entry {
                dn,
                attrs: Vec::new(),
            });
            Ok(())
        }
        None => Err(DirectoryError::Parse {
            line: line_no,
            message: format!("expected dn, found attribute {}", name),
        }),
        Some(entry) => {
            entry.attrs.push(AttrValue {
                name,
                value,
                line: line_no,
            });
            Ok(())
        }
    }
}

/// Parse `attr: value`, `attr:: base64` into a lowercased attribute name
/// (options stripped) and the value bytes
fn parse_attr_line(line: &str, line_no: usize) -> Result<(String, Vec<u8>), DirectoryError> {
    let (name, rest) = line.split_once(':').ok_or_else(|| DirectoryError::Parse {
        line: line_no,
        message: format!("missing ':' in '{}'", line),
    })?;

    let name = name
        .split(';')
        .next()
        .unwrap_or(name)
        .trim()
        .to_lowercase();

    let value = if let Some(encoded) = rest.strip_prefix(':') {
        base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| DirectoryError::Parse {
                line: line_no,
                message: format!("invalid base64 value for {}: {}", name, e),
            })?
    } else if rest.starts_with('<') {
        return Err(DirectoryError::Parse {
            line: line_no,
            message: format!("URL values are not supported ({})", name),
        });
    } else {
        rest.trim_start().as_bytes().to_vec()
    };

    Ok((name, value))
}
