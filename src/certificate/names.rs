//! Template display-name registry
//!
//! Certificates only carry the template OID. The friendly name shown next to
//! it comes from the directory's template objects or from configuration.

use crate::utils::ConfigError;
use std::collections::HashMap;

/// Template OID to display name lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateNames {
    names: HashMap<String, String>,
}

impl TemplateNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a display name, replacing any earlier one for the same OID
    pub fn insert(&mut self, oid: impl Into<String>, name: impl Into<String>) {
        self.names.insert(oid.into(), name.into());
    }

    pub fn get(&self, oid: &str) -> Option<&str> {
        self.names.get(oid).map(String::as_str)
    }

    /// Merge another registry into this one; entries from `other` win
    pub fn merge(&mut self, other: &TemplateNames) {
        for (oid, name) in &other.names {
            self.names.insert(oid.clone(), name.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Parse an `OID=NAME` assignment as given on the command line
    pub fn parse_assignment(value: &str) -> Result<(String, String), ConfigError> {
        let (oid, name) = value
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "template-name".to_string(),
                message: format!("expected OID=NAME, got '{}'", value),
            })?;
        let oid = oid.trim();
        if !is_dotted_oid(oid) {
            return Err(ConfigError::InvalidValue {
                key: "template-name".to_string(),
                message: format!("'{}' is not a dotted OID", oid),
            });
        }
        Ok((oid.to_string(), name.trim().to_string()))
    }
}

impl FromIterator<(String, String)> for TemplateNames {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// True for strings like `1.3.6.1.4.1.311.21.8.123`
pub fn is_dotted_oid(value: &str) -> bool {
    let mut arcs = 0;
    for arc in value.split('.') {
        if arc.is_empty() || !arc.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        arcs += 1;
    }
    arcs >= 2
}
