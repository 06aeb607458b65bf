//! Directory lookup
//!
//! Resolves a human-supplied identifier (common name, login account name or
//! user principal name) to a directory user and that user's certificate
//! attribute values.

pub mod ldif;

pub use ldif::LdifDirectory;

use crate::certificate::TemplateNames;
use crate::models::RawCertificate;
use crate::utils::DirectoryError;

/// A user entry and its `userCertificate` values
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirectoryUser {
    pub distinguished_name: String,
    pub common_name: Option<String>,
    /// Login account name (`sAMAccountName`)
    pub account_name: Option<String>,
    /// `userPrincipalName`
    pub principal_name: Option<String>,
    /// Certificate values in attribute order
    pub certificates: Vec<RawCertificate>,
}

impl DirectoryUser {
    /// Case-insensitive match against the common, account and principal names
    pub fn matches(&self, identifier: &str) -> bool {
        let wanted = identifier.to_lowercase();
        [&self.common_name, &self.account_name, &self.principal_name]
            .into_iter()
            .flatten()
            .any(|name| name.to_lowercase() == wanted)
    }

    /// Name used for the user's report file
    pub fn report_name<'a>(&'a self, identifier: &'a str) -> &'a str {
        self.account_name
            .as_deref()
            .or(self.common_name.as_deref())
            .unwrap_or(identifier)
    }
}

/// A source of directory users
pub trait DirectoryLookup: Send + Sync {
    /// Find the single user matching `identifier`.
    ///
    /// `Ok(None)` means no user matched, which is different from a user
    /// without certificates.
    fn find_user(&self, identifier: &str) -> Result<Option<DirectoryUser>, DirectoryError>;

    /// Certificate template display names published by the directory
    fn template_names(&self) -> TemplateNames {
        TemplateNames::new()
    }
}

/// Pick the unique user matching `identifier` from `users`
pub(crate) fn find_unique<'a, I>(
    users: I,
    identifier: &str,
) -> Result<Option<DirectoryUser>, DirectoryError>
where
    I: IntoIterator<Item = &'a DirectoryUser>,
{
    let matches: Vec<&DirectoryUser> = users.into_iter().filter(|u| u.matches(identifier)).collect();
    match matches.len() {
        0 => Ok(None),
        1 => Ok(Some(matches[0].clone())),
        count => Err(DirectoryError::Ambiguous {
            identifier: identifier.to_string(),
            count,
        }),
    }
}

/// Directory held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    users: Vec<DirectoryUser>,
    templates: TemplateNames,
}

impl InMemoryDirectory {
    pub fn new(users: Vec<DirectoryUser>) -> Self {
        Self {
            users,
            templates: TemplateNames::new(),
        }
    }

    pub fn with_templates(mut self, templates: TemplateNames) -> Self {
        self.templates = templates;
        self
    }

    pub fn add_user(&mut self, user: DirectoryUser) {
        self.users.push(user);
    }
}

impl DirectoryLookup for InMemoryDirectory {
    fn find_user(&self, identifier: &str) -> Result<Option<DirectoryUser>, DirectoryError> {
        find_unique(&self.users, identifier)
    }

    fn template_names(&self) -> TemplateNames {
        self.templates.clone()
    }
}
