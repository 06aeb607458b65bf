//! Certificate template metadata
//!
//! Finds the enterprise certificate template extension among a certificate's
//! extensions and reads `Template=<name>(<oid>)` from the first line of its
//! rendering.

use crate::certificate::names::is_dotted_oid;
use crate::certificate::OID_CERTIFICATE_TEMPLATE;
use crate::models::{Extension, TemplateMetadata, TemplateStatus};

const TEMPLATE_PREFIX: &str = "Template=";

/// Extract template name and OID from an extension list.
///
/// A missing extension is a normal outcome and yields empty fields with
/// [`TemplateStatus::Absent`]. A rendering whose first line cannot be read
/// yields empty fields with [`TemplateStatus::Unrecognized`].
pub fn extract_template(extensions: &[Extension]) -> TemplateMetadata {
    let Some(ext) = extensions
        .iter()
        .find(|ext| ext.identifier == OID_CERTIFICATE_TEMPLATE)
    else {
        return TemplateMetadata::absent();
    };

    let first_line = ext.rendered_text.lines().next().unwrap_or("");

    if let Some((name, oid)) = parse_template_line(first_line) {
        return TemplateMetadata {
            name,
            oid,
            status: TemplateStatus::Present,
        };
    }

    // No display name known for the template: the line is `Template=<oid>`
    if let Some(oid) = first_line.strip_prefix(TEMPLATE_PREFIX) {
        if is_dotted_oid(oid) {
            return TemplateMetadata {
                name: String::new(),
                oid: oid.to_string(),
                status: TemplateStatus::Present,
            };
        }
    }

    TemplateMetadata {
        name: String::new(),
        oid: String::new(),
        status: TemplateStatus::Unrecognized {
            first_line: first_line.to_string(),
        },
    }
}

/// Parse `Template=<name>(<oid>)` into `(name, oid)`.
///
/// The trailing `)` is optional and the split happens at the first `(`.
/// Whitespace is kept as found. Returns `None` when the prefix or the
/// opening parenthesis is missing.
pub fn parse_template_line(line: &str) -> Option<(String, String)> {
    let rest = line.strip_prefix(TEMPLATE_PREFIX)?;
    let rest = rest.strip_suffix(')').unwrap_or(rest);
    let (name, oid) = rest.split_once('(')?;
    Some((name.to_string(), oid.to_string()))
}
