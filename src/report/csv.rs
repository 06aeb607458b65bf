//! Delimited text report
//!
//! Every field is double-quoted with embedded quotes doubled, rows end with
//! CRLF, and the header names the six report columns.

use crate::models::CertificateRecord;
use crate::utils::ReportError;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::io::{self, Write};

/// Column headers in output order
pub const HEADER: [&str; 6] = [
    "Subject",
    "Issuer",
    "NotBefore",
    "NotAfter",
    "TemplateName",
    "TemplateOID",
];

/// Write the header and one row per record
pub fn write_csv<W: Write>(
    out: W,
    records: &[CertificateRecord],
    delimiter: char,
    date_format: &str,
) -> csv::Result<()> {
    if !delimiter.is_ascii() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("delimiter '{}' is not ASCII", delimiter),
        )
        .into());
    }

    let mut writer = WriterBuilder::new()
        .delimiter(delimiter as u8)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::CRLF)
        .from_writer(out);

    writer.write_record(HEADER)?;
    for record in records {
        let not_before = record.not_before.format(date_format).to_string();
        let not_after = record.not_after.format(date_format).to_string();
        writer.write_record([
            record.subject.as_str(),
            record.issuer.as_str(),
            not_before.as_str(),
            not_after.as_str(),
            record.template_name.as_str(),
            record.template_oid.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Render records to a string
pub fn to_csv_string(
    records: &[CertificateRecord],
    delimiter: char,
    date_format: &str,
) -> Result<String, ReportError> {
    let mut buf = Vec::new();
    write_csv(&mut buf, records, delimiter, date_format).map_err(|e| ReportError::Serialize {
        message: e.to_string(),
    })?;
    String::from_utf8(buf).map_err(|e| ReportError::Serialize {
        message: e.to_string(),
    })
}
