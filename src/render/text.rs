//! Plain text rendering for RTF documents.

use crate::error::Result;
use crate::model::Document;

/// Convert a document to plain text.
///
/// Elements are separated by blank lines; list items and table rows keep
/// one line each, table cells are tab-separated.
pub fn to_text(doc: &Document) -> Result<String> {
    Ok(doc.plain_text().trim().to_string())
}
