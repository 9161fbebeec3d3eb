//! JSON rendering for documents and atoms.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{Atom, Document};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document to JSON.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    serialize(doc, format)
}

/// Convert atoms to JSON. Binary payloads are hex-encoded.
pub fn atoms_to_json(atoms: &[Atom], format: JsonFormat) -> Result<String> {
    serialize(atoms, format)
}

fn serialize<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AtomPayload, ContentHash, DocumentElement};

    #[test]
    fn test_to_json_pretty() {
        let mut doc = Document::new();
        doc.metadata.title = Some("Test".to_string());
        doc.add_element(DocumentElement::paragraph("Hello"));

        let json = to_json(&doc, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\""));
        assert!(json.contains("Hello"));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let doc = Document::new();
        let json = to_json(&doc, JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_atoms_to_json() {
        let atoms = vec![Atom::new(
            AtomPayload::Text("Hi".into()),
            2,
            ContentHash::default(),
        )];
        let json = atoms_to_json(&atoms, JsonFormat::Compact).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("\"atom_type\":\"text\""));
    }
}
