//! Atom records: the uniform output of every document processor.

use super::TableData;
use serde::{Deserialize, Serialize};

/// Atom category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AtomType {
    /// Paragraph or heading text
    Text,
    /// Ordered or unordered list
    List,
    /// Rectangular table
    Table,
    /// Binary content (embedded images)
    Binary,
}

impl std::fmt::Display for AtomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AtomType::Text => write!(f, "text"),
            AtomType::List => write!(f, "list"),
            AtomType::Table => write!(f, "table"),
            AtomType::Binary => write!(f, "binary"),
        }
    }
}

/// Content carried by an atom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AtomPayload {
    /// Plain text
    Text(String),
    /// Numbered or lettered list items
    OrderedList(Vec<String>),
    /// Bulleted list items
    UnorderedList(Vec<String>),
    /// Table cells
    Table(TableData),
    /// Raw bytes
    Binary(BinaryData),
}

impl AtomPayload {
    /// Atom type implied by the payload.
    pub fn atom_type(&self) -> AtomType {
        match self {
            AtomPayload::Text(_) => AtomType::Text,
            AtomPayload::OrderedList(_) | AtomPayload::UnorderedList(_) => AtomType::List,
            AtomPayload::Table(_) => AtomType::Table,
            AtomPayload::Binary(_) => AtomType::Binary,
        }
    }
}

/// Binary payload with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryData {
    /// Raw bytes, hex-encoded when serialized
    #[serde(with = "hex_bytes")]
    pub data: Vec<u8>,

    /// MIME type (e.g. "image/png")
    pub mime_type: String,
}

/// Content digests. Each is a lowercase hex string, `None` when disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentHash {
    /// MD5 digest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,

    /// SHA-1 digest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,

    /// SHA-256 digest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

/// A self-contained content unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Atom {
    /// Atom category
    pub atom_type: AtomType,

    /// Content
    pub payload: AtomPayload,

    /// Size metric: characters for text/lists/tables, bytes for binary
    pub length: usize,

    /// Content digests
    pub hash: ContentHash,

    /// Nested sub-atoms (text chunks, OCR output of images)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quarks: Vec<Atom>,
}

impl Atom {
    /// Create an atom; the type is derived from the payload.
    pub fn new(payload: AtomPayload, length: usize, hash: ContentHash) -> Self {
        Self {
            atom_type: payload.atom_type(),
            payload,
            length,
            hash,
            quarks: Vec::new(),
        }
    }

    /// Attach quarks.
    pub fn with_quarks(mut self, quarks: Vec<Atom>) -> Self {
        self.quarks = quarks;
        self
    }

    /// Text content for text atoms.
    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            AtomPayload::Text(text) => Some(text),
            _ => None,
        }
    }

    /// List items for list atoms.
    pub fn list_items(&self) -> Option<&[String]> {
        match &self.payload {
            AtomPayload::OrderedList(items) | AtomPayload::UnorderedList(items) => Some(items),
            _ => None,
        }
    }

    /// Whether this is an ordered list atom.
    pub fn is_ordered_list(&self) -> bool {
        matches!(self.payload, AtomPayload::OrderedList(_))
    }

    /// Table content for table atoms.
    pub fn table(&self) -> Option<&TableData> {
        match &self.payload {
            AtomPayload::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Bytes for binary atoms.
    pub fn binary(&self) -> Option<&BinaryData> {
        match &self.payload {
            AtomPayload::Binary(binary) => Some(binary),
            _ => None,
        }
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}
