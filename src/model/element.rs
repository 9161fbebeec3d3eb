//! Structural elements reconstructed from the RTF stream.

use serde::{Deserialize, Serialize};

/// Kind of a structural element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    /// Body text
    Paragraph,
    /// Heading at outline level 0
    Header1,
    /// Heading at outline level 1
    Header2,
    /// Heading at outline level 2
    Header3,
    /// A flat list of items
    List,
    /// A table of text cells
    Table,
}

impl ElementType {
    /// Map an RTF outline level to the element type of a finished paragraph.
    ///
    /// Only the top three levels become headings; deeper levels are body text.
    pub fn from_outline_level(level: Option<u8>) -> Self {
        match level {
            Some(0) => ElementType::Header1,
            Some(1) => ElementType::Header2,
            Some(2) => ElementType::Header3,
            _ => ElementType::Paragraph,
        }
    }

    /// Heading level (1-3) for header types.
    pub fn heading_level(&self) -> Option<u8> {
        match self {
            ElementType::Header1 => Some(1),
            ElementType::Header2 => Some(2),
            ElementType::Header3 => Some(3),
            _ => None,
        }
    }

    /// Whether elements of this type carry their content in `text`.
    pub fn is_text(&self) -> bool {
        !matches!(self, ElementType::List | ElementType::Table)
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ElementType::Paragraph => "paragraph",
            ElementType::Header1 => "header1",
            ElementType::Header2 => "header2",
            ElementType::Header3 => "header3",
            ElementType::List => "list",
            ElementType::Table => "table",
        };
        f.write_str(name)
    }
}

/// A finalized structural element. Elements never nest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentElement {
    /// Element kind
    pub element_type: ElementType,

    /// Text content (paragraphs and headers)
    pub text: String,

    /// List items, in document order (lists only). Items may still carry the
    /// marker they were written with, e.g. `"1. Alpha"` or `"• First"`.
    pub list_items: Vec<String>,

    /// Per list item, whether it starts with a marker. Missing entries count
    /// as marked.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub item_markers: Vec<bool>,

    /// Whether the list is numbered/lettered (lists only)
    pub is_ordered: bool,

    /// Table rows of cell text (tables only)
    pub table_rows: Vec<Vec<String>>,
}

impl DocumentElement {
    fn empty(element_type: ElementType) -> Self {
        Self {
            element_type,
            text: String::new(),
            list_items: Vec::new(),
            item_markers: Vec::new(),
            is_ordered: false,
            table_rows: Vec::new(),
        }
    }

    /// Create a body paragraph.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::text_element(ElementType::Paragraph, text)
    }

    /// Create a header (level is clamped to 1-3).
    pub fn header(level: u8, text: impl Into<String>) -> Self {
        let element_type = match level {
            0 | 1 => ElementType::Header1,
            2 => ElementType::Header2,
            _ => ElementType::Header3,
        };
        Self::text_element(element_type, text)
    }

    /// Create a text-bearing element of the given type.
    pub fn text_element(element_type: ElementType, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::empty(element_type)
        }
    }

    /// Create a list element whose items all start with a marker.
    pub fn list(items: Vec<String>, is_ordered: bool) -> Self {
        Self {
            list_items: items,
            is_ordered,
            ..Self::empty(ElementType::List)
        }
    }

    /// Create a list element, recording which items carry a marker.
    pub fn list_with_markers(items: Vec<String>, markers: Vec<bool>, is_ordered: bool) -> Self {
        Self {
            item_markers: markers,
            ..Self::list(items, is_ordered)
        }
    }

    /// Whether the list item at `index` starts with a marker.
    pub fn item_has_marker(&self, index: usize) -> bool {
        self.item_markers.get(index).copied().unwrap_or(true)
    }

    /// Create a table element.
    pub fn table(rows: Vec<Vec<String>>) -> Self {
        Self {
            table_rows: rows,
            ..Self::empty(ElementType::Table)
        }
    }

    /// Check if this is a paragraph or header.
    pub fn is_text(&self) -> bool {
        self.element_type.is_text()
    }

    /// Check if this is a header.
    pub fn is_header(&self) -> bool {
        self.element_type.heading_level().is_some()
    }

    /// Plain text view of the element.
    pub fn plain_text(&self) -> String {
        match self.element_type {
            ElementType::List => self.list_items.join("\n"),
            ElementType::Table => self
                .table_rows
                .iter()
                .map(|row| row.join("\t"))
                .collect::<Vec<_>>()
                .join("\n"),
            _ => self.text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_level_mapping() {
        assert_eq!(ElementType::from_outline_level(Some(0)), ElementType::Header1);
        assert_eq!(ElementType::from_outline_level(Some(2)), ElementType::Header3);
        assert_eq!(ElementType::from_outline_level(Some(3)), ElementType::Paragraph);
        assert_eq!(ElementType::from_outline_level(None), ElementType::Paragraph);
    }

    #[test]
    fn test_header_constructor() {
        let h = DocumentElement::header(2, "Scope");
        assert_eq!(h.element_type, ElementType::Header2);
        assert!(h.is_header());
        assert!(h.is_text());
    }

    #[test]
    fn test_plain_text() {
        let list = DocumentElement::list(vec!["a".into(), "b".into()], false);
        assert_eq!(list.plain_text(), "a\nb");
        assert!(!list.is_text());

        let table = DocumentElement::table(vec![
            vec!["A".into(), "B".into()],
            vec!["C".into(), "D".into()],
        ]);
        assert_eq!(table.plain_text(), "A\tB\nC\tD");
    }

    #[test]
    fn test_item_markers() {
        let list = DocumentElement::list_with_markers(
            vec!["• a".into(), "o ring".into()],
            vec![true, false],
            false,
        );
        assert!(list.item_has_marker(0));
        assert!(!list.item_has_marker(1));
        assert!(DocumentElement::list(vec!["x".into()], false).item_has_marker(0));
    }
}
