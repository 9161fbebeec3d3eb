//! Document-level types.

use super::{DocumentElement, EmbeddedImage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A parsed RTF document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata (title, author, etc.)
    pub metadata: Metadata,

    /// Structural elements in document order
    pub elements: Vec<DocumentElement>,

    /// Embedded pictures, anchored by [`EmbeddedImage::position`]
    pub images: Vec<EmbeddedImage>,

    /// Counters collected while parsing
    pub stats: ParseStats,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of elements.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Add an element to the document.
    pub fn add_element(&mut self, element: DocumentElement) {
        self.elements.push(element);
    }

    /// Add an image to the document.
    pub fn add_image(&mut self, image: EmbeddedImage) {
        self.images.push(image);
    }

    /// Check if the document has no content at all.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.images.is_empty()
    }

    /// Iterate over elements and images in document order.
    ///
    /// An image anchored at position `n` is yielded after the first `n`
    /// elements; images sharing an anchor keep their extraction order.
    pub fn blocks(&self) -> impl Iterator<Item = Block<'_>> + '_ {
        let mut images = self.images.iter().peekable();
        let mut elements = self.elements.iter().enumerate().peekable();

        std::iter::from_fn(move || {
            let next_image = images.peek().map(|image| image.position);
            let next_element = elements.peek().map(|(index, _)| *index);
            match (next_image, next_element) {
                (Some(position), Some(index)) if position <= index => {
                    images.next().map(Block::Image)
                }
                (_, Some(_)) => elements.next().map(|(_, element)| Block::Element(element)),
                (Some(_), None) => images.next().map(Block::Image),
                (None, None) => None,
            }
        })
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.elements
            .iter()
            .map(|element| element.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// A borrowed view of one piece of document content.
#[derive(Debug, Clone, Copy)]
pub enum Block<'a> {
    /// A structural element
    Element(&'a DocumentElement),
    /// An embedded picture
    Image(&'a EmbeddedImage),
}

/// Document metadata read from the `\info` group and the RTF header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Author's manager
    pub manager: Option<String>,

    /// Last person to edit the document
    pub operator: Option<String>,

    /// Category
    pub category: Option<String>,

    /// Keywords
    pub keywords: Option<String>,

    /// Comments
    pub comment: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last revision date
    pub modified: Option<DateTime<Utc>>,

    /// RTF version from `\rtfN`
    pub rtf_version: Option<u8>,

    /// Character set (`ansi`, `mac`, `pc`, `pca`)
    pub charset: Option<String>,

    /// ANSI code page from `\ansicpgN`
    pub code_page: Option<u16>,

    /// Page count recorded by the producer
    pub page_count: Option<u32>,

    /// Word count recorded by the producer
    pub word_count: Option<u32>,
}

/// Counters collected during a parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Tokens produced by the tokenizer
    pub tokens: usize,

    /// `{` tokens seen (destination pushes)
    pub groups_opened: usize,

    /// Destination pops, including groups unwound at end of input
    pub groups_closed: usize,

    /// Deepest group nesting reached
    pub max_depth: usize,

    /// `}` tokens with nothing left to close
    pub unmatched_closes: usize,

    /// Groups still open at end of input
    pub unclosed_groups: usize,

    /// Pictures kept as images
    pub images_extracted: usize,

    /// Pictures dropped (bad hex, unknown signature, duplicate fallback, unterminated)
    pub images_discarded: usize,

    /// Paragraphs removed by the artifact filter
    pub artifacts_filtered: usize,

    /// Table rows rejected by the malformed-row guard
    pub rows_rejected: usize,
}

impl ParseStats {
    /// Whether every opened group was closed by the document itself.
    pub fn is_balanced(&self) -> bool {
        self.unclosed_groups == 0 && self.unmatched_closes == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImageFormat;

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.element_count(), 0);
    }

    #[test]
    fn test_blocks_interleave_images() {
        let mut doc = Document::new();
        doc.add_image(EmbeddedImage::new(vec![1], ImageFormat::Png, 0));
        doc.add_element(DocumentElement::paragraph("first"));
        doc.add_element(DocumentElement::paragraph("second"));
        doc.add_image(EmbeddedImage::new(vec![2], ImageFormat::Png, 1));
        doc.add_image(EmbeddedImage::new(vec![3], ImageFormat::Png, 2));

        let order: Vec<String> = doc
            .blocks()
            .map(|block| match block {
                Block::Element(e) => e.text.clone(),
                Block::Image(i) => format!("img{}", i.data[0]),
            })
            .collect();
        assert_eq!(order, vec!["img1", "first", "img2", "second", "img3"]);
    }

    #[test]
    fn test_stats_balance() {
        let mut stats = ParseStats::default();
        assert!(stats.is_balanced());
        stats.unclosed_groups = 1;
        assert!(!stats.is_balanced());
    }
}
