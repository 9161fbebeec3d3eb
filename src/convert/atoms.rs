//! Document to atom conversion.

use std::sync::Arc;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{
    Atom, AtomPayload, BinaryData, Block, Document, DocumentElement, ElementType, EmbeddedImage,
    TableData,
};
use crate::parser::{ErrorMode, MarkerPatterns};

use super::chunk::{ChunkOptions, SlidingWindowChunker, TextChunker};
use super::hash::ContentHasher;
use super::image::ImageProcessor;
use super::ConvertOptions;

/// Converts a parsed [`Document`] into atoms.
///
/// Elements and images are emitted in document order. Text atoms longer
/// than the chunk limit carry their chunks as quarks; image atoms carry the
/// output of the image processor, if one is set.
pub struct AtomConverter {
    hasher: ContentHasher,
    chunking: ChunkOptions,
    chunker: Arc<dyn TextChunker>,
    image_processor: Option<Arc<dyn ImageProcessor>>,
    parallel: bool,
    error_mode: ErrorMode,
    markers: MarkerPatterns,
}

impl AtomConverter {
    /// Create a converter from conversion options.
    pub fn new(options: &ConvertOptions) -> Self {
        Self {
            hasher: ContentHasher::new(options.hash),
            chunking: options.chunking,
            chunker: Arc::new(SlidingWindowChunker),
            image_processor: None,
            parallel: options.parallel,
            error_mode: options.parse.error_mode,
            markers: MarkerPatterns::new(),
        }
    }

    /// Replace the text chunker.
    pub fn with_chunker(mut self, chunker: Arc<dyn TextChunker>) -> Self {
        self.chunker = chunker;
        self
    }

    /// Set the image processor.
    pub fn with_image_processor(mut self, processor: Arc<dyn ImageProcessor>) -> Self {
        self.image_processor = Some(processor);
        self
    }

    /// Convert a document into atoms.
    pub fn convert(&self, doc: &Document) -> Result<Vec<Atom>> {
        let mut image_quarks = self.process_images(&doc.images)?.into_iter();
        let mut atoms = Vec::with_capacity(doc.elements.len() + doc.images.len());

        for block in doc.blocks() {
            match block {
                Block::Element(element) => {
                    if let Some(atom) = self.element_atom(element) {
                        atoms.push(atom);
                    }
                }
                Block::Image(image) => {
                    let quarks = image_quarks.next().unwrap_or_default();
                    atoms.push(self.image_atom(image).with_quarks(quarks));
                }
            }
        }

        Ok(atoms)
    }

    /// Build the atom for one element. Empty lists and tables yield nothing.
    pub fn element_atom(&self, element: &DocumentElement) -> Option<Atom> {
        match element.element_type {
            ElementType::List => {
                let items = element
                    .list_items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        if element.item_has_marker(index) {
                            self.markers.strip(item)
                        } else {
                            item.as_str()
                        }
                    })
                    .map(|item| item.trim().to_string())
                    .collect();
                self.finish_list_atom(items, element.is_ordered)
            }
            ElementType::Table => self.table_atom(element.table_rows.clone()),
            _ => Some(self.text_atom(&element.text)),
        }
    }

    /// Build a text atom, chunked into quarks when long.
    pub fn text_atom(&self, text: &str) -> Atom {
        let length = text.chars().count();
        let atom = Atom::new(
            AtomPayload::Text(text.to_string()),
            length,
            self.hasher.hash_text(text),
        );
        if !self.chunking.applies_to(length) {
            return atom;
        }

        let quarks = self
            .chunker
            .chunk(text, &self.chunking)
            .into_iter()
            .map(|chunk| {
                let length = chunk.chars().count();
                let hash = self.hasher.hash_text(&chunk);
                Atom::new(AtomPayload::Text(chunk), length, hash)
            })
            .collect();
        atom.with_quarks(quarks)
    }

    /// Build a list atom with markers stripped from the items.
    pub fn list_atom(&self, items: &[String], ordered: bool) -> Option<Atom> {
        let items = items
            .iter()
            .map(|item| self.markers.strip(item).trim().to_string())
            .collect();
        self.finish_list_atom(items, ordered)
    }

    fn finish_list_atom(&self, mut items: Vec<String>, ordered: bool) -> Option<Atom> {
        items.retain(|item| !item.is_empty());
        if items.is_empty() {
            return None;
        }

        let length = items.iter().map(|item| item.chars().count()).sum();
        let hash = self.hasher.hash_items(&items);
        let payload = if ordered {
            AtomPayload::OrderedList(items)
        } else {
            AtomPayload::UnorderedList(items)
        };
        Some(Atom::new(payload, length, hash))
    }

    /// Build a table atom; ragged rows are padded.
    pub fn table_atom(&self, rows: Vec<Vec<String>>) -> Option<Atom> {
        let table = TableData::from_rows(rows);
        if table.is_empty() {
            return None;
        }
        let length = table.total_chars();
        let hash = self.hasher.hash_rows(&table.rows);
        Some(Atom::new(AtomPayload::Table(table), length, hash))
    }

    /// Build a binary atom for an image.
    pub fn image_atom(&self, image: &EmbeddedImage) -> Atom {
        Atom::new(
            AtomPayload::Binary(BinaryData {
                data: image.data.clone(),
                mime_type: image.mime_type().to_string(),
            }),
            image.size(),
            self.hasher.hash_bytes(&image.data),
        )
    }

    /// Run the image processor over every image, keeping order.
    fn process_images(&self, images: &[EmbeddedImage]) -> Result<Vec<Vec<Atom>>> {
        let Some(processor) = self.image_processor.as_ref() else {
            return Ok(vec![Vec::new(); images.len()]);
        };

        let results: Vec<Result<Vec<Atom>>> = if self.parallel && images.len() > 1 {
            images
                .par_iter()
                .map(|image| processor.process(image))
                .collect()
        } else {
            images.iter().map(|image| processor.process(image)).collect()
        };

        results
            .into_iter()
            .enumerate()
            .map(|(index, result)| match result {
                Ok(quarks) => Ok(quarks),
                Err(e) if self.error_mode == ErrorMode::Strict => Err(match e {
                    Error::ImageProcess(_) => e,
                    other => Error::ImageProcess(format!("image {}: {}", index, other)),
                }),
                Err(e) => {
                    log::warn!(
                        "{} processor failed on image {}: {}",
                        processor.name(),
                        index,
                        e
                    );
                    Ok(Vec::new())
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::HashOptions;
    use crate::model::{AtomType, ImageFormat};

    fn converter() -> AtomConverter {
        AtomConverter::new(&ConvertOptions::default())
    }

    #[test]
    fn test_text_atom() {
        let atom = converter().text_atom("Café au lait");
        assert_eq!(atom.atom_type, AtomType::Text);
        assert_eq!(atom.length, 12);
        assert!(atom.hash.sha256.is_some());
        assert!(atom.quarks.is_empty());
    }

    #[test]
    fn test_list_markers_are_stripped() {
        let items = vec!["• First item".to_string(), "- Second item".to_string()];
        let atom = converter().list_atom(&items, false).unwrap();
        assert_eq!(
            atom.payload,
            AtomPayload::UnorderedList(vec!["First item".into(), "Second item".into()])
        );
        assert_eq!(atom.length, 21);

        let items = vec!["1. Alpha".to_string(), "2) Beta".to_string()];
        let atom = converter().list_atom(&items, true).unwrap();
        assert_eq!(atom.list_items(), Some(&["Alpha".to_string(), "Beta".to_string()][..]));
        assert!(atom.is_ordered_list());
    }

    #[test]
    fn test_unmarked_items_keep_leading_words() {
        let element = DocumentElement::list_with_markers(
            vec!["• Gaskets".to_string(), "o ring seals".to_string()],
            vec![true, false],
            false,
        );
        let atom = converter().element_atom(&element).unwrap();
        assert_eq!(
            atom.list_items(),
            Some(&["Gaskets".to_string(), "o ring seals".to_string()][..])
        );
    }

    #[test]
    fn test_empty_list_and_table_yield_nothing() {
        assert!(converter().list_atom(&["  ".to_string()], false).is_none());
        assert!(converter().table_atom(Vec::new()).is_none());
    }

    #[test]
    fn test_table_atom_is_padded() {
        let rows = vec![
            vec!["A".to_string(), "B".to_string()],
            vec!["C".to_string()],
        ];
        let atom = converter().table_atom(rows).unwrap();
        let table = atom.table().unwrap();
        assert_eq!(table.columns, 2);
        assert_eq!(table.rows[1], vec!["C".to_string(), String::new()]);
        assert_eq!(atom.length, 3);
        assert_eq!(
            atom.hash,
            ContentHasher::new(HashOptions::all()).hash_text("A\tB\nC\t")
        );
    }

    #[test]
    fn test_image_atom() {
        let image = EmbeddedImage::new(vec![0x89, 0x50, 0x4E, 0x47], ImageFormat::Png, 0);
        let atom = converter().image_atom(&image);
        assert_eq!(atom.atom_type, AtomType::Binary);
        assert_eq!(atom.length, 4);
        assert_eq!(atom.binary().unwrap().mime_type, "image/png");
    }

    #[test]
    fn test_long_text_is_chunked() {
        let options = ConvertOptions::new().with_chunking(ChunkOptions::sliding(10, 5));
        let atom = AtomConverter::new(&options).text_atom("alpha beta gamma delta");
        assert!(!atom.quarks.is_empty());
        assert!(atom.quarks.iter().all(|q| q.length <= 10));
    }
}
