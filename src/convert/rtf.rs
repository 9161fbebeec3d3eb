//! RTF document processor implementation.

use std::sync::Arc;

use crate::error::Result;
use crate::parser::RtfParser;

use super::atoms::AtomConverter;
use super::chunk::TextChunker;
use super::image::ImageProcessor;
use super::{ConvertOptions, ConvertResult, DocumentProcessor};

/// RTF document processor.
///
/// Parses RTF and converts the document into atoms.
#[derive(Clone, Default)]
pub struct RtfProcessor {
    image_processor: Option<Arc<dyn ImageProcessor>>,
    chunker: Option<Arc<dyn TextChunker>>,
}

impl RtfProcessor {
    /// Create a new RTF processor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an image processor whose output becomes quarks of image atoms.
    pub fn with_image_processor(mut self, processor: Arc<dyn ImageProcessor>) -> Self {
        self.image_processor = Some(processor);
        self
    }

    /// Replace the default sliding-window chunker.
    pub fn with_chunker(mut self, chunker: Arc<dyn TextChunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    fn atom_converter(&self, options: &ConvertOptions) -> AtomConverter {
        let mut converter = AtomConverter::new(options);
        if let Some(ref processor) = self.image_processor {
            converter = converter.with_image_processor(processor.clone());
        }
        if let Some(ref chunker) = self.chunker {
            converter = converter.with_chunker(chunker.clone());
        }
        converter
    }
}

impl std::fmt::Debug for RtfProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RtfProcessor")
            .field("image_processor", &self.image_processor.as_ref().map(|p| p.name().to_string()))
            .field("custom_chunker", &self.chunker.is_some())
            .finish()
    }
}

impl DocumentProcessor for RtfProcessor {
    fn supported_extensions(&self) -> &[&str] {
        &["rtf"]
    }

    fn name(&self) -> &str {
        "rtf"
    }

    fn process_bytes(&self, bytes: &[u8], options: &ConvertOptions) -> Result<ConvertResult> {
        let parser = RtfParser::from_bytes_with_options(bytes, options.parse.clone())?;
        let doc = parser.parse()?;
        let atoms = self.atom_converter(options).convert(&doc)?;
        log::debug!(
            "Converted RTF into {} atoms ({} elements, {} images)",
            atoms.len(),
            doc.elements.len(),
            doc.images.len()
        );
        Ok(ConvertResult::new(atoms, doc.metadata).with_stats(doc.stats))
    }
}
