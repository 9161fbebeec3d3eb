//! # unrtf
//!
//! RTF content extraction library for Rust.
//!
//! This library reads RTF documents, reconstructs their structure
//! (paragraphs, headings, lists, tables and embedded pictures) and turns it
//! into atoms: self-contained, hashed content units ready for indexing.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unrtf::{extract_atoms, parse_file};
//!
//! fn main() -> unrtf::Result<()> {
//!     // Parse an RTF file
//!     let doc = parse_file("letter.rtf")?;
//!     println!("{}", doc.plain_text());
//!
//!     // Or extract atoms directly
//!     let data = std::fs::read("letter.rtf")?;
//!     for atom in extract_atoms(&data)? {
//!         println!("{} ({} chars)", atom.atom_type, atom.length);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Structure recovery**: Headings from outline levels, Word list markers, tables
//! - **Destination isolation**: Font tables, stylesheets and other metadata never leak into text
//! - **Embedded pictures**: PNG, JPEG, GIF, BMP, WMF and EMF, with figure fallbacks deduplicated
//! - **Atoms**: MD5/SHA-1/SHA-256 hashes, optional chunking of long text
//! - **Code pages**: `\ansicpg` and `\'XX` escapes decoded with `encoding_rs`
//! - **Output formats**: atoms, plain text, JSON

pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use convert::{
    AtomConverter, ChunkOptions, ConvertOptions, ConvertResult, DocumentProcessor, HashOptions,
    ImageProcessor, ProcessorRegistry, RtfProcessor, TextChunker,
};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_rtf, RtfFormat};
pub use error::{Error, Result};
pub use model::{
    Atom, AtomPayload, AtomType, ContentHash, Document, DocumentElement, ElementType,
    EmbeddedImage, ImageFormat, Metadata, ParseStats, TableData,
};
pub use parser::{CancellationFlag, ErrorMode, ParseOptions, RtfParser};
pub use render::{atoms_to_json, JsonFormat};

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// Parse an RTF file and return a structured document.
///
/// # Example
///
/// ```no_run
/// use unrtf::parse_file;
///
/// let doc = parse_file("letter.rtf").unwrap();
/// println!("Elements: {}", doc.element_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    parse_file_with_options(path, ParseOptions::default())
}

/// Parse an RTF file with custom options.
///
/// # Example
///
/// ```no_run
/// use unrtf::{parse_file_with_options, ParseOptions};
///
/// let options = ParseOptions::new().strict().with_images(false);
/// let doc = parse_file_with_options("letter.rtf", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    let data = std::fs::read(path)?;
    parse_bytes_with_options(&data, options)
}

/// Parse an RTF file without blocking the async runtime.
#[cfg(feature = "async")]
pub async fn parse_file_async<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    let data = tokio::fs::read(path).await?;
    parse_bytes_with_options(&data, options)
}

/// Parse RTF from bytes.
///
/// # Example
///
/// ```no_run
/// use unrtf::parse_bytes;
///
/// let data = std::fs::read("letter.rtf").unwrap();
/// let doc = parse_bytes(&data).unwrap();
/// ```
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    let parser = RtfParser::from_bytes(data)?;
    parser.parse()
}

/// Parse RTF from bytes with custom options.
pub fn parse_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Document> {
    let parser = RtfParser::from_bytes_with_options(data, options)?;
    parser.parse()
}

/// Parse RTF from a string.
pub fn parse_str(text: &str) -> Result<Document> {
    let parser = RtfParser::from_text(text)?;
    parser.parse()
}

/// Parse RTF from a reader.
///
/// # Example
///
/// ```no_run
/// use unrtf::parse_reader;
/// use std::fs::File;
///
/// let file = File::open("letter.rtf").unwrap();
/// let doc = parse_reader(file).unwrap();
/// ```
pub fn parse_reader<R: Read>(reader: R) -> Result<Document> {
    let parser = RtfParser::from_reader(reader)?;
    parser.parse()
}

/// Parse RTF from a reader with custom options.
pub fn parse_reader_with_options<R: Read>(reader: R, options: ParseOptions) -> Result<Document> {
    let parser = RtfParser::from_reader_with_options(reader, options)?;
    parser.parse()
}

/// Extract atoms from RTF bytes with default options.
///
/// # Example
///
/// ```no_run
/// use unrtf::extract_atoms;
///
/// let atoms = extract_atoms(br"{\rtf1 Hello world\par}").unwrap();
/// assert_eq!(atoms[0].text(), Some("Hello world"));
/// ```
pub fn extract_atoms(data: &[u8]) -> Result<Vec<Atom>> {
    extract_atoms_with_options(data, &ConvertOptions::default())
}

/// Extract atoms from RTF bytes with custom options.
pub fn extract_atoms_with_options(data: &[u8], options: &ConvertOptions) -> Result<Vec<Atom>> {
    Ok(RtfProcessor::new().process_bytes(data, options)?.atoms)
}

/// Convert an RTF file to plain text.
pub fn to_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_text(&doc)
}

/// Convert an RTF file to JSON.
///
/// # Example
///
/// ```no_run
/// use unrtf::{to_json, JsonFormat};
///
/// let json = to_json("letter.rtf", JsonFormat::Pretty).unwrap();
/// std::fs::write("letter.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_json(&doc, format)
}

/// Builder for parsing and converting RTF documents.
///
/// # Example
///
/// ```no_run
/// use unrtf::{HashOptions, Unrtf};
///
/// let result = Unrtf::new()
///     .strict()
///     .with_hash(HashOptions::sha256_only())
///     .parse("letter.rtf")?;
///
/// let atoms = result.atoms()?;
/// println!("{}", result.atoms_to_json(unrtf::JsonFormat::Pretty)?);
/// # Ok::<(), unrtf::Error>(())
/// ```
pub struct Unrtf {
    convert_options: ConvertOptions,
    image_processor: Option<Arc<dyn ImageProcessor>>,
}

impl Unrtf {
    /// Create a new Unrtf builder.
    pub fn new() -> Self {
        Self {
            convert_options: ConvertOptions::default(),
            image_processor: None,
        }
    }

    /// Enable lenient parsing mode (the default).
    pub fn lenient(mut self) -> Self {
        self.convert_options.parse = self.convert_options.parse.lenient();
        self
    }

    /// Enable strict parsing mode.
    pub fn strict(mut self) -> Self {
        self.convert_options.parse = self.convert_options.parse.strict();
        self
    }

    /// Enable or disable image extraction.
    pub fn with_images(mut self, extract: bool) -> Self {
        self.convert_options.parse = self.convert_options.parse.with_images(extract);
        self
    }

    /// Enable Unicode NFC normalization of extracted text.
    pub fn with_unicode_normalization(mut self) -> Self {
        self.convert_options.parse = self.convert_options.parse.with_unicode_normalization(true);
        self
    }

    /// Attach a cancellation flag.
    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.convert_options.parse = self.convert_options.parse.with_cancellation(flag);
        self
    }

    /// Set the digests computed for atoms.
    pub fn with_hash(mut self, hash: HashOptions) -> Self {
        self.convert_options = self.convert_options.with_hash(hash);
        self
    }

    /// Set chunking of long text atoms.
    pub fn with_chunking(mut self, chunking: ChunkOptions) -> Self {
        self.convert_options = self.convert_options.with_chunking(chunking);
        self
    }

    /// Process images one at a time.
    pub fn sequential(mut self) -> Self {
        self.convert_options = self.convert_options.with_parallel(false);
        self
    }

    /// Set the image processor used for image quarks.
    pub fn with_image_processor(mut self, processor: Arc<dyn ImageProcessor>) -> Self {
        self.image_processor = Some(processor);
        self
    }

    /// Parse an RTF file and return a result wrapper.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<UnrtfResult> {
        let data = std::fs::read(path)?;
        self.parse_bytes(&data)
    }

    /// Parse RTF from bytes.
    pub fn parse_bytes(self, data: &[u8]) -> Result<UnrtfResult> {
        let parser = RtfParser::from_bytes_with_options(data, self.convert_options.parse.clone())?;
        let document = parser.parse()?;
        Ok(UnrtfResult {
            document,
            convert_options: self.convert_options,
            image_processor: self.image_processor,
        })
    }
}

impl Default for Unrtf {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of parsing an RTF document.
pub struct UnrtfResult {
    /// The parsed document
    pub document: Document,
    convert_options: ConvertOptions,
    image_processor: Option<Arc<dyn ImageProcessor>>,
}

impl UnrtfResult {
    /// Convert the document to atoms.
    pub fn atoms(&self) -> Result<Vec<Atom>> {
        let mut converter = AtomConverter::new(&self.convert_options);
        if let Some(ref processor) = self.image_processor {
            converter = converter.with_image_processor(processor.clone());
        }
        converter.convert(&self.document)
    }

    /// Convert the document to atoms serialized as JSON.
    pub fn atoms_to_json(&self, format: JsonFormat) -> Result<String> {
        render::atoms_to_json(&self.atoms()?, format)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.document)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Get plain text.
    pub fn plain_text(&self) -> String {
        self.document.plain_text()
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Get the parse statistics.
    pub fn stats(&self) -> &ParseStats {
        &self.document.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrtf_builder() {
        let unrtf = Unrtf::new().strict().sequential();

        assert!(matches!(
            unrtf.convert_options.parse.error_mode,
            parser::ErrorMode::Strict
        ));
        assert!(!unrtf.convert_options.parallel);
    }

    #[test]
    fn test_unrtf_builder_default() {
        let builder = Unrtf::default();
        assert!(builder.convert_options.parallel);
        assert!(matches!(
            builder.convert_options.parse.error_mode,
            parser::ErrorMode::Lenient
        ));
    }

    #[test]
    fn test_unrtf_builder_images_off() {
        let builder = Unrtf::new().with_images(false);
        assert!(!builder.convert_options.parse.extract_images);
    }

    // ==================== Edge Case Tests ====================

    #[test]
    fn test_parse_bytes_empty_data() {
        let result = parse_bytes(&[]);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_parse_bytes_plain_text_is_lenient() {
        let doc = parse_bytes(b"just some words").unwrap();
        assert_eq!(doc.plain_text(), "just some words");
    }

    #[test]
    fn test_builder_strict_rejects_non_rtf() {
        let result = Unrtf::new().strict().parse_bytes(b"not rtf");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_format_unknown_magic() {
        let result = detect_format_from_bytes(b"<!DOCTYPE html><html></html>");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    // ==================== Output Tests ====================

    #[test]
    fn test_parse_str_and_extract_atoms() {
        let doc = parse_str(r"{\rtf1 Hello world\par}").unwrap();
        assert_eq!(doc.elements.len(), 1);

        let atoms = extract_atoms(br"{\rtf1 Hello world\par}").unwrap();
        assert_eq!(atoms.len(), 1);
        assert_eq!(atoms[0].text(), Some("Hello world"));
    }

    #[test]
    fn test_unrtf_result_outputs() {
        let result = Unrtf::new()
            .parse_bytes(br"{\rtf1{\info{\title Memo}}Body text\par}")
            .unwrap();

        assert_eq!(result.document().metadata.title.as_deref(), Some("Memo"));
        assert_eq!(result.to_text().unwrap(), "Body text");
        assert!(result.to_json(JsonFormat::Compact).unwrap().contains("Body text"));
        let atoms_json = result.atoms_to_json(JsonFormat::Compact).unwrap();
        assert!(atoms_json.starts_with('['));
        assert!(atoms_json.contains("\"atom_type\":\"text\""));
        assert_eq!(result.atoms().unwrap().len(), 1);
        assert!(result.stats().is_balanced());
    }
}
