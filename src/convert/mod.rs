//! Document processor module providing a plugin architecture for multiple formats.
//!
//! Every processor turns a source document into the same output: a list of
//! [`Atom`]s. The registry dispatches on file extension or processor name,
//! so callers can plug in processors for other formats next to RTF.
//!
//! # Example
//!
//! ```no_run
//! use unrtf::convert::{ConvertOptions, ProcessorRegistry, RtfProcessor};
//! use std::sync::Arc;
//! use std::path::Path;
//!
//! fn main() -> unrtf::Result<()> {
//!     let mut registry = ProcessorRegistry::new();
//!     registry.register(Arc::new(RtfProcessor::new()));
//!
//!     let result = registry.process(Path::new("letter.rtf"), &ConvertOptions::default())?;
//!     println!("{} atoms", result.atoms.len());
//!     Ok(())
//! }
//! ```

mod atoms;
mod chunk;
mod hash;
mod image;
mod rtf;

pub use atoms::AtomConverter;
pub use chunk::{ChunkOptions, SlidingWindowChunker, TextChunker};
pub use hash::{ContentHasher, HashOptions};
pub use image::ImageProcessor;
pub use rtf::RtfProcessor;

use crate::error::{Error, Result};
use crate::model::{Atom, Metadata, ParseStats};
use crate::parser::ParseOptions;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Options for document conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Parsing options
    pub parse: ParseOptions,

    /// Digests computed for every atom
    pub hash: HashOptions,

    /// Chunking of long text atoms
    pub chunking: ChunkOptions,

    /// Whether images are handed to the image processor in parallel
    pub parallel: bool,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set parsing options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    /// Set hash options.
    pub fn with_hash(mut self, hash: HashOptions) -> Self {
        self.hash = hash;
        self
    }

    /// Set chunking options.
    pub fn with_chunking(mut self, chunking: ChunkOptions) -> Self {
        self.chunking = chunking;
        self
    }

    /// Enable or disable parallel image processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            hash: HashOptions::default(),
            chunking: ChunkOptions::default(),
            parallel: true,
        }
    }
}

/// Result of document conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Extracted atoms in document order
    pub atoms: Vec<Atom>,

    /// Source document metadata
    pub metadata: Metadata,

    /// Parse statistics (if the processor collects them)
    pub stats: Option<ParseStats>,
}

impl ConvertResult {
    /// Create a new conversion result.
    pub fn new(atoms: Vec<Atom>, metadata: Metadata) -> Self {
        Self {
            atoms,
            metadata,
            stats: None,
        }
    }

    /// Set parse statistics.
    pub fn with_stats(mut self, stats: ParseStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Number of top-level atoms.
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }
}

/// Trait for document processors.
///
/// Implement this trait to add support for a new document format.
pub trait DocumentProcessor: Send + Sync {
    /// Get the supported file extensions for this processor.
    ///
    /// Extensions should be lowercase without the leading dot (e.g., `["rtf"]`).
    fn supported_extensions(&self) -> &[&str];

    /// Get the name of this processor.
    fn name(&self) -> &str;

    /// Process document bytes.
    fn process_bytes(&self, bytes: &[u8], options: &ConvertOptions) -> Result<ConvertResult>;

    /// Process a file at the given path.
    fn process(&self, path: &Path, options: &ConvertOptions) -> Result<ConvertResult> {
        let bytes = std::fs::read(path)?;
        self.process_bytes(&bytes, options)
    }

    /// Check if this processor supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry for document processors.
///
/// The registry maps file extensions to processors and provides
/// convenient methods for processing documents.
pub struct ProcessorRegistry {
    processors: HashMap<String, Arc<dyn DocumentProcessor>>,
    by_name: HashMap<String, Arc<dyn DocumentProcessor>>,
}

impl ProcessorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            processors: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with default processors (RTF).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(RtfProcessor::new()));
        registry
    }

    /// Register a processor.
    ///
    /// The processor will be registered for all its supported extensions,
    /// replacing any processor previously registered for them.
    pub fn register(&mut self, processor: Arc<dyn DocumentProcessor>) {
        for ext in processor.supported_extensions() {
            self.processors
                .insert(ext.to_lowercase(), processor.clone());
        }
        self.by_name
            .insert(processor.name().to_lowercase(), processor);
    }

    /// Get a processor by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn DocumentProcessor>> {
        self.processors.get(&ext.to_lowercase()).cloned()
    }

    /// Get a processor by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentProcessor>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.processors.contains_key(&ext.to_lowercase())
    }

    /// Get all supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.processors.keys().map(|s| s.as_str()).collect();
        extensions.sort_unstable();
        extensions
    }

    /// Process a file using the appropriate processor.
    pub fn process(&self, path: &Path, options: &ConvertOptions) -> Result<ConvertResult> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::InvalidArgument("File has no extension".into()))?;

        let processor = self
            .get_by_extension(ext)
            .ok_or_else(|| Error::Other(format!("No processor for extension: {}", ext)))?;

        processor.process(path, options)
    }

    /// Process bytes using the specified extension to determine the processor.
    pub fn process_bytes(
        &self,
        bytes: &[u8],
        ext: &str,
        options: &ConvertOptions,
    ) -> Result<ConvertResult> {
        let processor = self
            .get_by_extension(ext)
            .ok_or_else(|| Error::Other(format!("No processor for extension: {}", ext)))?;

        processor.process_bytes(bytes, options)
    }
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_options_builder() {
        let options = ConvertOptions::new()
            .with_hash(HashOptions::sha256_only())
            .with_chunking(ChunkOptions::sliding(100, 50))
            .with_parallel(false);

        assert!(!options.hash.md5);
        assert!(options.chunking.enabled);
        assert!(!options.parallel);
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = ProcessorRegistry::with_defaults();
        assert!(registry.supports("rtf"));
        assert!(registry.supports("RTF"));
        assert!(!registry.supports("docx"));
        assert_eq!(registry.supported_extensions(), vec!["rtf"]);
    }

    #[test]
    fn test_registry_get_by_extension() {
        let registry = ProcessorRegistry::with_defaults();
        let processor = registry.get_by_extension("rtf");
        assert!(processor.is_some());
        assert_eq!(processor.unwrap().name(), "rtf");
    }

    #[test]
    fn test_registry_get_by_name() {
        let registry = ProcessorRegistry::with_defaults();
        assert!(registry.get_by_name("RTF").is_some());
        assert!(registry.get_by_name("pdf").is_none());
    }

    #[test]
    fn test_unknown_extension() {
        let registry = ProcessorRegistry::with_defaults();
        let result = registry.process_bytes(b"x", "pdf", &ConvertOptions::default());
        assert!(matches!(result, Err(Error::Other(_))));
    }
}
