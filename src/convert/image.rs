//! Image processor interface.

use crate::error::Result;
use crate::model::{Atom, EmbeddedImage};

/// Turns an embedded picture into sub-atoms (OCR text, captions, ...).
///
/// The returned atoms become quarks of the picture's binary atom.
/// Implementations must be thread-safe; images may be processed in parallel.
pub trait ImageProcessor: Send + Sync {
    /// Process one image.
    fn process(&self, image: &EmbeddedImage) -> Result<Vec<Atom>>;

    /// Name used in log messages.
    fn name(&self) -> &str {
        "image"
    }
}
