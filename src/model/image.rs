//! Embedded picture types.

use serde::{Deserialize, Serialize};

/// Image formats recognised inside `\pict` groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Wmf,
    Emf,
}

impl ImageFormat {
    /// MIME type for the format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Wmf => "image/wmf",
            ImageFormat::Emf => "image/emf",
        }
    }

    /// Conventional file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Gif => "gif",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Wmf => "wmf",
            ImageFormat::Emf => "emf",
        }
    }

    /// Legacy vector metafiles, written by Word as a fallback next to a raster copy.
    pub fn is_legacy_vector(&self) -> bool {
        matches!(self, ImageFormat::Wmf | ImageFormat::Emf)
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// A decoded picture that passed the signature check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedImage {
    /// Raw image bytes
    #[serde(skip_serializing, default)]
    pub data: Vec<u8>,

    /// Detected format
    pub format: ImageFormat,

    /// Source width from `\picw` (pixels or metafile units)
    pub width: Option<u32>,

    /// Source height from `\pich`
    pub height: Option<u32>,

    /// Number of elements emitted before the picture closed. The image
    /// belongs right after that many elements in document order.
    pub position: usize,
}

impl EmbeddedImage {
    /// Create a new image anchored at `position`.
    pub fn new(data: Vec<u8>, format: ImageFormat, position: usize) -> Self {
        Self {
            data,
            format,
            width: None,
            height: None,
            position,
        }
    }

    /// Set source dimensions.
    pub fn with_dimensions(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Size of the image data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// MIME type of the image.
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Suggested filename for the image given an identifier.
    pub fn suggested_filename(&self, id: &str) -> String {
        format!("{}.{}", id, self.format.extension())
    }
}
