//! RTF format detection and embedded image sniffing.

use crate::error::{Error, Result};
use crate::model::ImageFormat;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// RTF format information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtfFormat {
    /// RTF major version from the `\rtfN` header word (1 in practice)
    pub version: u8,
}

impl std::fmt::Display for RtfFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RTF {}", self.version)
    }
}

/// RTF magic bytes: {\rtf
const RTF_MAGIC: &[u8] = b"{\\rtf";
const RTF_MAGIC_LEN: usize = 5;

/// Detect RTF format from a file path.
///
/// # Example
/// ```no_run
/// use unrtf::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("document.rtf").unwrap();
/// println!("RTF version: {}", format.version);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<RtfFormat> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut header = Vec::with_capacity(16);
    reader.take(16).read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect RTF format from bytes.
///
/// Leading whitespace and a UTF-8 byte order mark are tolerated.
///
/// # Returns
/// * `Ok(RtfFormat)` if the data starts with `{\rtf`
/// * `Err(Error::UnknownFormat)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<RtfFormat> {
    let data = data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data);
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .ok_or(Error::UnknownFormat)?;
    let data = &data[start..];

    if data.len() < RTF_MAGIC_LEN || !data.starts_with(RTF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    // `{\rtf1` is the only version ever produced; a bare `{\rtf` means 1 too.
    let digits: String = data[RTF_MAGIC_LEN..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .map(|&b| b as char)
        .collect();

    if digits.is_empty() {
        return Ok(RtfFormat { version: 1 });
    }

    match digits.parse::<u8>() {
        Ok(1) => Ok(RtfFormat { version: 1 }),
        _ => Err(Error::UnsupportedVersion(digits)),
    }
}

/// Check if a file is an RTF document.
pub fn is_rtf<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes start with an RTF header.
pub fn is_rtf_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

/// Identify an image format from its leading signature bytes.
///
/// Only formats that RTF producers embed in `\pict` groups are recognised.
/// Anything else returns `None` and is treated as noise by the parser.
pub fn detect_image_format(data: &[u8]) -> Option<ImageFormat> {
    // PNG: 89 50 4E 47
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return Some(ImageFormat::Png);
    }

    // JPEG: FF D8 FF
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some(ImageFormat::Jpeg);
    }

    // GIF: "GIF8"
    if data.starts_with(&[0x47, 0x49, 0x46, 0x38]) {
        return Some(ImageFormat::Gif);
    }

    // Placeable WMF: D7 CD C6 9A
    if data.starts_with(&[0xD7, 0xCD, 0xC6, 0x9A]) {
        return Some(ImageFormat::Wmf);
    }

    // Standard WMF header (memory / disk metafile), as written by \wmetafile8
    if data.starts_with(&[0x01, 0x00, 0x09, 0x00]) || data.starts_with(&[0x02, 0x00, 0x09, 0x00])
    {
        return Some(ImageFormat::Wmf);
    }

    // EMF: EMR_HEADER record type 1
    if data.starts_with(&[0x01, 0x00, 0x00, 0x00]) {
        return Some(ImageFormat::Emf);
    }

    // BMP: "BM"
    if data.starts_with(&[0x42, 0x4D]) {
        return Some(ImageFormat::Bmp);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_valid_rtf() {
        let data = b"{\\rtf1\\ansi\\deff0 Hello}";
        let format = detect_format_from_bytes(data).unwrap();
        assert_eq!(format.version, 1);
    }

    #[test]
    fn test_detect_leading_whitespace_and_bom() {
        let data = b"\xEF\xBB\xBF\r\n{\\rtf1 x}";
        assert!(detect_format_from_bytes(data).is_ok());
    }

    #[test]
    fn test_detect_invalid_format() {
        let result = detect_format_from_bytes(b"%PDF-1.7");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_too_short() {
        assert!(matches!(
            detect_format_from_bytes(b"{\\rt"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(
            detect_format_from_bytes(b""),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_detect_unsupported_version() {
        let result = detect_format_from_bytes(b"{\\rtf2 x}");
        assert!(matches!(result, Err(Error::UnsupportedVersion(v)) if v == "2"));
    }

    #[test]
    fn test_is_rtf_bytes() {
        assert!(is_rtf_bytes(b"{\\rtf1}"));
        assert!(!is_rtf_bytes(b"Not an RTF file"));
    }

    #[test]
    fn test_detect_image_signatures() {
        assert_eq!(
            detect_image_format(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            detect_image_format(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(detect_image_format(b"GIF89a"), Some(ImageFormat::Gif));
        assert_eq!(detect_image_format(b"BM\x00\x00"), Some(ImageFormat::Bmp));
        assert_eq!(
            detect_image_format(&[0xD7, 0xCD, 0xC6, 0x9A]),
            Some(ImageFormat::Wmf)
        );
        assert_eq!(
            detect_image_format(&[0x01, 0x00, 0x09, 0x00, 0x00, 0x03]),
            Some(ImageFormat::Wmf)
        );
        assert_eq!(
            detect_image_format(&[0x01, 0x00, 0x00, 0x00, 0x6C]),
            Some(ImageFormat::Emf)
        );
        assert_eq!(detect_image_format(b"hello world"), None);
        assert_eq!(detect_image_format(&[]), None);
    }
}
