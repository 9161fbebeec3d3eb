//! Error types for unrtf library.

use std::io;
use thiserror::Error;

/// Result type alias for unrtf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during RTF processing.
///
/// Malformed markup is never an error: the parser recovers from bad
/// parameters, unbalanced braces and broken picture data on its own.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The caller supplied unusable input (e.g. an empty buffer).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The data does not start with an RTF header (strict mode only).
    #[error("Unknown file format: not a valid RTF document")]
    UnknownFormat,

    /// The RTF header names a version this library does not understand.
    #[error("Unsupported RTF version: {0}")]
    UnsupportedVersion(String),

    /// Parsing was cancelled through the cancellation flag.
    #[error("Parsing was cancelled")]
    Cancelled,

    /// The image processor failed on an embedded picture.
    #[error("Image processing error: {0}")]
    ImageProcess(String),

    /// Error during rendering (text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Cancelled;
        assert_eq!(err.to_string(), "Parsing was cancelled");

        let err = Error::InvalidArgument("input is empty".to_string());
        assert_eq!(err.to_string(), "Invalid argument: input is empty");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
