//! Parsing options and configuration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Options for parsing RTF documents.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Whether to decode embedded pictures
    pub extract_images: bool,

    /// Whether to apply Unicode NFC normalization to extracted text
    pub normalize_unicode: bool,

    /// Cooperative cancellation flag, checked once per token
    pub cancel: Option<CancellationFlag>,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (accept anything, recover from everything).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable strict mode (require an RTF header).
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Enable or disable picture extraction.
    pub fn with_images(mut self, extract: bool) -> Self {
        self.extract_images = extract;
        self
    }

    /// Enable or disable Unicode NFC normalization.
    pub fn with_unicode_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Attach a cancellation flag.
    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Whether the attached flag (if any) has been raised.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationFlag::is_cancelled)
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            extract_images: true,
            normalize_unicode: true,
            cancel: None,
        }
    }
}

/// Error handling mode during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Require an RTF header and surface collaborator failures
    Strict,
    /// Parse any input best-effort and log collaborator failures
    #[default]
    Lenient,
}

/// Shared flag used to cancel a running parse from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// Create a flag that is not raised.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check whether the flag has been raised.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new()
            .strict()
            .with_images(false)
            .with_unicode_normalization(false);

        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert!(!options.extract_images);
        assert!(!options.normalize_unicode);
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(options.extract_images);
        assert!(!options.is_cancelled());
    }

    #[test]
    fn test_cancellation_flag_is_shared() {
        let flag = CancellationFlag::new();
        let options = ParseOptions::new().with_cancellation(flag.clone());
        assert!(!options.is_cancelled());
        flag.cancel();
        assert!(options.is_cancelled());
    }
}
