//! RTF document parser.

use std::io::Read;

use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};
use crate::model::{Document, ParseStats};

use super::builder::DocumentBuilder;
use super::destination::{Destination, DestinationTracker};
use super::info::InfoCollector;
use super::options::{ErrorMode, ParseOptions};
use super::picture::PictureCollector;
use super::tokenizer::{Token, TokenKind, Tokenizer};

/// RTF document parser.
///
/// Holds the decoded source text; [`RtfParser::parse`] runs the single
/// tokenize-and-build pass and can be called any number of times.
pub struct RtfParser {
    text: String,
    options: ParseOptions,
}

impl RtfParser {
    /// Parse RTF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse RTF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::InvalidArgument("input is empty".to_string()));
        }
        if options.error_mode == ErrorMode::Strict {
            detect_format_from_bytes(data)?;
        }
        Ok(Self {
            text: decode_source(data),
            options,
        })
    }

    /// Parse RTF from a string.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::from_bytes(text.as_bytes())
    }

    /// Parse RTF from a string with custom options.
    pub fn from_text_with_options(text: &str, options: ParseOptions) -> Result<Self> {
        Self::from_bytes_with_options(text.as_bytes(), options)
    }

    /// Parse RTF from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Parse RTF from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Options this parser runs with.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse the document and return a structured Document.
    pub fn parse(&self) -> Result<Document> {
        let mut run = ParseRun::new(&self.options);
        for token in Tokenizer::new(&self.text) {
            if self.options.is_cancelled() {
                return Err(Error::Cancelled);
            }
            run.feed(token)?;
        }
        Ok(run.finish())
    }
}

/// Decode source bytes: UTF-8 when valid, otherwise byte-per-char Latin-1.
fn decode_source(data: &[u8]) -> String {
    let data = data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data);
    match std::str::from_utf8(data) {
        Ok(text) => text.to_string(),
        Err(_) => data.iter().map(|&b| char::from(b)).collect(),
    }
}

/// State of one pass over the token stream.
struct ParseRun<'a> {
    options: &'a ParseOptions,
    tracker: DestinationTracker,
    builder: DocumentBuilder,
    pictures: PictureCollector,
    info: InfoCollector,
    tokens: usize,
}

impl<'a> ParseRun<'a> {
    fn new(options: &'a ParseOptions) -> Self {
        Self {
            options,
            tracker: DestinationTracker::new(),
            builder: DocumentBuilder::new(options.normalize_unicode),
            pictures: PictureCollector::new(options.extract_images),
            info: InfoCollector::new(),
            tokens: 0,
        }
    }

    fn feed(&mut self, token: Token) -> Result<()> {
        self.tokens += 1;
        match token.kind {
            TokenKind::GroupStart => {
                self.builder.group_start();
                self.tracker.group_start();
            }
            TokenKind::GroupEnd => self.group_end()?,
            TokenKind::ControlSymbol => self.control_symbol(&token),
            TokenKind::ControlWord => self.control_word(&token),
            TokenKind::Text => self.text(&token.text),
        }
        Ok(())
    }

    fn group_end(&mut self) -> Result<()> {
        let exit = self.tracker.group_end();
        if exit.closes_picture() {
            self.pictures
                .finish_picture(self.builder.element_count(), self.options)?;
        }
        if exit.left == Destination::Info {
            self.info.group_end();
        }
        self.pictures.group_closed(self.tracker.depth());
        self.builder.group_end();
        Ok(())
    }

    fn control_symbol(&mut self, token: &Token) {
        if token.text == "*" {
            self.tracker.mark_ignorable();
            return;
        }
        match self.tracker.current() {
            Destination::Normal => self.builder.on_symbol(token),
            Destination::Info => {
                if let Some(byte) = token.hex_byte() {
                    let text = self.builder.decode_byte(byte);
                    self.info.on_text(&text);
                }
            }
            _ => {}
        }
    }

    fn control_word(&mut self, token: &Token) {
        match token.text.as_str() {
            "shppict" => {
                self.pictures.begin_figure(self.tracker.depth());
                return;
            }
            "nonshppict" => {
                self.pictures.begin_fallback(self.tracker.depth());
                return;
            }
            _ => {}
        }

        if self.tracker.on_control_word(&token.text) {
            if self.tracker.current() == Destination::Picture {
                self.pictures.start_picture();
            }
            return;
        }

        match self.tracker.current() {
            Destination::Picture => self.pictures.on_control_word(token),
            Destination::Info => self.info.on_control_word(token),
            Destination::Normal => {
                self.pictures.settle();
                self.builder.on_control_word(token);
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        match self.tracker.current() {
            Destination::Picture => self.pictures.push_hex(text),
            Destination::Info => self.info.on_text(text),
            Destination::Normal => {
                if !text.trim().is_empty() {
                    self.pictures.settle();
                }
                self.builder.on_text(text);
            }
            _ => {}
        }
    }

    fn finish(mut self) -> Document {
        self.pictures.abandon();
        let unclosed = self.tracker.finish();

        let images_discarded = self.pictures.discarded();
        let images = self.pictures.into_images();
        let built = self.builder.finish();

        let mut metadata = self.info.into_metadata();
        metadata.rtf_version = built.header.rtf_version;
        metadata.charset = built.header.charset;
        metadata.code_page = built.header.code_page;

        let stats = ParseStats {
            tokens: self.tokens,
            groups_opened: self.tracker.pushes(),
            groups_closed: self.tracker.pops(),
            max_depth: self.tracker.max_depth(),
            unmatched_closes: self.tracker.unmatched_closes(),
            unclosed_groups: unclosed,
            images_extracted: images.len(),
            images_discarded,
            artifacts_filtered: built.artifacts_filtered,
            rows_rejected: built.rows_rejected,
        };

        Document {
            metadata,
            elements: built.elements,
            images,
            stats,
        }
    }
}
