//! RTF parsing module.
//!
//! One pass over the token stream drives four consumers: the destination
//! tracker decides what is visible, the document builder reconstructs
//! elements, the picture collector decodes images and the info collector
//! reads metadata.

mod builder;
mod context;
mod destination;
mod info;
mod markers;
mod options;
mod picture;
mod rtf_parser;
mod tokenizer;

pub use builder::{BuildOutput, DocumentBuilder, HeaderInfo};
pub use destination::{Destination, DestinationTracker, GroupExit};
pub use markers::{is_artifact, MarkerKind, MarkerPatterns};
pub use options::{CancellationFlag, ErrorMode, ParseOptions};
pub use picture::PictureCollector;
pub use rtf_parser::RtfParser;
pub use tokenizer::{tokenize, Token, TokenKind, Tokenizer};
