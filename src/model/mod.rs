//! Document model types for RTF content representation.
//!
//! The parser produces a [`Document`]: a flat, ordered list of
//! [`DocumentElement`]s plus the pictures found along the way. The atom
//! adapter turns that document into [`Atom`] records, the uniform output
//! shared by every document processor.

mod atom;
mod document;
mod element;
mod image;
mod table;

pub use atom::{Atom, AtomPayload, AtomType, BinaryData, ContentHash};
pub use document::{Block, Document, Metadata, ParseStats};
pub use element::{DocumentElement, ElementType};
pub use image::{EmbeddedImage, ImageFormat};
pub use table::TableData;
