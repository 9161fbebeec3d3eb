//! Rendering module for converting documents and atoms to output formats.

mod json;
mod text;

pub use json::{atoms_to_json, to_json, JsonFormat};
pub use text::to_text;
