//! Per-parse mutable state.

use encoding_rs::Encoding;

/// Character formatting, scoped to RTF groups.
#[derive(Debug, Clone)]
pub struct CharProps {
    pub bold: bool,
    pub italic: bool,
    /// `\v`: hidden text is dropped
    pub hidden: bool,
    pub font: Option<i32>,
    /// Font size in half-points
    pub font_size: Option<i32>,
    /// Fallback characters to skip after `\u`
    pub unicode_skip: usize,
}

impl Default for CharProps {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            hidden: false,
            font: None,
            font_size: None,
            unicode_skip: 1,
        }
    }
}

/// Paragraph properties, scoped to RTF groups and reset by `\pard`.
#[derive(Debug, Clone, Default)]
pub struct ParaProps {
    pub style: Option<i32>,
    pub outline_level: Option<u8>,
    /// `\lsN` list membership
    pub list_id: Option<i32>,
    /// `\ilvlN` nesting level (tracked only; output lists are flat)
    pub list_level: Option<i32>,
    /// `\intbl`
    pub in_table: bool,
}

/// Formatting state saved on `{` and restored on `}`.
#[derive(Debug, Clone, Default)]
pub struct Props {
    pub chars: CharProps,
    pub para: ParaProps,
}

/// List accumulation state. Not group scoped.
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// List style id the accumulated items belong to
    pub style_id: Option<i32>,
    /// Capturing a marker (inside `\listtext`)
    pub in_marker: bool,
    /// Group depth at which marker capture started
    pub marker_depth: usize,
    /// Inside a run of list paragraphs
    pub in_sequence: bool,
    /// Accepted marker waiting for item text
    pub pending_marker: Option<String>,
    pub ordered: bool,
    /// Ordered-ness was decided by a marker rather than the style id
    pub marker_seen: bool,
    /// Item being built
    pub current_item: Option<String>,
    /// The item being built starts with a marker
    pub current_marked: bool,
    /// Finished items
    pub items: Vec<String>,
    /// Per finished item, whether it starts with a marker
    pub marked: Vec<bool>,
}

impl ListState {
    /// Whether any list content is waiting to be flushed.
    pub fn has_content(&self) -> bool {
        !self.items.is_empty() || self.current_item.is_some()
    }

    /// Whether text should be routed through list handling.
    pub fn is_engaged(&self) -> bool {
        self.in_marker || self.in_sequence || self.pending_marker.is_some()
    }
}

/// Table accumulation state. Not group scoped.
#[derive(Debug, Clone, Default)]
pub struct TableState {
    pub active: bool,
    /// `\cellx` count since the last `\trowd`
    pub declared_cells: usize,
    pub row: Vec<String>,
    pub cell: String,
    pub rows: Vec<Vec<String>>,
}

impl TableState {
    /// Reset to inactive and return the finished rows.
    pub fn take_rows(&mut self) -> Vec<Vec<String>> {
        let rows = std::mem::take(&mut self.rows);
        *self = TableState::default();
        rows
    }
}

/// Decodes `\'XX` bytes with the document code page.
///
/// Consecutive escapes are buffered so multibyte code pages decode whole
/// characters.
#[derive(Debug)]
pub struct ByteDecoder {
    encoding: &'static Encoding,
    pending: Vec<u8>,
}

impl Default for ByteDecoder {
    fn default() -> Self {
        Self {
            encoding: encoding_rs::WINDOWS_1252,
            pending: Vec::new(),
        }
    }
}

impl ByteDecoder {
    /// Switch code page; unknown code pages keep the current encoding.
    pub fn set_code_page(&mut self, code_page: u16) -> bool {
        match codepage_to_encoding(code_page) {
            Some(encoding) => {
                self.encoding = encoding;
                true
            }
            None => {
                log::debug!("Unsupported code page {}, keeping {}", code_page, self.encoding.name());
                false
            }
        }
    }

    /// Active encoding.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Buffer one escaped byte.
    pub fn push(&mut self, byte: u8) {
        self.pending.push(byte);
    }

    /// Whether bytes are buffered.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Decode and clear the buffered bytes.
    pub fn flush(&mut self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }
        let (text, _) = self.encoding.decode_without_bom_handling(&self.pending);
        let text = text.into_owned();
        self.pending.clear();
        text
    }

    /// Decode a single byte without touching the buffer.
    pub fn decode_byte(&self, byte: u8) -> String {
        let bytes = [byte];
        let (text, _) = self.encoding.decode_without_bom_handling(&bytes);
        text.into_owned()
    }
}

/// Map a Windows/Mac code page number to an encoding.
pub fn codepage_to_encoding(code_page: u16) -> Option<&'static Encoding> {
    let encoding = match code_page {
        874 => encoding_rs::WINDOWS_874,
        932 => encoding_rs::SHIFT_JIS,
        936 => encoding_rs::GBK,
        949 => encoding_rs::EUC_KR,
        950 => encoding_rs::BIG5,
        866 => encoding_rs::IBM866,
        1250 => encoding_rs::WINDOWS_1250,
        1251 => encoding_rs::WINDOWS_1251,
        1252 | 20127 | 28591 => encoding_rs::WINDOWS_1252,
        1253 => encoding_rs::WINDOWS_1253,
        1254 => encoding_rs::WINDOWS_1254,
        1255 => encoding_rs::WINDOWS_1255,
        1256 => encoding_rs::WINDOWS_1256,
        1257 => encoding_rs::WINDOWS_1257,
        1258 => encoding_rs::WINDOWS_1258,
        10000 => encoding_rs::MACINTOSH,
        65001 => encoding_rs::UTF_8,
        _ => return None,
    };
    Some(encoding)
}

/// All mutable state of one parse.
#[derive(Debug, Default)]
pub struct ParseContext {
    /// Active formatting
    pub props: Props,
    /// Saved formatting of enclosing groups
    pub props_stack: Vec<Props>,
    pub list: ListState,
    pub table: TableState,
    /// Running paragraph text
    pub text: String,
    /// Text fragment being assembled from adjacent text-producing tokens
    pub fragment: String,
    /// No content has been routed since the last paragraph break
    pub at_paragraph_start: bool,
    /// Fallback characters still to skip after a `\u`
    pub skip_fallback: usize,
    pub decoder: ByteDecoder,
}

impl ParseContext {
    /// Create a fresh context.
    pub fn new() -> Self {
        Self {
            at_paragraph_start: true,
            ..Default::default()
        }
    }

    /// Save formatting on `{`.
    pub fn push_props(&mut self) {
        self.props_stack.push(self.props.clone());
    }

    /// Restore formatting on `}`. An unmatched `}` keeps the current state.
    pub fn pop_props(&mut self) {
        if let Some(props) = self.props_stack.pop() {
            self.props = props;
        }
    }

    /// Current group depth as seen by the formatting stack.
    pub fn depth(&self) -> usize {
        self.props_stack.len()
    }

    /// Whether text currently belongs to a table cell.
    pub fn in_cell(&self) -> bool {
        self.table.active && self.props.para.in_table
    }
}
