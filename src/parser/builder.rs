//! Document builder.
//!
//! Consumes the body-visible part of the token stream and reconstructs flat
//! structural elements: paragraphs, headings, lists and tables.
//!
//! Adjacent text-producing tokens (text runs, `\'XX` escapes, `\u`, special
//! characters) are merged into one fragment. The fragment is routed when a
//! structural token arrives, so a marker or list item split across escapes is
//! still seen as a whole.

use unicode_normalization::UnicodeNormalization;

use crate::model::{DocumentElement, ElementType};

use super::context::ParseContext;
use super::markers::{is_artifact, is_leaked_fragment, MarkerKind, MarkerPatterns};
use super::tokenizer::Token;

/// Cells at least this long are dropped from their row.
const MAX_CELL_CHARS: usize = 200;

/// Rows with more cells than this are rejected as malformed.
const MAX_ROW_CELLS: usize = 10;

/// Cell text at least this long that reads like prose ends the table.
const PROSE_IN_CELL_CHARS: usize = 100;

/// Control words the builder acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ControlWord {
    Par,
    Pard,
    Plain,
    Line,
    Tab,
    Style(i32),
    OutlineLevel(i32),
    ListText,
    ListStyle(i32),
    ListLevel(i32),
    RowDefaults,
    CellBoundary,
    Cell,
    NestCell,
    Row,
    InTable,
    HardBreak,
    Bullet,
    Special(char),
    Bold(bool),
    Italic(bool),
    Hidden(bool),
    Font(i32),
    FontSize(i32),
    UnicodeSkip(i32),
    Unicode(i32),
    Charset(&'static str, Option<u16>),
    CodePage(i32),
    Version(i32),
}

impl ControlWord {
    fn lookup(name: &str, param: Option<i32>) -> Option<Self> {
        let toggle = param != Some(0);
        let word = match (name, param) {
            ("par", _) => ControlWord::Par,
            ("pard", _) => ControlWord::Pard,
            ("plain", _) => ControlWord::Plain,
            ("line", _) => ControlWord::Line,
            ("tab", _) => ControlWord::Tab,
            ("s", Some(n)) => ControlWord::Style(n),
            ("outlinelevel", Some(n)) => ControlWord::OutlineLevel(n),
            ("listtext" | "pntext", _) => ControlWord::ListText,
            ("ls", Some(n)) => ControlWord::ListStyle(n),
            ("ilvl", Some(n)) => ControlWord::ListLevel(n),
            ("trowd", _) => ControlWord::RowDefaults,
            ("cellx", _) => ControlWord::CellBoundary,
            ("cell", _) => ControlWord::Cell,
            ("nestcell", _) => ControlWord::NestCell,
            ("row" | "nestrow", _) => ControlWord::Row,
            ("intbl", _) => ControlWord::InTable,
            ("sect" | "page" | "column", _) => ControlWord::HardBreak,
            ("bullet", _) => ControlWord::Bullet,
            ("emdash", _) => ControlWord::Special('\u{2014}'),
            ("endash", _) => ControlWord::Special('\u{2013}'),
            ("lquote", _) => ControlWord::Special('\u{2018}'),
            ("rquote", _) => ControlWord::Special('\u{2019}'),
            ("ldblquote", _) => ControlWord::Special('\u{201C}'),
            ("rdblquote", _) => ControlWord::Special('\u{201D}'),
            ("emspace" | "enspace" | "qmspace", _) => ControlWord::Special(' '),
            ("b", _) => ControlWord::Bold(toggle),
            ("i", _) => ControlWord::Italic(toggle),
            ("v", _) => ControlWord::Hidden(toggle),
            ("f", Some(n)) => ControlWord::Font(n),
            ("fs", Some(n)) => ControlWord::FontSize(n),
            ("uc", Some(n)) => ControlWord::UnicodeSkip(n),
            ("u", Some(n)) => ControlWord::Unicode(n),
            ("ansi", _) => ControlWord::Charset("ansi", Some(1252)),
            ("mac", _) => ControlWord::Charset("mac", Some(10000)),
            ("pc", _) => ControlWord::Charset("pc", Some(437)),
            ("pca", _) => ControlWord::Charset("pca", Some(850)),
            ("ansicpg", Some(n)) => ControlWord::CodePage(n),
            ("rtf", Some(n)) => ControlWord::Version(n),
            _ => return None,
        };
        Some(word)
    }

    /// Words that do not end the current text fragment.
    fn is_inline(&self) -> bool {
        matches!(
            self,
            ControlWord::Line
                | ControlWord::Tab
                | ControlWord::Bullet
                | ControlWord::Special(_)
                | ControlWord::Unicode(_)
                | ControlWord::Bold(_)
                | ControlWord::Italic(_)
                | ControlWord::Hidden(_)
                | ControlWord::Font(_)
                | ControlWord::FontSize(_)
                | ControlWord::UnicodeSkip(_)
        )
    }
}

/// Values read from the RTF header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderInfo {
    pub rtf_version: Option<u8>,
    pub charset: Option<String>,
    pub code_page: Option<u16>,
}

/// Everything the builder produced.
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    pub elements: Vec<DocumentElement>,
    pub header: HeaderInfo,
    pub artifacts_filtered: usize,
    pub rows_rejected: usize,
}

/// Reconstructs structural elements from body tokens.
pub struct DocumentBuilder {
    ctx: ParseContext,
    markers: MarkerPatterns,
    normalize_unicode: bool,
    output: BuildOutput,
}

impl DocumentBuilder {
    /// Create a builder.
    pub fn new(normalize_unicode: bool) -> Self {
        Self {
            ctx: ParseContext::new(),
            markers: MarkerPatterns::new(),
            normalize_unicode,
            output: BuildOutput::default(),
        }
    }

    /// Number of elements emitted so far.
    pub fn element_count(&self) -> usize {
        self.output.elements.len()
    }

    /// Decode a single `\'XX` byte with the document code page.
    pub fn decode_byte(&self, byte: u8) -> String {
        self.ctx.decoder.decode_byte(byte)
    }

    /// Handle `{`.
    pub fn group_start(&mut self) {
        self.flush_fragment();
        self.ctx.push_props();
    }

    /// Handle `}`.
    pub fn group_end(&mut self) {
        self.flush_fragment();
        self.ctx.skip_fallback = 0;
        self.ctx.pop_props();
        if self.ctx.list.in_marker && self.ctx.depth() < self.ctx.list.marker_depth {
            self.ctx.list.in_marker = false;
        }
    }

    /// Handle a literal text run.
    pub fn on_text(&mut self, text: &str) {
        self.flush_bytes();
        let text = self.skip_fallback_chars(text);
        self.push_fragment(text);
    }

    /// Handle a control symbol.
    pub fn on_symbol(&mut self, token: &Token) {
        if let Some(byte) = token.hex_byte() {
            self.on_escaped_byte(byte);
            return;
        }
        self.flush_bytes();
        match token.text.as_str() {
            "~" => self.push_fragment(" "),
            "_" => self.push_fragment("-"),
            "\\" | "{" | "}" => self.push_fragment(&token.text),
            "\n" | "\r" => {
                self.flush_fragment();
                self.paragraph_break();
            }
            // Optional hyphen, index and formula markers carry no text.
            _ => {}
        }
    }

    /// Handle a control word. Unknown words are ignored.
    pub fn on_control_word(&mut self, token: &Token) {
        let Some(word) = ControlWord::lookup(&token.text, token.param) else {
            return;
        };

        self.flush_bytes();
        if !word.is_inline() {
            self.flush_fragment();
        }

        match word {
            ControlWord::Par => self.paragraph_break(),
            ControlWord::Pard => self.ctx.props.para = Default::default(),
            ControlWord::Plain => {
                let unicode_skip = self.ctx.props.chars.unicode_skip;
                self.ctx.props.chars = Default::default();
                self.ctx.props.chars.unicode_skip = unicode_skip;
            }
            ControlWord::Line => self.push_fragment(" "),
            ControlWord::Tab => {
                if self.ctx.list.in_marker {
                    self.flush_fragment();
                    self.ctx.list.in_marker = false;
                } else {
                    self.push_fragment(" ");
                }
            }
            ControlWord::Style(n) => {
                self.ctx.props.para.style = Some(n);
                if (1..=3).contains(&n) {
                    self.ctx.props.para.outline_level = Some((n - 1) as u8);
                }
            }
            ControlWord::OutlineLevel(n) => {
                self.ctx.props.para.outline_level = u8::try_from(n).ok().filter(|l| *l <= 8);
            }
            ControlWord::ListText => {
                self.ctx.list.in_marker = true;
                self.ctx.list.in_sequence = true;
                self.ctx.list.marker_depth = self.ctx.depth();
            }
            ControlWord::ListStyle(id) => self.set_list_style(id),
            ControlWord::ListLevel(level) => self.ctx.props.para.list_level = Some(level),
            ControlWord::RowDefaults => {
                if !self.ctx.table.active {
                    self.start_table();
                } else if !self.ctx.table.row.is_empty()
                    || !self.ctx.table.cell.trim().is_empty()
                {
                    log::debug!("Row definition without \\row, committing open row");
                    self.end_row();
                }
                self.ctx.props.para.in_table = true;
                self.ctx.table.declared_cells = 0;
            }
            ControlWord::CellBoundary => self.ctx.table.declared_cells += 1,
            ControlWord::Cell => self.end_cell(),
            ControlWord::NestCell => self.ctx.table.cell.push(' '),
            ControlWord::Row => self.end_row(),
            ControlWord::InTable => self.ctx.props.para.in_table = true,
            ControlWord::HardBreak => self.hard_break(),
            ControlWord::Bullet => self.on_bullet(),
            ControlWord::Special(c) => {
                let mut buf = [0u8; 4];
                self.push_fragment(c.encode_utf8(&mut buf));
            }
            ControlWord::Bold(on) => self.ctx.props.chars.bold = on,
            ControlWord::Italic(on) => self.ctx.props.chars.italic = on,
            ControlWord::Hidden(on) => self.ctx.props.chars.hidden = on,
            ControlWord::Font(n) => self.ctx.props.chars.font = Some(n),
            ControlWord::FontSize(n) => self.ctx.props.chars.font_size = Some(n),
            ControlWord::UnicodeSkip(n) => {
                self.ctx.props.chars.unicode_skip = usize::try_from(n).unwrap_or(0);
            }
            ControlWord::Unicode(n) => self.on_unicode(n),
            ControlWord::Charset(name, code_page) => {
                self.output.header.charset = Some(name.to_string());
                if let Some(code_page) = code_page {
                    self.ctx.decoder.set_code_page(code_page);
                }
            }
            ControlWord::CodePage(n) => {
                if let Ok(code_page) = u16::try_from(n) {
                    self.output.header.code_page = Some(code_page);
                    self.ctx.decoder.set_code_page(code_page);
                }
            }
            ControlWord::Version(n) => {
                self.output.header.rtf_version = u8::try_from(n).ok();
            }
        }
    }

    /// Flush every open accumulator and return the result.
    pub fn finish(mut self) -> BuildOutput {
        self.flush_bytes();
        self.flush_fragment();
        self.paragraph_break();
        self.flush_list();
        self.close_table();
        self.output
    }

    // --- text assembly ---

    fn push_fragment(&mut self, text: &str) {
        if self.ctx.props.chars.hidden || text.is_empty() {
            return;
        }
        self.ctx.fragment.push_str(text);
    }

    fn flush_bytes(&mut self) {
        if self.ctx.decoder.has_pending() {
            let text = self.ctx.decoder.flush();
            self.push_fragment(&text);
        }
    }

    fn skip_fallback_chars<'t>(&mut self, text: &'t str) -> &'t str {
        if self.ctx.skip_fallback == 0 {
            return text;
        }
        let mut chars = text.char_indices();
        let mut cut = text.len();
        for _ in 0..self.ctx.skip_fallback {
            match chars.next() {
                Some(_) => self.ctx.skip_fallback -= 1,
                None => break,
            }
        }
        if let Some((index, _)) = chars.next() {
            cut = index;
        }
        &text[cut..]
    }

    fn on_escaped_byte(&mut self, byte: u8) {
        if self.ctx.skip_fallback > 0 {
            self.ctx.skip_fallback -= 1;
            return;
        }
        if byte == 0xB7 && self.bullet_is_marker() {
            self.flush_bytes();
            self.on_bullet();
            return;
        }
        if !self.ctx.props.chars.hidden {
            self.ctx.decoder.push(byte);
        }
    }

    fn on_unicode(&mut self, code: i32) {
        let code = if code < 0 { code + 65536 } else { code };
        if let Some(c) = u32::try_from(code).ok().and_then(char::from_u32) {
            let mut buf = [0u8; 4];
            self.push_fragment(c.encode_utf8(&mut buf));
        }
        self.ctx.skip_fallback = self.ctx.props.chars.unicode_skip;
    }

    fn bullet_is_marker(&self) -> bool {
        self.ctx.list.in_marker
            || (self.ctx.at_paragraph_start
                && self.ctx.fragment.trim().is_empty()
                && !self.ctx.in_cell())
    }

    fn on_bullet(&mut self) {
        if self.bullet_is_marker() {
            self.ctx.fragment.clear();
            self.accept_marker("•".to_string(), MarkerKind::Bullet);
        } else {
            self.push_fragment("\u{00B7}");
        }
    }

    fn flush_fragment(&mut self) {
        if self.ctx.fragment.is_empty() {
            return;
        }
        let fragment = std::mem::take(&mut self.ctx.fragment);
        self.route_text(fragment);
    }

    // --- routing ---

    fn route_text(&mut self, text: String) {
        if text.trim().is_empty() {
            self.append_space();
            return;
        }
        let at_start = std::mem::replace(&mut self.ctx.at_paragraph_start, false);

        if self.ctx.props.para.in_table && !self.ctx.table.active && !looks_like_prose(&text) {
            self.start_table();
        }
        if self.ctx.in_cell() {
            if looks_like_prose(&text) {
                log::debug!("Prose inside a table cell, closing table");
                self.close_table();
                self.ctx.props.para.in_table = false;
            } else {
                self.ctx.table.cell.push_str(&text);
                return;
            }
        } else if self.ctx.table.active {
            self.close_table();
        }

        if self.ctx.list.in_marker {
            match self.markers.classify(&text) {
                Some(kind) => self.accept_marker(text.trim().to_string(), kind),
                None => {
                    self.flush_list();
                    self.append_paragraph(&text);
                }
            }
            return;
        }

        let is_heading = self.ctx.props.para.outline_level.is_some();

        if self.ctx.list.is_engaged() || self.ctx.list.current_item.is_some() {
            if is_heading {
                self.flush_list();
                self.append_paragraph(&text);
                return;
            }
            if self.ctx.list.pending_marker.is_none() {
                if let Some(item) = self.ctx.list.current_item.as_mut() {
                    item.push_str(&text);
                    return;
                }
            }
            // First fragment of a new item.
            if is_leaked_fragment(&text) {
                log::debug!("Leaked fragment ends list: {:?}", text.trim());
                self.flush_list();
                self.append_paragraph(&text);
                return;
            }
            if let Some(marker) = self.ctx.list.pending_marker.take() {
                self.commit_item();
                self.ctx.list.current_item = Some(format!("{} {}", marker, text.trim_start()));
                self.ctx.list.current_marked = true;
                return;
            }
        }

        if at_start && !is_heading && self.ctx.text.is_empty() {
            if let Some(kind) = self.markers.implicit_item(&text) {
                self.start_implicit_item(&text, kind);
                return;
            }
            if self.ctx.props.para.list_id.is_some() {
                self.start_unmarked_item(&text);
                return;
            }
        }

        self.flush_list();
        self.append_paragraph(&text);
    }

    fn append_paragraph(&mut self, text: &str) {
        self.ctx.text.push_str(text);
    }

    fn append_space(&mut self) {
        if self.ctx.in_cell() {
            if !self.ctx.table.cell.is_empty() {
                self.ctx.table.cell.push(' ');
            }
        } else if let Some(item) = self.ctx.list.current_item.as_mut() {
            item.push(' ');
        } else if !self.ctx.text.is_empty() {
            self.ctx.text.push(' ');
        }
    }

    fn finish_text(&self, raw: &str) -> String {
        let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if self.normalize_unicode {
            collapsed.nfc().collect()
        } else {
            collapsed
        }
    }

    // --- paragraphs ---

    fn paragraph_break(&mut self) {
        if self.ctx.in_cell() {
            self.ctx.table.cell.push(' ');
            return;
        }
        if self.ctx.table.active {
            self.close_table();
        }
        self.commit_item();
        self.ctx.list.pending_marker = None;
        self.ctx.list.in_marker = false;
        self.flush_paragraph();
        self.ctx.props.para.outline_level = None;
        self.ctx.at_paragraph_start = true;
    }

    fn flush_paragraph(&mut self) {
        let raw = std::mem::take(&mut self.ctx.text);
        let text = self.finish_text(&raw);
        if text.is_empty() {
            return;
        }
        if is_artifact(&text) {
            log::trace!("Dropping artifact paragraph {:?}", text);
            self.output.artifacts_filtered += 1;
            return;
        }
        let element_type = ElementType::from_outline_level(self.ctx.props.para.outline_level);
        self.output
            .elements
            .push(DocumentElement::text_element(element_type, text));
    }

    fn hard_break(&mut self) {
        self.flush_list();
        self.close_table();
        self.flush_paragraph();
        self.ctx.at_paragraph_start = true;
    }

    // --- lists ---

    fn accept_marker(&mut self, marker: String, kind: MarkerKind) {
        let ordered = kind.is_ordered();
        if self.ctx.list.has_content() && self.ctx.list.ordered != ordered {
            self.emit_list();
        } else {
            self.commit_item();
        }
        if !self.ctx.text.is_empty() {
            self.flush_paragraph();
        }

        let list = &mut self.ctx.list;
        list.ordered = ordered;
        list.marker_seen = true;
        list.pending_marker = Some(marker);
        list.in_marker = false;
        list.in_sequence = true;
        if list.style_id.is_none() {
            list.style_id = self.ctx.props.para.list_id;
        }
    }

    fn start_implicit_item(&mut self, text: &str, kind: MarkerKind) {
        let ordered = kind.is_ordered();
        if self.ctx.list.has_content() && self.ctx.list.ordered != ordered {
            self.emit_list();
        } else {
            self.commit_item();
        }
        let list = &mut self.ctx.list;
        list.ordered = ordered;
        list.marker_seen = true;
        list.in_sequence = true;
        list.current_item = Some(text.trim_start().to_string());
        list.current_marked = true;
    }

    fn start_unmarked_item(&mut self, text: &str) {
        self.commit_item();
        let list_id = self.ctx.props.para.list_id;
        let list = &mut self.ctx.list;
        if list.style_id.is_none() {
            list.style_id = list_id;
            if !list.marker_seen {
                list.ordered = list_id.is_some_and(|id| id > 1);
            }
        }
        list.in_sequence = true;
        list.current_item = Some(text.trim_start().to_string());
        list.current_marked = false;
    }

    fn set_list_style(&mut self, id: i32) {
        let list = &self.ctx.list;
        if list.has_content() && list.style_id.is_some_and(|current| current != id) {
            log::debug!("List style changed to {}, finishing previous list", id);
            self.emit_list();
        }
        self.ctx.props.para.list_id = Some(id);
        let list = &mut self.ctx.list;
        list.style_id = Some(id);
        if !list.marker_seen {
            list.ordered = id > 1;
        }
    }

    fn commit_item(&mut self) {
        if let Some(item) = self.ctx.list.current_item.take() {
            let item = self.finish_text(&item);
            if !item.is_empty() {
                self.ctx.list.items.push(item);
                self.ctx.list.marked.push(self.ctx.list.current_marked);
            }
        }
    }

    /// Emit accumulated items as a list element, keeping list mode.
    fn emit_list(&mut self) {
        self.commit_item();
        let items = std::mem::take(&mut self.ctx.list.items);
        let marked = std::mem::take(&mut self.ctx.list.marked);
        if !items.is_empty() {
            log::debug!("Emitting list with {} item(s)", items.len());
            self.output.elements.push(DocumentElement::list_with_markers(
                items,
                marked,
                self.ctx.list.ordered,
            ));
        }
        self.ctx.list.marker_seen = false;
    }

    /// Emit accumulated items and leave list mode.
    fn flush_list(&mut self) {
        self.emit_list();
        self.ctx.list = Default::default();
    }

    // --- tables ---

    fn start_table(&mut self) {
        self.flush_list();
        self.flush_paragraph();
        self.ctx.table.active = true;
    }

    fn end_cell(&mut self) {
        if !self.ctx.table.active {
            self.start_table();
        }
        let raw = std::mem::take(&mut self.ctx.table.cell);
        let cell = self.finish_text(&raw);
        self.ctx.table.row.push(cell);
    }

    fn end_row(&mut self) {
        if !self.ctx.table.active {
            if self.ctx.table.row.is_empty() && self.ctx.table.cell.trim().is_empty() {
                return;
            }
            self.ctx.table.active = true;
        }
        let raw = std::mem::take(&mut self.ctx.table.cell);
        let trailing = self.finish_text(&raw);
        let table = &mut self.ctx.table;
        let mut cells = std::mem::take(&mut table.row);
        if !trailing.is_empty() {
            cells.push(trailing);
        }

        cells.retain(|cell| cell.chars().count() < MAX_CELL_CHARS);
        if cells.len() > MAX_ROW_CELLS {
            log::debug!("Rejecting table row with {} cells", cells.len());
            self.output.rows_rejected += 1;
            return;
        }
        if cells.iter().all(String::is_empty) {
            return;
        }
        if cells.len() < table.declared_cells {
            cells.resize(table.declared_cells, String::new());
        }
        table.rows.push(cells);
    }

    fn close_table(&mut self) {
        if !self.ctx.table.active {
            return;
        }
        if !self.ctx.table.row.is_empty() {
            self.end_row();
        } else if !self.ctx.table.cell.trim().is_empty() {
            let leftover = std::mem::take(&mut self.ctx.table.cell);
            self.ctx.text.push_str(&leftover);
        }
        let rows = self.ctx.table.take_rows();
        if !rows.is_empty() {
            log::debug!("Closing table with {} row(s)", rows.len());
            self.output.elements.push(DocumentElement::table(rows));
        }
    }
}

fn looks_like_prose(text: &str) -> bool {
    text.chars().count() > PROSE_IN_CELL_CHARS
        && [". ", "? ", "! "].iter().any(|p| text.contains(p))
}
