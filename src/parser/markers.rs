//! List marker recognition.

use regex::Regex;

/// Glyphs producers use as bullet markers.
///
/// `o` is Word's level-two bullet (Courier New), `\u{F0B7}` is the Symbol
/// font bullet when the font mapping is lost.
const BULLET_GLYPHS: &[&str] = &[
    "•", "·", "▪", "▫", "◦", "‣", "○", "●", "■", "□", "➢", "➤", "►", "✓", "§", "-", "*", "o",
    "\u{F0B7}", "\u{F0A7}",
];

/// Substrings that mark preamble text leaking into a list.
const LEAK_PHRASES: &[&str] = &["header", "table", "follows here", "picture"];

/// Kind of an accepted list marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// Bullet glyph
    Bullet,
    /// Number or letter followed by `.` or `)`
    Ordered,
}

impl MarkerKind {
    /// Whether lists introduced by this marker are ordered.
    pub fn is_ordered(&self) -> bool {
        matches!(self, MarkerKind::Ordered)
    }
}

/// Compiled marker patterns.
pub struct MarkerPatterns {
    ordered_marker: Regex,
    ordered_item: Regex,
    bullet_item: Regex,
    leading_marker: Regex,
}

impl MarkerPatterns {
    /// Compile the marker patterns.
    pub fn new() -> Self {
        Self {
            ordered_marker: Regex::new(r"^(?:\d{1,3}|[a-zA-Z])[.)]$").unwrap(),
            ordered_item: Regex::new(r"^(?:\d{1,3}|[a-zA-Z])[.)]\s+\S").unwrap(),
            bullet_item: Regex::new(r"^[•*\-·▪◦●■]\s+\S").unwrap(),
            leading_marker: Regex::new(
                r"^\s*(?:[•·▪▫◦‣○●■□➢➤►✓§*\-o\x{F0B7}\x{F0A7}]|\d{1,3}[.)]|[a-zA-Z][.)])\s+",
            )
            .unwrap(),
        }
    }

    /// Classify a fragment captured inside `\listtext` as a marker.
    pub fn classify(&self, candidate: &str) -> Option<MarkerKind> {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return None;
        }
        if BULLET_GLYPHS.contains(&candidate) {
            Some(MarkerKind::Bullet)
        } else if self.ordered_marker.is_match(candidate) {
            Some(MarkerKind::Ordered)
        } else {
            None
        }
    }

    /// Detect paragraph text that is a list item with its marker written as
    /// plain text, such as `"1. Alpha"` or `"- Beta"`.
    pub fn implicit_item(&self, text: &str) -> Option<MarkerKind> {
        let text = text.trim_start();
        if self.ordered_item.is_match(text) {
            Some(MarkerKind::Ordered)
        } else if self.bullet_item.is_match(text) {
            Some(MarkerKind::Bullet)
        } else {
            None
        }
    }

    /// Remove one leading marker from item text.
    pub fn strip<'a>(&self, item: &'a str) -> &'a str {
        match self.leading_marker.find(item) {
            Some(m) => &item[m.end()..],
            None => item.trim_start(),
        }
    }
}

impl Default for MarkerPatterns {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a fragment looks like section or table preamble that leaked into
/// a list, or is too short to be an item.
pub fn is_leaked_fragment(text: &str) -> bool {
    let text = text.trim();
    if text.chars().count() <= 2 {
        return true;
    }
    let lower = text.to_lowercase();
    LEAK_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// Whether a finished paragraph is markup residue rather than content.
pub fn is_artifact(text: &str) -> bool {
    let text = text.trim();
    if text.chars().count() <= 2 {
        return true;
    }
    text.chars().all(|c| {
        c.is_ascii_digit()
            || c.is_ascii_punctuation()
            || c.is_whitespace()
            || (c != 'o' && is_bullet_char(c))
    })
}

fn is_bullet_char(c: char) -> bool {
    BULLET_GLYPHS
        .iter()
        .any(|glyph| glyph.chars().eq(std::iter::once(c)))
}
