//! RTF tokenizer.
//!
//! A single left-to-right scan that turns raw RTF text into a flat stream of
//! [`Token`]s. No semantic interpretation happens here: destinations,
//! paragraphs and tables are the concern of the layers above.

/// Kind of an RTF token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `\word` with an optional signed integer parameter
    ControlWord,
    /// `\` followed by a single non-letter, or `\'XX`
    ControlSymbol,
    /// A run of literal characters
    Text,
    /// `{`
    GroupStart,
    /// `}`
    GroupEnd,
}

/// A single RTF token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token kind
    pub kind: TokenKind,

    /// Word name (without `\`), symbol (`*`, `'b7`, `~`, ...) or literal text
    pub text: String,

    /// Control word parameter, if present and parseable
    pub param: Option<i32>,
}

impl Token {
    /// Create a control word token.
    pub fn control_word(name: impl Into<String>, param: Option<i32>) -> Self {
        Self {
            kind: TokenKind::ControlWord,
            text: name.into(),
            param,
        }
    }

    /// Create a control symbol token.
    pub fn control_symbol(symbol: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::ControlSymbol,
            text: symbol.into(),
            param: None,
        }
    }

    /// Create a text token.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Text,
            text: text.into(),
            param: None,
        }
    }

    /// Create a `{` token.
    pub fn group_start() -> Self {
        Self {
            kind: TokenKind::GroupStart,
            text: "{".to_string(),
            param: None,
        }
    }

    /// Create a `}` token.
    pub fn group_end() -> Self {
        Self {
            kind: TokenKind::GroupEnd,
            text: "}".to_string(),
            param: None,
        }
    }

    /// Check for a control word with the given name.
    pub fn is_word(&self, name: &str) -> bool {
        self.kind == TokenKind::ControlWord && self.text == name
    }

    /// For `\'XX` symbols, the escaped byte.
    pub fn hex_byte(&self) -> Option<u8> {
        if self.kind != TokenKind::ControlSymbol {
            return None;
        }
        let hex = self.text.strip_prefix('\'')?;
        if hex.len() != 2 {
            return None;
        }
        u8::from_str_radix(hex, 16).ok()
    }
}

/// Longest control word name the RTF grammar allows.
const MAX_WORD_LEN: usize = 32;

/// Streaming RTF tokenizer.
///
/// ```
/// use unrtf::parser::{Tokenizer, TokenKind};
///
/// let kinds: Vec<TokenKind> = Tokenizer::new(r"{\b bold}").map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     vec![TokenKind::GroupStart, TokenKind::ControlWord, TokenKind::Text, TokenKind::GroupEnd]
/// );
/// ```
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer over RTF text.
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn read_control(&mut self) -> Option<Token> {
        let c = self.peek()?;

        if c.is_ascii_alphabetic() {
            return Some(self.read_control_word());
        }

        self.bump();
        if c == '\'' {
            let mut symbol = String::from("'");
            for _ in 0..2 {
                match self.peek() {
                    Some(h) if h.is_ascii_hexdigit() => {
                        symbol.push(h);
                        self.bump();
                    }
                    _ => break,
                }
            }
            return Some(Token::control_symbol(symbol));
        }

        Some(Token::control_symbol(c.to_string()))
    }

    fn read_control_word(&mut self) -> Token {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !c.is_ascii_alphabetic() || self.pos - start >= MAX_WORD_LEN {
                break;
            }
            self.bump();
        }
        let name = self.input[start..self.pos].to_string();

        let param = self.read_parameter();

        // A single space delimits the word and belongs to it.
        if self.peek() == Some(' ') {
            self.bump();
        }

        Token::control_word(name, param)
    }

    fn read_parameter(&mut self) -> Option<i32> {
        let rest = &self.input[self.pos..];
        let negative = rest.starts_with('-');
        let digits_start = if negative { 1 } else { 0 };
        let digit_count = rest[digits_start..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();

        // A lone '-' is not a parameter; leave it for the text that follows.
        if digit_count == 0 {
            return None;
        }

        let end = digits_start + digit_count;
        let literal = &rest[..end];
        self.pos += end;
        // Out-of-range values are consumed but treated as absent.
        literal.parse::<i32>().ok()
    }

    fn read_text(&mut self) -> Option<Token> {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            match c {
                '\\' | '{' | '}' => break,
                '\r' | '\n' => {
                    self.bump();
                }
                _ => {
                    text.push(c);
                    self.bump();
                }
            }
        }

        if text.is_empty() {
            None
        } else if text.trim().is_empty() {
            // Spaces between formatting runs separate words.
            Some(Token::text(" "))
        } else {
            Some(Token::text(text))
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            let c = self.peek()?;
            match c {
                '{' => {
                    self.bump();
                    return Some(Token::group_start());
                }
                '}' => {
                    self.bump();
                    return Some(Token::group_end());
                }
                '\\' => {
                    self.bump();
                    // A trailing backslash at end of input is dropped.
                    if let Some(token) = self.read_control() {
                        return Some(token);
                    }
                }
                _ => {
                    if let Some(token) = self.read_text() {
                        return Some(token);
                    }
                }
            }
        }
    }
}

/// Tokenize a whole document into a flat token list.
pub fn tokenize(input: &str) -> Vec<Token> {
    Tokenizer::new(input).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_word_with_parameter() {
        let tokens = tokenize(r"\fs24\li-360 ");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0], Token::control_word("fs", Some(24)));
        assert_eq!(tokens[1], Token::control_word("li", Some(-360)));
    }

    #[test]
    fn test_delimiter_space_is_consumed() {
        let tokens = tokenize(r"\b Bold text");
        assert_eq!(tokens[0], Token::control_word("b", None));
        assert_eq!(tokens[1], Token::text("Bold text"));
    }

    #[test]
    fn test_only_one_delimiter_space_is_consumed() {
        let tokens = tokenize(r"\tab  indented");
        assert_eq!(tokens[1], Token::text(" indented"));
    }

    #[test]
    fn test_hex_escape_symbol() {
        let tokens = tokenize(r"caf\'e9 au lait");
        assert_eq!(tokens[0], Token::text("caf"));
        assert_eq!(tokens[1], Token::control_symbol("'e9"));
        assert_eq!(tokens[1].hex_byte(), Some(0xE9));
        assert_eq!(tokens[2], Token::text(" au lait"));
    }

    #[test]
    fn test_control_symbols() {
        let tokens = tokenize(r"{\*\generator x}\~\{");
        assert_eq!(tokens[1], Token::control_symbol("*"));
        assert_eq!(tokens[2], Token::control_word("generator", None));
        assert_eq!(tokens[5], Token::control_symbol("~"));
        assert_eq!(tokens[6], Token::control_symbol("{"));
    }

    #[test]
    fn test_groups_and_whitespace() {
        let tokens = tokenize("{\\rtf1\r\n{\\b x}\n}");
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::GroupStart,
                TokenKind::ControlWord,
                TokenKind::GroupStart,
                TokenKind::ControlWord,
                TokenKind::Text,
                TokenKind::GroupEnd,
                TokenKind::GroupEnd,
            ]
        );
    }

    #[test]
    fn test_line_breaks_removed_from_text() {
        let tokens = tokenize("Hello\r\nWorld");
        assert_eq!(tokens, vec![Token::text("HelloWorld")]);
    }

    #[test]
    fn test_blank_run_collapses_to_one_space() {
        let tokens = tokenize(r"Hello\b  \b0 World");
        assert_eq!(tokens[2], Token::text(" "));

        let tokens = tokenize("{x}{ \t }{y}");
        assert_eq!(tokens[4], Token::text(" "));
    }

    #[test]
    fn test_line_break_only_run_is_skipped() {
        let tokens = tokenize("{x}\r\n{y}");
        assert!(tokens.iter().all(|t| t.text != " "));
        assert_eq!(tokens.len(), 6);
    }

    #[test]
    fn test_overflowing_parameter_is_absent() {
        let tokens = tokenize(r"\fs99999999999 x");
        assert_eq!(tokens[0], Token::control_word("fs", None));
        assert_eq!(tokens[1], Token::text("x"));
    }

    #[test]
    fn test_lone_minus_is_text() {
        let tokens = tokenize(r"\par- item");
        assert_eq!(tokens[0], Token::control_word("par", None));
        assert_eq!(tokens[1], Token::text("- item"));
    }

    #[test]
    fn test_escaped_line_break_symbol() {
        let tokens = tokenize("a\\\nb");
        assert_eq!(tokens[1], Token::control_symbol("\n"));
    }

    #[test]
    fn test_trailing_backslash() {
        let tokens = tokenize("x\\");
        assert_eq!(tokens, vec![Token::text("x")]);
    }

    #[test]
    fn test_non_ascii_text() {
        let tokens = tokenize(r"{Grüße}");
        assert_eq!(tokens[1], Token::text("Grüße"));
    }
}
