//! `\info` destination reader.

use crate::model::Metadata;

use super::tokenizer::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InfoField {
    Title,
    Subject,
    Author,
    Manager,
    Operator,
    Category,
    Keywords,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateField {
    Created,
    Modified,
}

#[derive(Debug, Default)]
struct DateParts {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    hour: Option<u32>,
    minute: Option<u32>,
    second: Option<u32>,
}

impl DateParts {
    fn to_datetime(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        let year = self.year?;
        chrono::NaiveDate::from_ymd_opt(year, self.month.unwrap_or(1), self.day.unwrap_or(1))
            .and_then(|date| {
                date.and_hms_opt(
                    self.hour.unwrap_or(0),
                    self.minute.unwrap_or(0),
                    self.second.unwrap_or(0),
                )
            })
            .map(|dt| chrono::DateTime::from_naive_utc_and_offset(dt, chrono::Utc))
    }
}

/// Collects document metadata from the `\info` group.
#[derive(Debug, Default)]
pub struct InfoCollector {
    metadata: Metadata,
    field: Option<InfoField>,
    text: String,
    date: Option<DateField>,
    parts: DateParts,
    skip_fallback: usize,
}

impl InfoCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Control word inside `\info`.
    pub fn on_control_word(&mut self, token: &Token) {
        let name = token.text.as_str();
        let field = match name {
            "title" => Some(InfoField::Title),
            "subject" => Some(InfoField::Subject),
            "author" => Some(InfoField::Author),
            "manager" => Some(InfoField::Manager),
            "operator" => Some(InfoField::Operator),
            "category" => Some(InfoField::Category),
            "keywords" => Some(InfoField::Keywords),
            "doccomm" => Some(InfoField::Comment),
            _ => None,
        };
        if field.is_some() {
            self.field = field;
            self.text.clear();
            return;
        }

        let param = token.param;
        let unsigned = param.and_then(|p| u32::try_from(p).ok());
        match name {
            "creatim" => self.start_date(DateField::Created),
            "revtim" => self.start_date(DateField::Modified),
            "printim" | "buptim" => self.date = None,
            "yr" => self.parts.year = param,
            "mo" => self.parts.month = unsigned,
            "dy" => self.parts.day = unsigned,
            "hr" => self.parts.hour = unsigned,
            "min" => self.parts.minute = unsigned,
            "sec" => self.parts.second = unsigned,
            "nofpages" => self.metadata.page_count = unsigned,
            "nofwords" => self.metadata.word_count = unsigned,
            "u" => {
                if let Some(c) = param
                    .map(|n| if n < 0 { n + 65536 } else { n })
                    .and_then(|n| u32::try_from(n).ok())
                    .and_then(char::from_u32)
                {
                    self.push_char(c);
                    self.skip_fallback = 1;
                }
            }
            _ => {}
        }
    }

    /// Text (or decoded escape) inside `\info`.
    pub fn on_text(&mut self, text: &str) {
        if self.field.is_none() {
            return;
        }
        let mut chars = text.chars();
        while self.skip_fallback > 0 {
            if chars.next().is_none() {
                return;
            }
            self.skip_fallback -= 1;
        }
        self.text.extend(chars);
    }

    /// A group inside `\info` closed.
    pub fn group_end(&mut self) {
        if let Some(field) = self.field.take() {
            let value = self.text.split_whitespace().collect::<Vec<_>>().join(" ");
            self.text.clear();
            if !value.is_empty() {
                let slot = match field {
                    InfoField::Title => &mut self.metadata.title,
                    InfoField::Subject => &mut self.metadata.subject,
                    InfoField::Author => &mut self.metadata.author,
                    InfoField::Manager => &mut self.metadata.manager,
                    InfoField::Operator => &mut self.metadata.operator,
                    InfoField::Category => &mut self.metadata.category,
                    InfoField::Keywords => &mut self.metadata.keywords,
                    InfoField::Comment => &mut self.metadata.comment,
                };
                *slot = Some(value);
            }
        }

        if let Some(date) = self.date.take() {
            let value = self.parts.to_datetime();
            if value.is_none() {
                log::debug!("Ignoring invalid {:?} date", date);
            }
            match date {
                DateField::Created => self.metadata.created = value,
                DateField::Modified => self.metadata.modified = value,
            }
        }
        self.skip_fallback = 0;
    }

    /// Metadata read so far.
    pub fn into_metadata(self) -> Metadata {
        self.metadata
    }

    fn start_date(&mut self, field: DateField) {
        self.date = Some(field);
        self.parts = DateParts::default();
    }

    fn push_char(&mut self, c: char) {
        if self.field.is_some() {
            self.text.push(c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tokenizer::{TokenKind, Tokenizer};
    use chrono::{Datelike, Timelike};

    fn collect(rtf: &str) -> Metadata {
        let mut info = InfoCollector::new();
        for token in Tokenizer::new(rtf) {
            match token.kind {
                TokenKind::ControlWord => info.on_control_word(&token),
                TokenKind::Text => info.on_text(&token.text),
                TokenKind::GroupEnd => info.group_end(),
                _ => {}
            }
        }
        info.into_metadata()
    }

    #[test]
    fn test_text_fields() {
        let metadata = collect(r"{\title Annual  Report}{\author Jane Roe}{\doccomm Draft}");
        assert_eq!(metadata.title.as_deref(), Some("Annual Report"));
        assert_eq!(metadata.author.as_deref(), Some("Jane Roe"));
        assert_eq!(metadata.comment.as_deref(), Some("Draft"));
        assert!(metadata.subject.is_none());
    }

    #[test]
    fn test_dates() {
        let metadata = collect(r"{\creatim\yr2024\mo1\dy15\hr10\min30}{\revtim\yr2024\mo13\dy1}");
        let created = metadata.created.unwrap();
        assert_eq!(created.year(), 2024);
        assert_eq!(created.day(), 15);
        assert_eq!(created.minute(), 30);
        assert!(metadata.modified.is_none());
    }

    #[test]
    fn test_counts_and_unicode() {
        let metadata = collect(r"{\title Caf\u233?}{\nofpages3}{\nofwords120}");
        assert_eq!(metadata.title.as_deref(), Some("Café"));
        assert_eq!(metadata.page_count, Some(3));
        assert_eq!(metadata.word_count, Some(120));
    }
}
