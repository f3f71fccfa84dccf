//! Token types produced by the line classifier
//!
//!     Each input line maps to exactly one token. A token records which grammar
//!     rule matched (its `kind`), the raw line text, the span the line covers in
//!     the source, and the rule-specific structured payload.
//!
//!     Lines that match no rule are still tokens: whitespace-only lines come
//!     back as `blank` and everything else as `line` (opaque paragraph text).
//!     Classification never fails, so downstream assembly can treat "no
//!     structure" and "structure" uniformly.
//!
//!     Payloads are a closed set of variants, one per recognized line class.
//!     Fields that a match may or may not produce (a headline's keyword, a
//!     list item's checkbox) are `Option`s rather than being dropped from the
//!     payload shape.

use serde::{Deserialize, Serialize};

use crate::org::ast::range::Position;

/// The classification result for one line of input.
///
/// `kind` is the name of the matching grammar rule, or `"blank"` / `"line"`
/// when no rule matched. Tokens are produced fresh per classified line and
/// are not mutated afterwards; the classifier leaves `position` empty and the
/// caller stamps the real span with [`Token::at`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: String,
    pub raw: String,
    pub position: Position,
    pub data: TokenData,
}

impl Token {
    pub fn new(kind: impl Into<String>, raw: impl Into<String>, data: TokenData) -> Self {
        Self {
            kind: kind.into(),
            raw: raw.into(),
            position: Position::default(),
            data,
        }
    }

    /// The fallback token for a whitespace-only line.
    pub fn blank(raw: impl Into<String>) -> Self {
        Self::new("blank", raw, TokenData::None)
    }

    /// The fallback token for an unclassified content line.
    pub fn line(raw: impl Into<String>) -> Self {
        Self::new("line", raw, TokenData::None)
    }

    /// Return the token with its position set.
    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

/// Structured payload extracted by the matching rule.
///
/// One variant per recognized line class. Marker-only lines (table
/// separators, horizontal rules, comments, drawer ends) carry unit variants;
/// `None` is reserved for `blank`/`line` fallbacks and rules without an
/// extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenData {
    Headline {
        level: usize,
        keyword: Option<String>,
        priority: Option<char>,
        content: String,
        tags: Vec<String>,
    },
    Keyword {
        key: String,
        value: String,
    },
    Planning {
        keyword: String,
        timestamp: Option<Timestamp>,
    },
    Timestamp(Timestamp),
    BlockBegin {
        kind: String,
        params: Vec<String>,
    },
    BlockEnd {
        kind: String,
    },
    DrawerBegin {
        kind: String,
    },
    DrawerEnd,
    ListItem {
        indent: usize,
        ordered: bool,
        content: String,
        tag: Option<String>,
        checked: Option<bool>,
    },
    TableSeparator,
    TableRow {
        cells: Vec<String>,
    },
    HorizontalRule,
    Comment,
    Footnote {
        label: String,
        content: String,
    },
    None,
}

/// A parsed Org timestamp.
///
/// `<2024-03-15 Fri 09:00-10:30 +1w>` is active, `[2024-03-15]` is inactive.
/// The weekday is matched but not retained; dates are not validated against a
/// calendar beyond their digit shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    pub active: bool,
    pub date: CalendarDate,
    pub time: Option<ClockTime>,
    pub end_time: Option<ClockTime>,
    pub repeater: Option<String>,
}

/// A calendar date as written in a timestamp (YYYY-MM-DD)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// A wall-clock time as written in a timestamp (HH:MM)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::org::ast::range::{Point, Position};

    #[test]
    fn test_fallback_tokens_carry_raw_input() {
        let blank = Token::blank("   ");
        assert_eq!(blank.kind, "blank");
        assert_eq!(blank.raw, "   ");
        assert_eq!(blank.data, TokenData::None);

        let line = Token::line("just prose");
        assert_eq!(line.kind, "line");
        assert_eq!(line.raw, "just prose");
    }

    #[test]
    fn test_new_token_has_empty_position() {
        let token = Token::new("comment", "# note", TokenData::Comment);
        assert!(token.position.is_empty());
    }

    #[test]
    fn test_at_stamps_position() {
        let span = Position::new(Point::new(3, 0), Point::new(3, 6));
        let token = Token::new("comment", "# note", TokenData::Comment).at(span);
        assert_eq!(token.position, span);
    }
}
