//! Lexical primitives shared by the tokenizer and the completion resolver.
//!
//! Both consumers classify strings, escapes and accessor prefixes through
//! these functions, so highlighting and completion always agree on where a
//! string ends or an accessor begins.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A string or accessor quote character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Quote {
    #[serde(rename = "'")]
    Single,
    #[default]
    #[serde(rename = "\"")]
    Double,
}

impl Quote {
    pub fn as_char(self) -> char {
        match self {
            Quote::Single => '\'',
            Quote::Double => '"',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '\'' => Some(Quote::Single),
            '"' => Some(Quote::Double),
            _ => None,
        }
    }

    /// Escape a name for placement between two quotes of this kind.
    ///
    /// Backslashes are doubled before the quote is escaped, otherwise the
    /// backslash introduced for the quote would itself be doubled.
    pub fn escape(self, name: &str) -> String {
        let quote = self.as_char();
        let mut escaped = String::with_capacity(name.len() + 2);
        for c in name.chars() {
            if c == '\\' || c == quote {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Which input an accessor refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccessorKind {
    /// `$name` / `$["name"]`
    Column,
    /// `$$name` / `$$["name"]`
    FlowVariable,
}

impl AccessorKind {
    pub fn prefix(self) -> &'static str {
        match self {
            AccessorKind::Column => "$",
            AccessorKind::FlowVariable => "$$",
        }
    }

    fn from_dollars(dollars: usize) -> Self {
        if dollars >= 2 {
            AccessorKind::FlowVariable
        } else {
            AccessorKind::Column
        }
    }
}

/// One step through the body of a quoted string or column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringPiece {
    /// A run of literal characters of the given byte length.
    Text(usize),
    /// A backslash and the character it escapes.
    Escape(usize),
    /// The closing quote (one byte).
    Close,
    /// A backslash with nothing left to escape.
    DanglingEscape,
}

/// Classify the start of `rest`, which lies inside a string quoted by `quote`.
///
/// `rest` must not be empty.
pub fn next_string_piece(rest: &str, quote: Quote) -> StringPiece {
    let q = quote.as_char();
    let mut chars = rest.chars();
    match chars.next() {
        Some('\\') => match chars.next() {
            Some(escaped) => StringPiece::Escape(1 + escaped.len_utf8()),
            None => StringPiece::DanglingEscape,
        },
        Some(c) if c == q => StringPiece::Close,
        _ => StringPiece::Text(
            rest.find(|c: char| c == '\\' || c == q)
                .unwrap_or(rest.len()),
        ),
    }
}

/// Returns the quote of the string left open at the end of `text`, if any.
///
/// Closed literals, escaped quotes and escaped backslashes are skipped, so
/// `"a\"" + "a` is open while `"it's" + ` is not. A `#` outside a string
/// comments out the rest of its line, as in the tokenizer.
pub fn open_string_at_end(text: &str) -> Option<Quote> {
    let mut open: Option<Quote> = None;
    let mut rest = text;
    while !rest.is_empty() {
        match open {
            Some(quote) => match next_string_piece(rest, quote) {
                StringPiece::Text(len) | StringPiece::Escape(len) => rest = &rest[len..],
                StringPiece::Close => {
                    open = None;
                    rest = &rest[1..];
                }
                StringPiece::DanglingEscape => return open,
            },
            None => {
                let mut chars = rest.chars();
                let Some(c) = chars.next() else { break };
                if c == '#' {
                    rest = rest.find('\n').map_or("", |end| &rest[end..]);
                    continue;
                }
                if c == '\\' {
                    // An escape outside a string still consumes the next character
                    chars.next();
                } else {
                    open = Quote::from_char(c);
                }
                rest = chars.as_str();
            }
        }
    }
    open
}

/// An accessor prefix such as `$[`, `$$["` or `$[  '`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessorOpening {
    pub kind: AccessorKind,
    pub quote: Option<Quote>,
    /// Length of the matched prefix in bytes.
    pub len: usize,
}

fn dollars_then(rest: &str, dollars: usize, next: impl Fn(u8) -> bool) -> bool {
    let bytes = rest.as_bytes();
    bytes.len() > dollars && bytes[..dollars].iter().all(|b| *b == b'$') && next(bytes[dollars])
}

/// Match a bracket accessor opening at the start of `rest`.
///
/// Whitespace between the bracket and the quote is part of the opening only
/// when a quote follows.
pub fn accessor_opening(rest: &str) -> Option<AccessorOpening> {
    let dollars = [2, 1]
        .into_iter()
        .find(|n| dollars_then(rest, *n, |b| b == b'['))?;
    let after = &rest[dollars + 1..];
    let body = after.trim_start();
    match body.chars().next().and_then(Quote::from_char) {
        Some(quote) => Some(AccessorOpening {
            kind: AccessorKind::from_dollars(dollars),
            quote: Some(quote),
            len: dollars + 1 + (after.len() - body.len()) + 1,
        }),
        None => Some(AccessorOpening {
            kind: AccessorKind::from_dollars(dollars),
            quote: None,
            len: dollars + 1,
        }),
    }
}

/// Match a bracket accessor opening that ends exactly at the end of `before`.
pub fn accessor_opening_before(before: &str) -> Option<AccessorOpening> {
    let quote = before.chars().last().and_then(Quote::from_char);
    let head = match quote {
        Some(_) => before[..before.len() - 1].trim_end(),
        None => before,
    };
    let head = head.strip_suffix('[')?;
    let dollars = head.bytes().rev().take_while(|b| *b == b'$').count().min(2);
    if dollars == 0 {
        return None;
    }
    Some(AccessorOpening {
        kind: AccessorKind::from_dollars(dollars),
        quote,
        len: before.len() - (head.len() - dollars),
    })
}

/// Match a shorthand accessor prefix (`$` or `$$` directly followed by a
/// letter or underscore) at the start of `rest`. Returns the prefix length.
pub fn shorthand_accessor(rest: &str) -> Option<(AccessorKind, usize)> {
    [2, 1]
        .into_iter()
        .find(|n| dollars_then(rest, *n, |b| b.is_ascii_alphabetic() || b == b'_'))
        .map(|n| (AccessorKind::from_dollars(n), n))
}

/// Length of an accessor's closing delimiter at the start of `after`:
/// `q\s*]` for a quoted accessor, `]` for a bare one. Zero when absent.
pub fn closing_delimiter_len(after: &str, quote: Option<Quote>) -> usize {
    match quote {
        Some(quote) => {
            let Some(body) = after.strip_prefix(quote.as_char()) else {
                return 0;
            };
            let trimmed = body.trim_start();
            if trimmed.starts_with(']') {
                after.len() - trimmed.len() + 1
            } else {
                0
            }
        }
        None => usize::from(after.starts_with(']')),
    }
}

/// Whether a closing quote at the start of `after` is followed by an offset
/// separator (`q\s*,`).
pub fn quote_before_offset(after: &str, quote: Quote) -> bool {
    after
        .strip_prefix(quote.as_char())
        .is_some_and(|body| body.trim_start().starts_with(','))
}

/// Whether `name` may be written in shorthand form (`^[_a-zA-Z]\w*$`).
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
