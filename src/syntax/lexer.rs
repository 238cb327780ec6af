//! Tokenizer for the expression language.
//!
//! A line-oriented state machine: each line is tokenized starting from the
//! state the previous line ended in, so strings and accessors may continue
//! across lines. Rules within a state are tried in order and the first match
//! wins. A character no rule accepts becomes a plain token and the state is
//! kept.

use std::fmt;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use super::rules::{
    accessor_opening, closing_delimiter_len, next_string_piece, quote_before_offset,
    shorthand_accessor, Quote, StringPiece,
};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+").unwrap());
static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9][0-9_]*(?:\.[0-9_]*)?|\.[0-9][0-9_]*)(?:e[+-]?[0-9]+)?").unwrap());
static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_]*").unwrap());
static BARE_COLUMN_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").unwrap());
static OFFSET_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*,\s*").unwrap());
static OFFSET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?[0-9_]+").unwrap());
static TERMINATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\]").unwrap());

const ROW_INFORMATION: [&str; 3] = ["ROW_ID", "ROW_INDEX", "ROW_NUMBER"];

/// Token classification. Each kind maps to a dotted theme scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Unclassified text (no rule matched, or offset separators)
    Plain,
    White,
    Comment,
    Float,
    Int,
    String,
    /// String quotes and escape sequences
    StringEscape,
    /// Column and flow variable names
    ColumnName,
    /// Accessor delimiters: `$[`, `$$["`, `"]`, ...
    ColumnNameEscape,
    ColumnOffset,
    RowInfo,
    RowInfoEscape,
    /// `MISSING`
    Constant,
    True,
    False,
    Bracket,
    Parenthesis,
    Identifier,
}

impl TokenKind {
    pub fn scope(self) -> &'static str {
        match self {
            TokenKind::Plain => "",
            TokenKind::White => "white",
            TokenKind::Comment => "comment",
            TokenKind::Float => "number.float",
            TokenKind::Int => "number.int",
            TokenKind::String => "string",
            TokenKind::StringEscape => "string.escape",
            TokenKind::ColumnName => "string.colname",
            TokenKind::ColumnNameEscape => "string.colname.escape",
            TokenKind::ColumnOffset => "number.coloffset",
            TokenKind::RowInfo => "string.rowinfo",
            TokenKind::RowInfoEscape => "string.rowinfo.escape",
            TokenKind::Constant => "constant",
            TokenKind::True => "keyword.true",
            TokenKind::False => "keyword.false",
            TokenKind::Bracket => "delimiter.bracket",
            TokenKind::Parenthesis => "delimiter.parenthesis",
            TokenKind::Identifier => "identifier",
        }
    }

    /// Identifiers and keywords are the tokens hover documentation applies to.
    pub fn is_identifier_like(self) -> bool {
        let scope = self.scope();
        scope.contains("identifier") || scope.contains("keyword")
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope() {
            "" => write!(f, "plain"),
            scope => write!(f, "{}", scope),
        }
    }
}

/// Lexer states. `Root` is the only state a line can return to on its own;
/// every other state is entered by an opening delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum State {
    #[default]
    Root,
    /// Inside `'...'`
    StringBody,
    /// Inside `"..."`
    DblStringBody,
    /// After `$`/`$$` in shorthand form
    ColumnAccessBodyNoQuotes,
    ColumnAccessBodySingleQuotes,
    ColumnAccessBodyDoubleQuotes,
    /// After the closing quote of `$["name", 2]`
    ColumnOffsetSeparator,
    ColumnOffset,
    ColumnAccessTerminator,
    /// Inside `$[ROW_...]`
    RowInformationAccessBody,
}

/// A classified span of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Start offset in UTF-16 code units from the line start.
    pub start: u32,
    /// Length in UTF-16 code units.
    pub len: u32,
    /// Byte span within the line.
    pub span: Range<usize>,
}

impl Token {
    pub fn text<'a>(&self, line: &'a str) -> &'a str {
        &line[self.span.clone()]
    }
}

/// Tokens of one line and the state the next line starts in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTokens {
    pub tokens: Vec<Token>,
    pub end_state: State,
}

/// Tokenize a whole document, carrying the state from line to line.
pub fn tokenize(text: &str) -> Vec<LineTokens> {
    let mut state = State::Root;
    text.split('\n')
        .map(|line| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let result = tokenize_line(line, state);
            state = result.end_state;
            result
        })
        .collect()
}

/// Tokenize one line starting in `state`.
pub fn tokenize_line(line: &str, state: State) -> LineTokens {
    let mut lexer = LineLexer {
        line,
        pos: 0,
        utf16_pos: 0,
        state,
        tokens: Vec::new(),
    };
    while lexer.pos < line.len() {
        let rest = &line[lexer.pos..];
        let (len, kind, next) = match lexer.state {
            State::Root => root_rule(rest),
            State::StringBody => string_body_rule(rest, Quote::Single),
            State::DblStringBody => string_body_rule(rest, Quote::Double),
            State::ColumnAccessBodySingleQuotes => column_body_rule(rest, Quote::Single),
            State::ColumnAccessBodyDoubleQuotes => column_body_rule(rest, Quote::Double),
            State::ColumnAccessBodyNoQuotes => match BARE_COLUMN_NAME.find(rest) {
                Some(m) => (m.end(), TokenKind::ColumnName, Some(State::Root)),
                None => (first_char_len(rest), TokenKind::Plain, Some(State::Root)),
            },
            State::ColumnOffsetSeparator => {
                regex_rule(rest, &OFFSET_SEPARATOR, TokenKind::Plain, State::ColumnOffset)
            }
            State::ColumnOffset => regex_rule(
                rest,
                &OFFSET,
                TokenKind::ColumnOffset,
                State::ColumnAccessTerminator,
            ),
            State::ColumnAccessTerminator => {
                regex_rule(rest, &TERMINATOR, TokenKind::ColumnNameEscape, State::Root)
            }
            State::RowInformationAccessBody => row_information_rule(rest),
        };
        // Rules without a transition keep the current state
        let next = next.unwrap_or(lexer.state);
        lexer.push(len, kind);
        lexer.state = next;
    }
    LineTokens {
        tokens: lexer.tokens,
        end_state: lexer.state,
    }
}

/// Outcome of one rule: byte length, token kind, optional state transition.
type Step = (usize, TokenKind, Option<State>);

struct LineLexer<'a> {
    line: &'a str,
    pos: usize,
    utf16_pos: u32,
    state: State,
    tokens: Vec<Token>,
}

impl LineLexer<'_> {
    fn push(&mut self, len: usize, kind: TokenKind) {
        let end = self.pos + len;
        let utf16_len: u32 = self.line[self.pos..end]
            .chars()
            .map(|c| c.len_utf16() as u32)
            .sum();
        match self.tokens.last_mut() {
            Some(last) if last.kind == kind => {
                last.len += utf16_len;
                last.span.end = end;
            }
            _ => self.tokens.push(Token {
                kind,
                start: self.utf16_pos,
                len: utf16_len,
                span: self.pos..end,
            }),
        }
        self.pos = end;
        self.utf16_pos += utf16_len;
    }
}

fn first_char_len(rest: &str) -> usize {
    rest.chars().next().map_or(1, char::len_utf8)
}

fn plain_char(rest: &str) -> Step {
    (first_char_len(rest), TokenKind::Plain, None)
}

fn regex_rule(rest: &str, re: &Regex, kind: TokenKind, next: State) -> Step {
    match re.find(rest) {
        Some(m) if m.end() > 0 => (m.end(), kind, Some(next)),
        _ => plain_char(rest),
    }
}

/// Whether `rest` starts with `word` not followed by another word character.
fn starts_with_word(rest: &str, word: &str) -> bool {
    rest.strip_prefix(word).is_some_and(|after| {
        !after
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
    })
}

fn root_rule(rest: &str) -> Step {
    if let Some(m) = WHITESPACE.find(rest) {
        return (m.end(), TokenKind::White, None);
    }
    if rest.starts_with('#') {
        return (rest.len(), TokenKind::Comment, None);
    }
    if let Some(m) = NUMBER.find(rest) {
        let kind = if m.as_str().contains(['.', 'e']) {
            TokenKind::Float
        } else {
            TokenKind::Int
        };
        return (m.end(), kind, None);
    }
    if let Some(opening) = accessor_opening(rest) {
        match opening.quote {
            Some(Quote::Double) => {
                return (
                    opening.len,
                    TokenKind::ColumnNameEscape,
                    Some(State::ColumnAccessBodyDoubleQuotes),
                )
            }
            Some(Quote::Single) => {
                return (
                    opening.len,
                    TokenKind::ColumnNameEscape,
                    Some(State::ColumnAccessBodySingleQuotes),
                )
            }
            None => {}
        }
    }
    if let Some((_, len)) = shorthand_accessor(rest) {
        return (
            len,
            TokenKind::ColumnNameEscape,
            Some(State::ColumnAccessBodyNoQuotes),
        );
    }
    if rest.starts_with("$[") {
        return (
            2,
            TokenKind::RowInfoEscape,
            Some(State::RowInformationAccessBody),
        );
    }
    match rest.as_bytes()[0] {
        b'\'' => return (1, TokenKind::StringEscape, Some(State::StringBody)),
        b'"' => return (1, TokenKind::StringEscape, Some(State::DblStringBody)),
        b'[' | b']' => return (1, TokenKind::Bracket, None),
        b'(' | b')' => return (1, TokenKind::Parenthesis, None),
        _ => {}
    }
    for (word, kind) in [
        ("MISSING", TokenKind::Constant),
        ("TRUE", TokenKind::True),
        ("FALSE", TokenKind::False),
    ] {
        if starts_with_word(rest, word) {
            return (word.len(), kind, None);
        }
    }
    if let Some(m) = IDENTIFIER.find(rest) {
        return (m.end(), TokenKind::Identifier, None);
    }
    plain_char(rest)
}

fn string_body_rule(rest: &str, quote: Quote) -> Step {
    match next_string_piece(rest, quote) {
        StringPiece::Text(len) => (len, TokenKind::String, None),
        StringPiece::Escape(len) => (len, TokenKind::StringEscape, None),
        StringPiece::Close => (1, TokenKind::StringEscape, Some(State::Root)),
        StringPiece::DanglingEscape => plain_char(rest),
    }
}

fn column_body_rule(rest: &str, quote: Quote) -> Step {
    match next_string_piece(rest, quote) {
        StringPiece::Text(len) | StringPiece::Escape(len) => (len, TokenKind::ColumnName, None),
        StringPiece::Close if quote_before_offset(rest, quote) => (
            1,
            TokenKind::ColumnNameEscape,
            Some(State::ColumnOffsetSeparator),
        ),
        StringPiece::Close => match closing_delimiter_len(rest, Some(quote)) {
            0 => plain_char(rest),
            len => (len, TokenKind::ColumnNameEscape, Some(State::Root)),
        },
        StringPiece::DanglingEscape => plain_char(rest),
    }
}

fn row_information_rule(rest: &str) -> Step {
    if let Some(word) = ROW_INFORMATION.iter().find(|w| rest.starts_with(**w)) {
        return (word.len(), TokenKind::RowInfo, None);
    }
    if rest.starts_with(']') {
        return (1, TokenKind::RowInfoEscape, Some(State::Root));
    }
    plain_char(rest)
}
