//! Editor text model
//!
//! Positions follow the host editor convention: 1-based lines, 1-based
//! columns counted in UTF-16 code units. A column means "before the
//! character at this column", so column 1 is the line start.

use tower_lsp::lsp_types;

/// A cursor position (1-based line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Convert from an LSP position (0-based line and character).
    pub fn from_lsp(pos: lsp_types::Position) -> Self {
        Self {
            line: pos.line + 1,
            column: pos.character + 1,
        }
    }

    pub fn to_lsp(self) -> lsp_types::Position {
        lsp_types::Position {
            line: self.line.saturating_sub(1),
            character: self.column.saturating_sub(1),
        }
    }
}

/// A half-open text span, `start` inclusive and `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRange {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl TextRange {
    /// A span on a single line.
    pub fn on_line(line: u32, start_column: u32, end_column: u32) -> Self {
        Self {
            start_line: line,
            start_column,
            end_line: line,
            end_column,
        }
    }

    pub fn between(start: Position, end: Position) -> Self {
        Self {
            start_line: start.line,
            start_column: start.column,
            end_line: end.line,
            end_column: end.column,
        }
    }

    pub fn start(&self) -> Position {
        Position::new(self.start_line, self.start_column)
    }

    pub fn end(&self) -> Position {
        Position::new(self.end_line, self.end_column)
    }

    pub fn is_empty(&self) -> bool {
        self.start() == self.end()
    }

    pub fn to_lsp(self) -> lsp_types::Range {
        lsp_types::Range {
            start: self.start().to_lsp(),
            end: self.end().to_lsp(),
        }
    }
}

/// The word touching a position, with its column span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordAtPosition {
    pub word: String,
    pub start_column: u32,
    pub end_column: u32,
}

/// Word characters are letters, digits and underscore.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Read-only view of editor text, split into lines.
pub struct TextModel<'a> {
    text: &'a str,
    /// Byte span of each line's content, excluding the line terminator.
    lines: Vec<(usize, usize)>,
}

impl<'a> TextModel<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut lines = Vec::new();
        let mut start = 0;
        for (idx, _) in text.match_indices('\n') {
            let end = if idx > start && text.as_bytes()[idx - 1] == b'\r' {
                idx - 1
            } else {
                idx
            };
            lines.push((start, end));
            start = idx + 1;
        }
        lines.push((start, text.len()));
        Self { text, lines }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn line_count(&self) -> u32 {
        self.lines.len() as u32
    }

    /// Content of a 1-based line, or "" when out of range.
    pub fn line_content(&self, line: u32) -> &'a str {
        match self.line_span(line) {
            Some((start, end)) => &self.text[start..end],
            None => "",
        }
    }

    /// The largest valid column on a line (one past its last character).
    pub fn line_max_column(&self, line: u32) -> u32 {
        utf16_len(self.line_content(line)) + 1
    }

    /// Clamp a position into the document.
    pub fn validate_position(&self, pos: Position) -> Position {
        let line = pos.line.clamp(1, self.line_count());
        let column = pos.column.clamp(1, self.line_max_column(line));
        Position::new(line, column)
    }

    /// Split the cursor line into the text before and after the position.
    pub fn split_line_at(&self, pos: Position) -> (&'a str, &'a str) {
        let pos = self.validate_position(pos);
        let line = self.line_content(pos.line);
        let split = utf16_offset_to_byte_offset(line, (pos.column - 1) as usize);
        line.split_at(split)
    }

    /// Text covered by `range`. Out-of-bounds ends are clamped.
    pub fn value_in_range(&self, range: TextRange) -> &'a str {
        let start = self.byte_offset(range.start());
        let end = self.byte_offset(range.end());
        if start <= end {
            &self.text[start..end]
        } else {
            &self.text[end..start]
        }
    }

    /// The part of the word before the cursor. An empty word starts at the cursor.
    pub fn word_until_position(&self, pos: Position) -> WordAtPosition {
        let pos = self.validate_position(pos);
        let (before, _) = self.split_line_at(pos);
        let word = &before[word_start(before)..];
        WordAtPosition {
            word: word.to_string(),
            start_column: pos.column - utf16_len(word),
            end_column: pos.column,
        }
    }

    /// The whole word touching the cursor on either side, if any.
    pub fn word_at_position(&self, pos: Position) -> Option<WordAtPosition> {
        let pos = self.validate_position(pos);
        let (before, after) = self.split_line_at(pos);
        let left = before[word_start(before)..].to_string();
        let right: String = after.chars().take_while(|c| is_word_char(*c)).collect();
        if left.is_empty() && right.is_empty() {
            return None;
        }
        let start_column = pos.column - utf16_len(&left);
        let end_column = pos.column + utf16_len(&right);
        Some(WordAtPosition {
            word: left + &right,
            start_column,
            end_column,
        })
    }

    /// Convert a character offset (UTF-16 code units from the document start)
    /// to a position. Offsets past the end map to the end of the document.
    pub fn position_at(&self, offset: usize) -> Position {
        let mut remaining = offset;
        for (idx, (start, end)) in self.lines.iter().enumerate() {
            let content = &self.text[*start..*end];
            let len = utf16_len(content) as usize;
            if remaining <= len || idx + 1 == self.lines.len() {
                let column = remaining.min(len) as u32 + 1;
                return Position::new(idx as u32 + 1, column);
            }
            let next_start = self.lines[idx + 1].0;
            let terminator = utf16_len(&self.text[*end..next_start]) as usize;
            remaining = remaining.saturating_sub(len + terminator);
        }
        Position::new(1, 1)
    }

    /// The range spanning the whole document.
    pub fn full_range(&self) -> TextRange {
        let last = self.line_count();
        TextRange::between(
            Position::new(1, 1),
            Position::new(last, self.line_max_column(last)),
        )
    }

    fn line_span(&self, line: u32) -> Option<(usize, usize)> {
        if line == 0 {
            return None;
        }
        self.lines.get(line as usize - 1).copied()
    }

    fn byte_offset(&self, pos: Position) -> usize {
        let pos = self.validate_position(pos);
        let Some((start, end)) = self.line_span(pos.line) else {
            return 0;
        };
        start + utf16_offset_to_byte_offset(&self.text[start..end], (pos.column - 1) as usize)
    }
}

/// Byte index where the trailing run of word characters begins.
fn word_start(before: &str) -> usize {
    before
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_word_char(*c))
        .last()
        .map(|(idx, _)| idx)
        .unwrap_or(before.len())
}

/// Length of a string in UTF-16 code units.
pub fn utf16_len(s: &str) -> u32 {
    s.chars().map(|c| c.len_utf16() as u32).sum()
}

/// Convert UTF-16 offset to byte offset within a line
pub fn utf16_offset_to_byte_offset(line: &str, utf16_offset: usize) -> usize {
    let mut utf16_count = 0;
    for (byte_idx, ch) in line.char_indices() {
        if utf16_count >= utf16_offset {
            return byte_idx;
        }
        utf16_count += ch.len_utf16();
    }
    line.len()
}
