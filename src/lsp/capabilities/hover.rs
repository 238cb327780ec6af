//! textDocument/hover handler
//!
//! Shows catalog documentation for the function or constant under the
//! cursor. Only the cursor line is re-tokenized; hover never looks at the
//! rest of the document.

use std::sync::Arc;

use tower_lsp::lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind};

use crate::catalog::{entry_markdown, FunctionCatalog};
use crate::lsp::analysis::text::{Position, TextModel, TextRange};
use crate::syntax::{tokenize_line, State, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverContent {
    pub markdown: String,
    /// The hovered word.
    pub range: TextRange,
}

pub struct HoverProvider {
    catalog: Arc<FunctionCatalog>,
}

impl HoverProvider {
    pub fn new(catalog: Arc<FunctionCatalog>) -> Self {
        Self { catalog }
    }

    pub fn provide(&self, model: &TextModel<'_>, position: Position) -> Option<HoverContent> {
        let position = model.validate_position(position);
        let kind = token_kind_at(model.line_content(position.line), position.column)?;
        if !kind.is_identifier_like() {
            return None;
        }

        let word = model.word_at_position(position)?;
        let entry = self.catalog.find(&word.word)?;
        tracing::trace!(name = %word.word, "hover");

        Some(HoverContent {
            markdown: entry_markdown(entry),
            range: TextRange::on_line(position.line, word.start_column, word.end_column),
        })
    }
}

/// Kind of the last token starting before `column`. Token starts are
/// 0-based, so the token beginning right at the cursor still counts.
fn token_kind_at(line: &str, column: u32) -> Option<TokenKind> {
    tokenize_line(line, State::Root)
        .tokens
        .iter()
        .take_while(|token| token.start < column)
        .last()
        .map(|token| token.kind)
}

pub fn to_lsp_hover(content: HoverContent) -> Hover {
    Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: content.markdown,
        }),
        range: Some(content.range.to_lsp()),
    }
}
