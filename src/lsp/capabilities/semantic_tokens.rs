//! textDocument/semanticTokens/full handler
//!
//! Highlighting for editors that do not run the lexer themselves. The token
//! stream is the lexer's, mapped onto a small legend.

use tower_lsp::lsp_types::{SemanticToken, SemanticTokenType, SemanticTokens, SemanticTokensLegend};

use crate::syntax::{tokenize, TokenKind};

const COMMENT: u32 = 0;
const NUMBER: u32 = 1;
const STRING: u32 = 2;
const KEYWORD: u32 = 3;
const FUNCTION: u32 = 4;
const VARIABLE: u32 = 5;
const ACCESSOR: u32 = 6;

pub fn semantic_token_legend() -> SemanticTokensLegend {
    SemanticTokensLegend {
        token_types: vec![
            SemanticTokenType::COMMENT,
            SemanticTokenType::NUMBER,
            SemanticTokenType::STRING,
            SemanticTokenType::KEYWORD,
            SemanticTokenType::FUNCTION,
            SemanticTokenType::VARIABLE,
            SemanticTokenType::new("accessor"),
        ],
        token_modifiers: vec![],
    }
}

/// Legend index for a token kind, `None` for kinds left unhighlighted.
fn token_type(kind: TokenKind) -> Option<u32> {
    match kind {
        TokenKind::Comment => Some(COMMENT),
        TokenKind::Float | TokenKind::Int | TokenKind::ColumnOffset => Some(NUMBER),
        TokenKind::String | TokenKind::StringEscape => Some(STRING),
        TokenKind::Constant | TokenKind::True | TokenKind::False => Some(KEYWORD),
        TokenKind::Identifier => Some(FUNCTION),
        TokenKind::ColumnName | TokenKind::RowInfo => Some(VARIABLE),
        TokenKind::ColumnNameEscape | TokenKind::RowInfoEscape => Some(ACCESSOR),
        TokenKind::Plain | TokenKind::White | TokenKind::Bracket | TokenKind::Parenthesis => None,
    }
}

pub fn semantic_tokens_full(text: &str) -> SemanticTokens {
    let mut data = Vec::new();
    let mut last_line = 0;
    let mut last_start = 0;

    for (line, line_tokens) in tokenize(text).iter().enumerate() {
        let line = line as u32;
        for token in &line_tokens.tokens {
            let Some(token_type) = token_type(token.kind) else {
                continue;
            };
            let delta_line = line - last_line;
            let delta_start = if delta_line == 0 {
                token.start - last_start
            } else {
                token.start
            };
            data.push(SemanticToken {
                delta_line,
                delta_start,
                length: token.len,
                token_type,
                token_modifiers_bitset: 0,
            });
            last_line = line;
            last_start = token.start;
        }
    }

    SemanticTokens {
        result_id: None,
        data,
    }
}
