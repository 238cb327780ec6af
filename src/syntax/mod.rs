//! Lexical grammar of the expression language.
//!
//! - [`rules`]: string, escape and accessor primitives shared with completion
//! - [`lexer`]: the resumable line tokenizer used for highlighting and hover
//! - [`theme`]: the highlighting palette keyed by token scope

pub mod lexer;
pub mod rules;
pub mod theme;

pub use lexer::{tokenize, tokenize_line, LineTokens, State, Token, TokenKind};
pub use rules::{AccessorKind, Quote};
pub use theme::{Theme, ThemeRule};
