//! LSP capability handlers

pub mod candidates;
pub mod completions;
pub mod diagnostics;
pub mod hover;
pub mod semantic_tokens;
