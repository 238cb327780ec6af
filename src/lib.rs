//! # kexpr
//!
//! Editor support for the KNIME expression language: syntax highlighting,
//! context-aware completion, hover documentation and diagnostics display,
//! served over the Language Server Protocol.
//!
//! ## Architecture
//!
//! ```text
//!            editor text + cursor
//!                     │
//!        ┌────────────┴─────────────┐
//!        ▼                          ▼
//! ┌──────────────┐        ┌───────────────────┐
//! │ syntax::lexer│        │ completion context│
//! │ (line states)│        │  (range, quote,   │
//! └──────┬───────┘        │   suppression)    │
//!        │                └─────────┬─────────┘
//!        │   syntax::rules shared   │
//!        ▼                          ▼
//! ┌──────────────┐        ┌───────────────────┐      ┌─────────┐
//! │ hover, theme,│        │completion provider│◄─────┤ catalog │
//! │semantic tokens        │ (catalog + inputs)│      │ inputs  │
//! └──────────────┘        └───────────────────┘      └─────────┘
//!        │                          │
//!        └────────────┬─────────────┘
//!                     ▼
//!          lsp::registry / lsp::backend
//!                (stdio, WebSocket)
//! ```
//!
//! The core is synchronous and pure: every request re-reads the text, the
//! cursor and the current inputs. The LSP layer only moves data in and out.

pub mod catalog;
pub mod config;
pub mod inputs;
pub mod logging;
pub mod lsp;
pub mod syntax;

pub use catalog::{CatalogEntry, CatalogError, FunctionCatalog};
pub use inputs::{InputItem, InputSource, SharedInputs};
pub use lsp::analysis::context::{resolve_context, CompletionContext, ContextResolution};
pub use lsp::analysis::text::{Position, TextModel, TextRange};
pub use lsp::capabilities::completions::{CompletionList, CompletionProvider};
pub use lsp::capabilities::hover::{HoverContent, HoverProvider};
