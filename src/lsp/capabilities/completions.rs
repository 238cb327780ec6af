//! textDocument/completion handler
//!
//! Always offers the full candidate set for the resolved context and leaves
//! filtering by the typed text to the editor. The context decides the
//! replaced range, the quote of bracket forms, and whether anything is
//! offered at all.

use std::sync::Arc;

use serde::Serialize;
use tower_lsp::lsp_types::{
    CompletionItem, CompletionTextEdit, Documentation, MarkupContent, MarkupKind, TextEdit,
};

use super::candidates::{
    catalog_candidates, input_completions, keyword_candidates, operator_candidates,
    CompletionCandidate,
};
use crate::catalog::FunctionCatalog;
use crate::inputs::{InputItem, InputSource};
use crate::lsp::analysis::context::{
    resolve_context, CompletionContext, CompletionTrigger, ContextResolution,
};
use crate::lsp::analysis::text::{Position, TextModel, TextRange};
use crate::syntax::rules::{AccessorKind, Quote};

/// Characters that open the completion popup.
pub const TRIGGER_CHARACTERS: [&str; 7] = ["$", "[", "\"", "'", "&", "|", "!"];

/// Result of one completion request. `range` applies to every item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionList {
    pub range: TextRange,
    pub quote: Quote,
    pub trigger: CompletionTrigger,
    pub items: Vec<CompletionCandidate>,
}

pub struct CompletionProvider {
    /// Functions and constants, built once per catalog.
    catalog_items: Vec<CompletionCandidate>,
    /// Operators and keywords.
    trailing_items: Vec<CompletionCandidate>,
    columns: Arc<dyn InputSource>,
    flow_variables: Arc<dyn InputSource>,
}

impl CompletionProvider {
    pub fn new(
        catalog: &FunctionCatalog,
        columns: Arc<dyn InputSource>,
        flow_variables: Arc<dyn InputSource>,
    ) -> Self {
        let mut trailing_items = operator_candidates();
        trailing_items.extend(keyword_candidates());
        Self {
            catalog_items: catalog_candidates(&catalog.functions),
            trailing_items,
            columns,
            flow_variables,
        }
    }

    /// Completions at `position`, or `None` inside a string literal.
    pub fn provide(&self, model: &TextModel<'_>, position: Position) -> Option<CompletionList> {
        let context = match resolve_context(model, position) {
            ContextResolution::Suggest(context) => context,
            ContextResolution::Suppress => {
                tracing::trace!(?position, "completion suppressed inside string literal");
                return None;
            }
        };

        let mut items = self.catalog_items.clone();
        items.extend(input_items(
            &self.columns.items(),
            AccessorKind::Column,
            &context,
        ));
        items.extend(input_items(
            &self.flow_variables.items(),
            AccessorKind::FlowVariable,
            &context,
        ));
        items.extend(self.trailing_items.iter().cloned());

        tracing::debug!(
            ?position,
            trigger = ?context.trigger,
            quote = %context.quote,
            count = items.len(),
            "completion"
        );

        Some(CompletionList {
            range: context.range,
            quote: context.quote,
            trigger: context.trigger,
            items,
        })
    }
}

/// Input forms that fit the context: the bracket form for the context's quote
/// (when the accessor kind is wanted) followed by quote-independent forms.
fn input_items(
    items: &[InputItem],
    kind: AccessorKind,
    context: &CompletionContext,
) -> Vec<CompletionCandidate> {
    input_completions(items, kind)
        .iter()
        .flat_map(|form| {
            let bracket = form
                .bracket_form(context.quote)
                .filter(|(kind, _)| context.accepts_bracket_form(*kind))
                .map(|(_, candidate)| candidate);
            bracket.into_iter().chain(form.quote_independent()).cloned()
        })
        .collect()
}

/// Convert to LSP items. Every item replaces the list's range, and sort
/// text keeps the provider's order.
pub fn to_lsp_items(list: &CompletionList) -> Vec<CompletionItem> {
    let range = list.range.to_lsp();
    list.items
        .iter()
        .enumerate()
        .map(|(idx, candidate)| CompletionItem {
            label: candidate.label.clone(),
            kind: Some(candidate.kind.to_lsp()),
            detail: candidate.detail.clone(),
            documentation: candidate.documentation.as_ref().map(|value| {
                Documentation::MarkupContent(MarkupContent {
                    kind: MarkupKind::Markdown,
                    value: value.clone(),
                })
            }),
            sort_text: Some(format!("{:05}", idx)),
            filter_text: candidate.filter_text.clone(),
            insert_text_format: Some(candidate.insert_text_format()),
            text_edit: Some(CompletionTextEdit::Edit(TextEdit {
                range,
                new_text: candidate.insert_text.clone(),
            })),
            ..Default::default()
        })
        .collect()
}
