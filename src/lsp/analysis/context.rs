//! Completion context detection
//!
//! Decides whether completion applies at the cursor and which text a chosen
//! suggestion replaces. Accessor delimiters already typed around the cursor
//! (`$["` before it, `"]` after it) belong to the replaced range, so
//! accepting `$["name"]` never duplicates them.

use serde::Serialize;

use super::text::{utf16_len, Position, TextModel, TextRange};
use crate::syntax::rules::{
    accessor_opening_before, closing_delimiter_len, open_string_at_end, AccessorKind, Quote,
};

/// Which accessor kinds a context asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AccessorScope {
    /// A lone `$` may still become either kind.
    Any,
    Columns,
    FlowVariables,
}

impl AccessorScope {
    pub fn includes(self, kind: AccessorKind) -> bool {
        match self {
            AccessorScope::Any => true,
            AccessorScope::Columns => kind == AccessorKind::Column,
            AccessorScope::FlowVariables => kind == AccessorKind::FlowVariable,
        }
    }
}

impl From<AccessorKind> for AccessorScope {
    fn from(kind: AccessorKind) -> Self {
        match kind {
            AccessorKind::Column => AccessorScope::Columns,
            AccessorKind::FlowVariable => AccessorScope::FlowVariables,
        }
    }
}

/// What the text before the cursor looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum CompletionTrigger {
    /// A plain word (possibly empty).
    Word,
    /// `&`, `|`, `!`, `&&` or `||`.
    LogicalOperator,
    /// `$`, `$$`, or a bracket opening such as `$$['`.
    Accessor { scope: AccessorScope, bracket: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletionContext {
    /// Text replaced by the accepted suggestion.
    pub range: TextRange,
    /// Quote used for bracket-form suggestions.
    pub quote: Quote,
    pub trigger: CompletionTrigger,
}

impl CompletionContext {
    /// Bracket forms of `kind` fit this context.
    pub fn accepts_bracket_form(&self, kind: AccessorKind) -> bool {
        match self.trigger {
            CompletionTrigger::Accessor { scope, .. } => scope.includes(kind),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextResolution {
    Suggest(CompletionContext),
    /// The cursor is inside a string literal; show nothing.
    Suppress,
}

/// Resolve the completion context at `position`.
pub fn resolve_context(model: &TextModel<'_>, position: Position) -> ContextResolution {
    let position = model.validate_position(position);
    let context = detect_context(model, position);

    // Text that the completion would replace is not part of the check, so
    // `"$["` still counts as being inside the string.
    let text_before = model.value_in_range(TextRange::between(
        Position::new(1, 1),
        context.range.start(),
    ));
    if open_string_at_end(text_before).is_some() {
        return ContextResolution::Suppress;
    }
    ContextResolution::Suggest(context)
}

fn detect_context(model: &TextModel<'_>, position: Position) -> CompletionContext {
    let (before, after) = model.split_line_at(position);

    if let Some(opening) = accessor_opening_before(before) {
        let typed = utf16_len(&before[before.len() - opening.len..]);
        let closing = closing_delimiter_len(after, opening.quote);
        return CompletionContext {
            range: relative_range(position, typed, utf16_len(&after[..closing])),
            quote: opening.quote.unwrap_or_default(),
            trigger: CompletionTrigger::Accessor {
                scope: opening.kind.into(),
                bracket: true,
            },
        };
    }

    let simple = |chars_before: u32, trigger: CompletionTrigger| CompletionContext {
        range: relative_range(position, chars_before, 0),
        quote: Quote::default(),
        trigger,
    };

    if before.ends_with("$$") {
        return simple(
            2,
            CompletionTrigger::Accessor {
                scope: AccessorScope::FlowVariables,
                bracket: false,
            },
        );
    }
    if before.ends_with('$') {
        return simple(
            1,
            CompletionTrigger::Accessor {
                scope: AccessorScope::Any,
                bracket: false,
            },
        );
    }
    if before.ends_with("&&") || before.ends_with("||") {
        return simple(2, CompletionTrigger::LogicalOperator);
    }
    if before.ends_with(['&', '|', '!']) {
        return simple(1, CompletionTrigger::LogicalOperator);
    }

    let word = model.word_until_position(position);
    CompletionContext {
        range: TextRange::on_line(position.line, word.start_column, position.column),
        quote: Quote::default(),
        trigger: CompletionTrigger::Word,
    }
}

/// A range on the cursor line reaching `chars_before` columns back and
/// `chars_after` columns forward. The start never goes below column 1.
fn relative_range(position: Position, chars_before: u32, chars_after: u32) -> TextRange {
    TextRange::on_line(
        position.line,
        position.column.saturating_sub(chars_before).max(1),
        position.column + chars_after,
    )
}
