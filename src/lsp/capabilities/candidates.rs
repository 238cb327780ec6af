//! Completion candidates built from the catalog and the current inputs.
//!
//! Candidates carry no range; the completion handler attaches the range of
//! the resolved context to every candidate of one request.

use serde::Serialize;
use tower_lsp::lsp_types::{CompletionItemKind, InsertTextFormat};

use crate::catalog::{entry_markdown, CatalogEntry, FunctionEntry};
use crate::inputs::InputItem;
use crate::syntax::rules::{is_identifier, AccessorKind, Quote};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CandidateKind {
    Function,
    Constant,
    Variable,
    Operator,
    Keyword,
}

impl CandidateKind {
    pub fn to_lsp(self) -> CompletionItemKind {
        match self {
            CandidateKind::Function => CompletionItemKind::FUNCTION,
            CandidateKind::Constant => CompletionItemKind::CONSTANT,
            CandidateKind::Variable => CompletionItemKind::VARIABLE,
            CandidateKind::Operator => CompletionItemKind::OPERATOR,
            CandidateKind::Keyword => CompletionItemKind::KEYWORD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionCandidate {
    pub label: String,
    pub insert_text: String,
    pub kind: CandidateKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_text: Option<String>,
    /// `insert_text` uses snippet placeholders.
    pub is_snippet: bool,
}

impl CompletionCandidate {
    fn plain(label: &str, kind: CandidateKind) -> Self {
        Self {
            label: label.to_string(),
            insert_text: label.to_string(),
            kind,
            documentation: None,
            detail: None,
            filter_text: None,
            is_snippet: false,
        }
    }

    pub fn insert_text_format(&self) -> InsertTextFormat {
        if self.is_snippet {
            InsertTextFormat::SNIPPET
        } else {
            InsertTextFormat::PLAIN_TEXT
        }
    }
}

/// Escape snippet metacharacters inside a placeholder.
fn escape_placeholder(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '$' | '}' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `name(${1:a}, ${2:b})`: tab stops over the argument names.
pub fn function_snippet(function: &FunctionEntry) -> String {
    let placeholders = function
        .arguments
        .iter()
        .enumerate()
        .map(|(idx, arg)| format!("${{{}:{}}}", idx + 1, escape_placeholder(&arg.name)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{}({})", function.name, placeholders)
}

/// Candidates for every function and constant, in catalog order.
pub fn catalog_candidates(entries: &[CatalogEntry]) -> Vec<CompletionCandidate> {
    entries
        .iter()
        .map(|entry| match entry {
            CatalogEntry::Function(function) => {
                let ellipsis = if function.arguments.is_empty() { "" } else { "..." };
                CompletionCandidate {
                    label: format!("{}({})", function.name, ellipsis),
                    insert_text: function_snippet(function),
                    kind: CandidateKind::Function,
                    documentation: Some(entry_markdown(entry)),
                    detail: None,
                    filter_text: None,
                    is_snippet: true,
                }
            }
            CatalogEntry::Constant(constant) => CompletionCandidate {
                documentation: Some(entry_markdown(entry)),
                detail: Some(format!("Type: {}", constant.return_type)),
                ..CompletionCandidate::plain(&constant.name, CandidateKind::Constant)
            },
        })
        .collect()
}

/// `and`, `or` and `not`, each once plainly and once under its symbolic
/// spelling so that typing `&&` still finds `and`.
pub fn operator_candidates() -> Vec<CompletionCandidate> {
    [("and", "&&"), ("or", "||"), ("not", "!")]
        .into_iter()
        .flat_map(|(word, symbol)| {
            let plain = CompletionCandidate {
                documentation: Some(format!("Logical '{}' operator", word)),
                ..CompletionCandidate::plain(word, CandidateKind::Operator)
            };
            let aliased = CompletionCandidate {
                filter_text: Some(symbol.to_string()),
                ..plain.clone()
            };
            [plain, aliased]
        })
        .collect()
}

/// The literal keywords `TRUE`, `FALSE` and `MISSING`.
pub fn keyword_candidates() -> Vec<CompletionCandidate> {
    [
        ("TRUE", "Boolean true"),
        ("FALSE", "Boolean false"),
        ("MISSING", "The missing value"),
    ]
    .into_iter()
    .map(|(word, doc)| CompletionCandidate {
        documentation: Some(doc.to_string()),
        ..CompletionCandidate::plain(word, CandidateKind::Keyword)
    })
    .collect()
}

/// Completion forms of one input item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCompletion {
    /// The item's own insertion text, e.g. `$[ROW_ID]`.
    Fixed(CompletionCandidate),
    Accessor {
        kind: AccessorKind,
        /// `$name`, only for identifier-shaped names.
        shorthand: Option<CompletionCandidate>,
        double_quoted: CompletionCandidate,
        single_quoted: CompletionCandidate,
    },
}

impl InputCompletion {
    /// Forms that do not depend on a quote.
    pub fn quote_independent(&self) -> Option<&CompletionCandidate> {
        match self {
            InputCompletion::Fixed(candidate) => Some(candidate),
            InputCompletion::Accessor { shorthand, .. } => shorthand.as_ref(),
        }
    }

    /// The bracket form for `quote`, if this item has bracket forms.
    pub fn bracket_form(&self, quote: Quote) -> Option<(AccessorKind, &CompletionCandidate)> {
        match self {
            InputCompletion::Fixed(_) => None,
            InputCompletion::Accessor {
                kind,
                double_quoted,
                single_quoted,
                ..
            } => Some((
                *kind,
                match quote {
                    Quote::Double => double_quoted,
                    Quote::Single => single_quoted,
                },
            )),
        }
    }
}

/// `$["name"]`, `$$['name']`, ...
pub fn bracket_accessor(kind: AccessorKind, name: &str, quote: Quote) -> String {
    format!("{}[{q}{}{q}]", kind.prefix(), quote.escape(name), q = quote.as_char())
}

fn input_candidate(text: String, item: &InputItem) -> CompletionCandidate {
    CompletionCandidate {
        detail: Some(format!("Type: {}", item.type_name)),
        ..CompletionCandidate::plain(&text, CandidateKind::Variable)
    }
}

/// Completion forms for the supported items. Unsupported items are dropped.
pub fn input_completions(items: &[InputItem], kind: AccessorKind) -> Vec<InputCompletion> {
    items
        .iter()
        .filter(|item| item.supported)
        .map(|item| match &item.insertion_text {
            Some(text) if !text.is_empty() => {
                InputCompletion::Fixed(input_candidate(text.clone(), item))
            }
            _ => InputCompletion::Accessor {
                kind,
                shorthand: is_identifier(&item.name)
                    .then(|| input_candidate(format!("{}{}", kind.prefix(), item.name), item)),
                double_quoted: input_candidate(
                    bracket_accessor(kind, &item.name, Quote::Double),
                    item,
                ),
                single_quoted: input_candidate(
                    bracket_accessor(kind, &item.name, Quote::Single),
                    item,
                ),
            },
        })
        .collect()
}
