//! Diagnostics translation
//!
//! Expressions are checked by the host. Its diagnostics locate problems by
//! character offsets into the editor text; this module turns them into
//! editor ranges and folds a list of them into one error state.

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString};

use crate::lsp::analysis::text::{TextModel, TextRange};

const DIAGNOSTIC_SOURCE: &str = "kexpr";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    fn to_lsp(self) -> DiagnosticSeverity {
        match self {
            Severity::Error => DiagnosticSeverity::ERROR,
            Severity::Warning => DiagnosticSeverity::WARNING,
            Severity::Info => DiagnosticSeverity::INFORMATION,
            Severity::Hint => DiagnosticSeverity::HINT,
        }
    }
}

/// Character offsets (UTF-16 code units) into the editor text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct DiagnosticSpan {
    pub start: usize,
    pub stop: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionDiagnostic {
    pub message: String,
    #[serde(default)]
    pub short_message: String,
    pub severity: Severity,
    /// `None` for problems with the expression as a whole.
    #[serde(default)]
    pub location: Option<DiagnosticSpan>,
}

/// Worst severity of a diagnostic list. Info and hints do not count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ErrorLevel {
    Ok,
    Warning,
    Error,
}

impl From<Severity> for ErrorLevel {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Error => ErrorLevel::Error,
            Severity::Warning => ErrorLevel::Warning,
            Severity::Info | Severity::Hint => ErrorLevel::Ok,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EditorErrorState {
    pub level: ErrorLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Marker range of a diagnostic. Unlocated diagnostics cover the whole text.
pub fn marker_range(model: &TextModel<'_>, location: Option<DiagnosticSpan>) -> TextRange {
    match location {
        Some(span) => {
            let (start, stop) = if span.start <= span.stop {
                (span.start, span.stop)
            } else {
                (span.stop, span.start)
            };
            TextRange::between(model.position_at(start), model.position_at(stop))
        }
        None => model.full_range(),
    }
}

pub fn to_lsp_diagnostics(
    model: &TextModel<'_>,
    diagnostics: &[ExpressionDiagnostic],
) -> Vec<Diagnostic> {
    diagnostics
        .iter()
        .map(|diagnostic| Diagnostic {
            range: marker_range(model, diagnostic.location).to_lsp(),
            severity: Some(diagnostic.severity.to_lsp()),
            code: (!diagnostic.short_message.is_empty())
                .then(|| NumberOrString::String(diagnostic.short_message.clone())),
            source: Some(DIAGNOSTIC_SOURCE.to_string()),
            message: diagnostic.message.clone(),
            ..Default::default()
        })
        .collect()
}

/// ERROR if any diagnostic is an error, else WARNING if any is a warning,
/// else OK.
pub fn evaluate(diagnostics: &[ExpressionDiagnostic]) -> ErrorLevel {
    diagnostics
        .iter()
        .map(|d| ErrorLevel::from(d.severity))
        .max()
        .unwrap_or(ErrorLevel::Ok)
}

/// Error state carrying the short message of the first diagnostic at the
/// worst level.
pub fn error_state(diagnostics: &[ExpressionDiagnostic]) -> EditorErrorState {
    let level = evaluate(diagnostics);
    if level == ErrorLevel::Ok {
        return EditorErrorState {
            level,
            message: None,
        };
    }
    let message = diagnostics
        .iter()
        .find(|d| ErrorLevel::from(d.severity) == level)
        .map(|d| d.short_message.clone());
    EditorErrorState { level, message }
}
