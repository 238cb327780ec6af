//! Protocol extensions between the host application and the server.
//!
//! The host owns the function catalog, the current inputs and expression
//! checking; these messages carry them into the server and carry the
//! resulting editor state back.

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::notification::Notification;
use tower_lsp::lsp_types::Url;

use super::capabilities::diagnostics::{EditorErrorState, ExpressionDiagnostic};
use crate::catalog::FunctionCatalog;
use crate::inputs::InputItem;

pub const SET_INPUTS: &str = "expression/setInputs";
pub const SET_CATALOG: &str = "expression/setCatalog";
pub const PUBLISH_DIAGNOSTICS: &str = "expression/publishDiagnostics";
/// Request without params; answered with the active theme.
pub const THEME: &str = "expression/theme";

/// Replace the inputs. An absent list leaves that kind unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetInputsParams {
    #[serde(default)]
    pub columns: Option<Vec<InputItem>>,
    #[serde(default)]
    pub flow_variables: Option<Vec<InputItem>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SetCatalogParams {
    pub catalog: FunctionCatalog,
}

/// Diagnostics computed by the host for one document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PublishExpressionDiagnosticsParams {
    pub uri: Url,
    pub diagnostics: Vec<ExpressionDiagnostic>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorStateParams {
    pub uri: Url,
    #[serde(flatten)]
    pub state: EditorErrorState,
    /// No open document is in an error state.
    pub valid: bool,
    /// `uri` is the document the user is working in.
    pub active: bool,
}

/// Sent after each diagnostics update with the document's error state.
pub enum ErrorStateNotification {}

impl Notification for ErrorStateNotification {
    type Params = ErrorStateParams;
    const METHOD: &'static str = "expression/errorState";
}
