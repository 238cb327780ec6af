//! Expression language server
//!
//! Standard requests are answered by the providers registered for the
//! document's language. The host pushes inputs, the catalog and
//! diagnostics through the extension methods in [`super::protocol`].

use std::sync::Arc;

use tokio::sync::Mutex;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use super::analysis::text::{Position as EditorPosition, TextModel};
use super::capabilities::completions::{to_lsp_items, TRIGGER_CHARACTERS};
use super::capabilities::diagnostics::{error_state, to_lsp_diagnostics};
use super::capabilities::hover::to_lsp_hover;
use super::capabilities::semantic_tokens::{semantic_token_legend, semantic_tokens_full};
use super::protocol::{
    ErrorStateNotification, PublishExpressionDiagnosticsParams,
    SetCatalogParams, SetInputsParams,
};
use super::registry::{LanguageRegistry, Registration, RegistrationOptions};
use super::workspace::WorkspaceState;
use crate::catalog::FunctionCatalog;
use crate::inputs::{InputItem, SharedInputs};
use crate::syntax::Theme;

/// What the server starts with before the host sends anything.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub language_id: String,
    pub catalog: FunctionCatalog,
    pub columns: Vec<InputItem>,
    pub flow_variables: Vec<InputItem>,
    pub theme: Theme,
}

/// The LSP backend state.
pub struct LspBackend {
    client: Client,
    language_id: String,
    workspace: WorkspaceState,
    registry: LanguageRegistry,
    /// Replaced whenever the catalog changes.
    registration: Mutex<Option<Registration>>,
    columns: SharedInputs,
    flow_variables: SharedInputs,
    theme: Theme,
}

impl LspBackend {
    pub fn new(client: Client, config: BackendConfig) -> Self {
        let registry = LanguageRegistry::new();
        let columns = SharedInputs::new(config.columns);
        let flow_variables = SharedInputs::new(config.flow_variables);
        let registration = registry.register(RegistrationOptions {
            language_id: config.language_id.clone(),
            catalog: Arc::new(config.catalog),
            columns: Arc::new(columns.clone()),
            flow_variables: Arc::new(flow_variables.clone()),
        });
        Self {
            client,
            language_id: config.language_id,
            workspace: WorkspaceState::new(),
            registry,
            registration: Mutex::new(Some(registration)),
            columns,
            flow_variables,
            theme: config.theme,
        }
    }

    /// `expression/setInputs`
    pub async fn set_inputs(&self, params: SetInputsParams) {
        if let Some(columns) = params.columns {
            tracing::debug!(count = columns.len(), "columns replaced");
            self.columns.replace(columns);
        }
        if let Some(flow_variables) = params.flow_variables {
            tracing::debug!(count = flow_variables.len(), "flow variables replaced");
            self.flow_variables.replace(flow_variables);
        }
    }

    /// `expression/setCatalog`
    pub async fn set_catalog(&self, params: SetCatalogParams) {
        let mut registration = self.registration.lock().await;
        // The new registration takes over the slot, so dropping the old
        // handle below removes nothing.
        *registration = Some(self.registry.register(RegistrationOptions {
            language_id: self.language_id.clone(),
            catalog: Arc::new(params.catalog),
            columns: Arc::new(self.columns.clone()),
            flow_variables: Arc::new(self.flow_variables.clone()),
        }));
        self.client
            .log_message(MessageType::INFO, "Function catalog updated")
            .await;
    }

    /// `expression/publishDiagnostics`
    pub async fn publish_expression_diagnostics(&self, params: PublishExpressionDiagnosticsParams) {
        let Some(doc) = self.workspace.document(&params.uri) else {
            tracing::warn!(uri = %params.uri, "diagnostics for unknown document");
            return;
        };

        let model = TextModel::new(&doc.text);
        let diagnostics = to_lsp_diagnostics(&model, &params.diagnostics);
        let state = error_state(&params.diagnostics);
        tracing::debug!(uri = %params.uri, level = ?state.level, count = diagnostics.len(), "diagnostics");

        let notification = self.workspace.record_error_state(params.uri.clone(), state);
        tracing::debug!(
            valid = notification.valid,
            active = notification.active,
            "workspace error state"
        );
        self.client
            .publish_diagnostics(params.uri, diagnostics, Some(doc.version))
            .await;
        self.client
            .send_notification::<ErrorStateNotification>(notification)
            .await;
    }

    /// `expression/theme`
    pub async fn theme(&self) -> Result<Theme> {
        Ok(self.theme.clone())
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for LspBackend {
    async fn initialize(&self, _params: InitializeParams) -> Result<InitializeResult> {
        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(
                        TRIGGER_CHARACTERS.iter().map(|c| c.to_string()).collect(),
                    ),
                    resolve_provider: Some(false),
                    ..Default::default()
                }),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                semantic_tokens_provider: Some(
                    SemanticTokensServerCapabilities::SemanticTokensOptions(
                        SemanticTokensOptions {
                            legend: semantic_token_legend(),
                            full: Some(SemanticTokensFullOptions::Bool(true)),
                            range: None,
                            ..Default::default()
                        },
                    ),
                ),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "kexpr".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "Expression language server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        self.workspace.reset();
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        if !self.registry.is_registered(&doc.language_id) {
            tracing::debug!(uri = %doc.uri, language = %doc.language_id, "no providers for language");
        }
        self.workspace
            .open_document(doc.uri.clone(), doc.language_id, doc.version, doc.text);

        self.client
            .log_message(MessageType::LOG, format!("Opened expression document {}", doc.uri))
            .await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        // Full sync: the single change is the whole text
        if let Some(change) = params.content_changes.into_iter().next() {
            if !self.workspace.update_document(&uri, version, change.text) {
                tracing::warn!(%uri, "change for unknown document");
            }
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;

        self.client
            .publish_diagnostics(uri.clone(), vec![], None)
            .await;

        self.workspace.close_document(&uri);

        self.client
            .log_message(MessageType::LOG, format!("Closed expression document {}", uri))
            .await;
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;
        let position = EditorPosition::from_lsp(params.text_document_position.position);

        let Some(doc) = self.workspace.document(uri) else {
            return Ok(None);
        };
        let Some(providers) = self.registry.providers(&doc.language_id) else {
            return Ok(None);
        };

        let model = TextModel::new(&doc.text);
        let Some(list) = providers.completion.provide(&model, position) else {
            return Ok(None);
        };

        Ok(Some(CompletionResponse::List(CompletionList {
            is_incomplete: false,
            items: to_lsp_items(&list),
        })))
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = EditorPosition::from_lsp(params.text_document_position_params.position);

        let Some(doc) = self.workspace.document(uri) else {
            return Ok(None);
        };
        let Some(providers) = self.registry.providers(&doc.language_id) else {
            return Ok(None);
        };

        let model = TextModel::new(&doc.text);
        Ok(providers.hover.provide(&model, position).map(to_lsp_hover))
    }

    async fn semantic_tokens_full(
        &self,
        params: SemanticTokensParams,
    ) -> Result<Option<SemanticTokensResult>> {
        let Some(doc) = self.workspace.document(&params.text_document.uri) else {
            return Ok(None);
        };
        Ok(Some(SemanticTokensResult::Tokens(semantic_tokens_full(
            &doc.text,
        ))))
    }
}
