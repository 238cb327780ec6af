//! Editor session state
//!
//! Tracks open expression documents, which of them the user is working in,
//! and the last error state the host reported for each. Owned by the
//! backend; nothing here is global.

use std::sync::RwLock;

use dashmap::DashMap;
use tower_lsp::lsp_types::Url;

use super::capabilities::diagnostics::{EditorErrorState, ErrorLevel};
use super::protocol::ErrorStateParams;

/// An open document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub language_id: String,
    pub version: i32,
    pub text: String,
}

#[derive(Default)]
pub struct WorkspaceState {
    documents: DashMap<Url, Document>,
    error_states: DashMap<Url, EditorErrorState>,
    /// Most recently opened or edited document.
    active: RwLock<Option<Url>>,
}

impl WorkspaceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_document(&self, uri: Url, language_id: String, version: i32, text: String) {
        self.documents.insert(
            uri.clone(),
            Document {
                language_id,
                version,
                text,
            },
        );
        self.set_active(Some(uri));
    }

    /// Replace a document's text. Unknown documents are ignored.
    pub fn update_document(&self, uri: &Url, version: i32, text: String) -> bool {
        let updated = match self.documents.get_mut(uri) {
            Some(mut doc) => {
                doc.version = version;
                doc.text = text;
                true
            }
            None => false,
        };
        if updated {
            self.set_active(Some(uri.clone()));
        }
        updated
    }

    pub fn close_document(&self, uri: &Url) {
        self.documents.remove(uri);
        self.error_states.remove(uri);
        let mut active = self.write_active();
        if active.as_ref() == Some(uri) {
            *active = None;
        }
    }

    /// A snapshot of the document. No map lock is held afterwards.
    pub fn document(&self, uri: &Url) -> Option<Document> {
        self.documents.get(uri).map(|doc| doc.value().clone())
    }

    pub fn active_document(&self) -> Option<Url> {
        match self.active.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set_active(&self, uri: Option<Url>) {
        *self.write_active() = uri;
    }

    pub fn set_error_state(&self, uri: Url, state: EditorErrorState) {
        self.error_states.insert(uri, state);
    }

    pub fn error_state(&self, uri: &Url) -> Option<EditorErrorState> {
        self.error_states.get(uri).map(|state| state.value().clone())
    }

    /// Store the state reported for `uri` and build the `expression/errorState`
    /// payload announcing it.
    pub fn record_error_state(&self, uri: Url, state: EditorErrorState) -> ErrorStateParams {
        self.set_error_state(uri.clone(), state.clone());
        ErrorStateParams {
            active: self.active_document().as_ref() == Some(&uri),
            valid: self.is_expression_valid(),
            uri,
            state,
        }
    }

    /// No open document is in an error state.
    pub fn is_expression_valid(&self) -> bool {
        self.error_states
            .iter()
            .all(|state| state.value().level != ErrorLevel::Error)
    }

    /// Forget all documents and editor state.
    pub fn reset(&self) {
        self.documents.clear();
        self.error_states.clear();
        *self.write_active() = None;
    }

    fn write_active(&self) -> std::sync::RwLockWriteGuard<'_, Option<Url>> {
        match self.active.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
