//! Provider registration
//!
//! Completion and hover providers are registered per language id as one
//! unit and disposed as one unit. Registering a language again replaces its
//! providers; the replaced registration then no longer owns the slot and
//! unregistering it is a no-op.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use super::capabilities::completions::CompletionProvider;
use super::capabilities::hover::HoverProvider;
use crate::catalog::FunctionCatalog;
use crate::inputs::InputSource;

/// What a language registration is built from.
#[derive(Clone)]
pub struct RegistrationOptions {
    pub language_id: String,
    pub catalog: Arc<FunctionCatalog>,
    /// Read on every completion request.
    pub columns: Arc<dyn InputSource>,
    /// Read on every completion request.
    pub flow_variables: Arc<dyn InputSource>,
}

/// The providers registered for one language.
#[derive(Clone)]
pub struct LanguageProviders {
    pub completion: Arc<CompletionProvider>,
    pub hover: Arc<HoverProvider>,
}

impl LanguageProviders {
    fn new(options: &RegistrationOptions) -> Self {
        Self {
            completion: Arc::new(CompletionProvider::new(
                &options.catalog,
                options.columns.clone(),
                options.flow_variables.clone(),
            )),
            hover: Arc::new(HoverProvider::new(options.catalog.clone())),
        }
    }
}

#[derive(Clone, Default)]
pub struct LanguageRegistry {
    entries: Arc<DashMap<String, (u64, LanguageProviders)>>,
    next_id: Arc<AtomicU64>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register completion and hover providers for `options.language_id`.
    /// They stay registered until the returned handle is unregistered or
    /// dropped.
    #[must_use = "dropping the registration unregisters the providers"]
    pub fn register(&self, options: RegistrationOptions) -> Registration {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let providers = LanguageProviders::new(&options);
        let replaced = self
            .entries
            .insert(options.language_id.clone(), (id, providers))
            .is_some();
        tracing::info!(
            language = %options.language_id,
            entries = options.catalog.functions.len(),
            replaced,
            "registered language providers"
        );
        Registration {
            entries: self.entries.clone(),
            language_id: options.language_id,
            id,
            active: true,
        }
    }

    pub fn providers(&self, language_id: &str) -> Option<LanguageProviders> {
        self.entries
            .get(language_id)
            .map(|entry| entry.value().1.clone())
    }

    pub fn is_registered(&self, language_id: &str) -> bool {
        self.entries.contains_key(language_id)
    }
}

/// Handle to a registration. Unregistering removes completion and hover
/// together.
pub struct Registration {
    entries: Arc<DashMap<String, (u64, LanguageProviders)>>,
    language_id: String,
    id: u64,
    active: bool,
}

impl Registration {
    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    /// Remove the providers, unless a later registration replaced them.
    /// Returns whether anything was removed.
    pub fn unregister(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        let id = self.id;
        let removed = self
            .entries
            .remove_if(&self.language_id, |_, (owner, _)| *owner == id)
            .is_some();
        tracing::debug!(language = %self.language_id, removed, "unregistered language providers");
        removed
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.unregister();
    }
}
