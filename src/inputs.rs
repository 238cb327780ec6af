//! Columns and flow variables offered for completion.
//!
//! Inputs change while an editor is open (upstream nodes get reconfigured),
//! so providers hold an [`InputSource`] and read it on every request rather
//! than capturing a list once.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

/// A column or flow variable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputItem {
    pub name: String,
    #[serde(rename = "type", default)]
    pub type_name: String,
    #[serde(default = "default_supported")]
    pub supported: bool,
    /// Fixed completion text that replaces every generated form,
    /// e.g. `$[ROW_ID]`.
    #[serde(default)]
    pub insertion_text: Option<String>,
}

fn default_supported() -> bool {
    true
}

impl InputItem {
    pub fn new(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            supported: true,
            insertion_text: None,
        }
    }

    pub fn unsupported(mut self) -> Self {
        self.supported = false;
        self
    }

    pub fn with_insertion_text(mut self, text: &str) -> Self {
        self.insertion_text = Some(text.to_string());
        self
    }
}

/// A live view of the current inputs.
pub trait InputSource: Send + Sync {
    fn items(&self) -> Vec<InputItem>;
}

impl<F> InputSource for F
where
    F: Fn() -> Vec<InputItem> + Send + Sync,
{
    fn items(&self) -> Vec<InputItem> {
        self()
    }
}

/// Inputs pushed by the host, shared between the server and its providers.
#[derive(Debug, Clone, Default)]
pub struct SharedInputs {
    items: Arc<RwLock<Vec<InputItem>>>,
}

impl SharedInputs {
    pub fn new(items: Vec<InputItem>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }

    pub fn replace(&self, items: Vec<InputItem>) {
        match self.items.write() {
            Ok(mut guard) => *guard = items,
            Err(poisoned) => *poisoned.into_inner() = items,
        }
    }
}

impl InputSource for SharedInputs {
    fn items(&self) -> Vec<InputItem> {
        match self.items.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
