//! Function catalog data model.
//!
//! The catalog is supplied by the host as JSON and describes every function
//! and constant of the language:
//!
//! ```json
//! {
//!   "categories": [{ "name": "Math", "fullName": "Math -- Math Operations" }],
//!   "functions": [
//!     { "entryType": "function", "name": "abs", "category": "Math -- Math Operations",
//!       "keywords": ["absolute"], "description": "...", "returnType": "NUMBER",
//!       "arguments": [{ "name": "x", "type": "NUMBER", "description": "a number" }] },
//!     { "entryType": "constant", "name": "PI", "category": "Math -- Constants",
//!       "keywords": [], "description": "...", "returnType": "FLOAT" }
//!   ]
//! }
//! ```

mod browse;
mod markdown;

pub use browse::{CategoryGroup, MetaCategoryGroup};
pub use markdown::{category_markdown, entry_markdown};

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Error type for catalog loading.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read function catalog: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse function catalog: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// A catalog category.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    /// Name qualified by the meta category, e.g. `Math -- Math Operations`.
    /// Entries refer to their category by this name.
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub meta_category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Category {
    /// The name entries use to refer to this category.
    pub fn key(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.name)
    }
}

/// A function argument.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Argument {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub vararg: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEntry {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub description: String,
    pub arguments: Vec<Argument>,
    pub return_type: String,
    #[serde(default)]
    pub return_description: Option<String>,
    #[serde(default)]
    pub examples: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstantEntry {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub description: String,
    pub return_type: String,
}

/// A catalog entry, tagged by `entryType` in JSON.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "entryType", rename_all = "lowercase")]
pub enum CatalogEntry {
    Function(FunctionEntry),
    Constant(ConstantEntry),
}

impl CatalogEntry {
    pub fn name(&self) -> &str {
        match self {
            CatalogEntry::Function(f) => &f.name,
            CatalogEntry::Constant(c) => &c.name,
        }
    }

    pub fn category(&self) -> &str {
        match self {
            CatalogEntry::Function(f) => &f.category,
            CatalogEntry::Constant(c) => &c.category,
        }
    }

    pub fn keywords(&self) -> &[String] {
        match self {
            CatalogEntry::Function(f) => &f.keywords,
            CatalogEntry::Constant(c) => &c.keywords,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            CatalogEntry::Function(f) => &f.description,
            CatalogEntry::Constant(c) => &c.description,
        }
    }

    pub fn return_type(&self) -> &str {
        match self {
            CatalogEntry::Function(f) => &f.return_type,
            CatalogEntry::Constant(c) => &c.return_type,
        }
    }
}

/// The complete catalog as delivered by the host.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FunctionCatalog {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub functions: Vec<CatalogEntry>,
}

impl FunctionCatalog {
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Look up an entry by exact name.
    pub fn find(&self, name: &str) -> Option<&CatalogEntry> {
        self.functions.iter().find(|entry| entry.name() == name)
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
