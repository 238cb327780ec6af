//! TOML-based configuration for kexpr.
//!
//! Supports a config file (kexpr.toml) with environment variable expansion
//! in paths.
//!
//! Example configuration:
//! ```toml
//! [language]
//! id = "knime-expression"
//!
//! [catalog]
//! path = "${KNIME_WORKSPACE}/expression-functions.json"
//!
//! [inputs]
//! columns = [
//!   { name = "price", type = "DOUBLE" },
//!   { name = "ROW_ID", type = "STRING", insertionText = "$[ROW_ID]" },
//! ]
//! flow_variables = [{ name = "threshold", type = "DOUBLE" }]
//!
//! [theme]
//! rules = [{ token = "comment", foreground = "6a9955" }]
//!
//! [server]
//! websocket_addr = "127.0.0.1:9257"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::catalog::{CatalogError, FunctionCatalog};
use crate::inputs::InputItem;
use crate::lsp::BackendConfig;
use crate::syntax::{Theme, ThemeRule};

pub const DEFAULT_LANGUAGE_ID: &str = "knime-expression";
pub const DEFAULT_WEBSOCKET_ADDR: &str = "127.0.0.1:9257";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub language: LanguageSettings,
    pub catalog: CatalogSettings,
    pub inputs: InputSettings,
    pub theme: ThemeSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LanguageSettings {
    /// Language id the providers are registered under.
    pub id: String,
}

impl Default for LanguageSettings {
    fn default() -> Self {
        Self {
            id: DEFAULT_LANGUAGE_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Function catalog JSON (supports ${ENV_VAR} expansion). Without it the
    /// catalog starts empty until the host sends one.
    pub path: Option<String>,
}

/// Inputs offered before the host sends any.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct InputSettings {
    pub columns: Vec<InputItem>,
    pub flow_variables: Vec<InputItem>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeSettings {
    /// Added to the default rules; a rule for an existing scope replaces it.
    pub rules: Vec<ThemeRule>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerSettings {
    pub websocket_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            websocket_addr: DEFAULT_WEBSOCKET_ADDR.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `KEXPR_CONFIG`
    /// 2. `./kexpr.toml`
    /// 3. `~/.config/kexpr/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("KEXPR_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("kexpr.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("kexpr").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// An explicit path wins over the default lookup.
    pub fn load_from(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// The configured catalog, or an empty one when none is configured.
    pub fn load_catalog(&self) -> Result<FunctionCatalog, SettingsError> {
        let Some(path) = &self.catalog.path else {
            return Ok(FunctionCatalog::default());
        };
        let path = expand_env_vars(path)?;
        let catalog = FunctionCatalog::from_file(&path)?;
        tracing::debug!(%path, entries = catalog.functions.len(), "loaded function catalog");
        Ok(catalog)
    }

    /// Default palette with the configured overrides applied.
    pub fn theme(&self) -> Theme {
        Theme::new(&self.language.id).with_overrides(&self.theme.rules)
    }

    pub fn websocket_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.server.websocket_addr.parse().map_err(|_| {
            SettingsError::InvalidConfig(format!(
                "server.websocket_addr is not a socket address: {}",
                self.server.websocket_addr
            ))
        })
    }

    /// Everything the language server starts with.
    pub fn backend_config(&self) -> Result<BackendConfig, SettingsError> {
        Ok(BackendConfig {
            language_id: self.language.id.clone(),
            catalog: self.load_catalog()?,
            columns: self.inputs.columns.clone(),
            flow_variables: self.inputs.flow_variables.clone(),
            theme: self.theme(),
        })
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. A `$` not followed by a name is kept.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(dollar) = rest.find('$') {
        result.push_str(&rest[..dollar]);
        let after = &rest[dollar + 1..];

        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            let end = braced.find('}').ok_or_else(|| {
                SettingsError::InvalidConfig(format!("unterminated variable in {:?}", s))
            })?;
            (&braced[..end], end + 2)
        } else {
            let end = after
                .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..end], end)
        };

        if name.is_empty() && consumed == 0 {
            result.push('$');
        } else {
            let value =
                env::var(name).map_err(|_| SettingsError::MissingEnvVar(name.to_string()))?;
            result.push_str(&value);
        }
        rest = &after[consumed..];
    }

    result.push_str(rest);
    Ok(result)
}
