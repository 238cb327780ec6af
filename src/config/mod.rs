//! Configuration module for kexpr.
//!
//! Handles the settings file, environment variable expansion and the
//! server's startup configuration.

mod settings;

pub use settings::{
    expand_env_vars, CatalogSettings, InputSettings, LanguageSettings, ServerSettings, Settings,
    SettingsError, ThemeSettings, DEFAULT_LANGUAGE_ID, DEFAULT_WEBSOCKET_ADDR,
};
