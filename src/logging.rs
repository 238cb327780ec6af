//! Logging setup for the `kexpr` binary.
//!
//! The filter comes from `KEXPR_LOG`, falling back to `RUST_LOG`, and
//! defaults to `warn`. `KEXPR_LOG_FORMAT=json` switches to one JSON object
//! per event.
//!
//! ```bash
//! KEXPR_LOG=kexpr::lsp=debug kexpr lsp
//! KEXPR_LOG=trace KEXPR_LOG_FORMAT=json kexpr complete expr.txt --line 1 --column 5
//! ```
//!
//! Everything is written to stderr; stdout carries LSP JSON-RPC and
//! command output.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Registry};

const DEFAULT_FILTER: &str = "warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("KEXPR_LOG_FORMAT").unwrap_or_default())
    }
}

fn build_filter() -> EnvFilter {
    let directives = std::env::var("KEXPR_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    EnvFilter::builder().parse_lossy(directives)
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging() {
    let filter = build_filter();
    let installed = match LogFormat::from_env() {
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default()
                .with(filter)
                .with(json_layer)
                .try_init()
                .is_ok()
        }
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
    };
    if !installed {
        tracing::debug!("tracing subscriber already installed");
    }
}
