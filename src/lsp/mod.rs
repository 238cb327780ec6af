//! Language Server Protocol front end for expression editors

pub mod analysis;
pub mod backend;
pub mod capabilities;
pub mod protocol;
pub mod registry;
pub mod transport;
pub mod workspace;

// Re-export main entry points
pub use backend::{BackendConfig, LspBackend};
pub use registry::{LanguageProviders, LanguageRegistry, Registration, RegistrationOptions};
pub use transport::{build_service, run_stdio, run_websocket};
pub use workspace::WorkspaceState;
