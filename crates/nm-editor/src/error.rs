use nm_core::{ConfigError, ViewError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    #[error("unknown tool {0:?} (expected pointer, addNode or addEdge)")]
    UnknownTool(String),
}

/// The editor could not be built from its configuration.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    View(#[from] ViewError),
}
