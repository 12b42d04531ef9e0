//! Error types for the core model.

use thiserror::Error;

use crate::resource::NodeId;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while declaring a stack.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Missing required config key: {0}")]
    MissingConfig(String),

    #[error("Config key {0} must be marked secret")]
    NotSecret(String),

    #[error("Output already resolved")]
    AlreadyResolved,

    #[error("Derived output cannot be resolved directly")]
    NotResolvable,

    #[error("Dependency cycle involving node {0}")]
    DependencyCycle(NodeId),

    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
