//! Error types for the realization engine seam.

use nimbus_core::NodeId;
use thiserror::Error;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced while driving a deployment.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Input '{key}' of node {node} has not resolved")]
    UnresolvedInput { node: NodeId, key: String },

    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),

    #[error("Provider failed creating '{name}': {reason}")]
    Create { name: String, reason: String },

    #[error("Published output '{0}' did not resolve")]
    OutputUnresolved(String),

    #[error("Core error: {0}")]
    Core(#[from] nimbus_core::CoreError),
}
