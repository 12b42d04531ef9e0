//! Error types for Azure declarations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Azure declaration operations.
pub type AzureResult<T> = Result<T, AzureError>;

/// Errors that can occur while declaring Azure resources.
#[derive(Error, Debug)]
pub enum AzureError {
    #[error("Invalid resource name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Archive path not found: {0}")]
    ArchiveNotFound(PathBuf),

    #[error("Archive path is not a directory: {0}")]
    ArchiveNotDirectory(PathBuf),

    #[error("Core error: {0}")]
    Core(#[from] nimbus_core::CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
