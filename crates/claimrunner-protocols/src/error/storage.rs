//! Durable storage errors.

use thiserror::Error;

/// Errors from a claimed-id storage backend.
///
/// Callers of the claimed set never see these: they are logged and the set
/// degrades to in-memory behavior.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Watch error: {0}")]
    Watch(String),
}
