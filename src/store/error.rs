use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("ground-truth record not found: {id}")]
    RecordNotFound { id: String },

    #[error("ground-truth store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("failed to load ground truth from {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
