use thiserror::Error;

use crate::store::StoreError;

/// Retrieval failures. None of these reach the caller: the pipeline degrades
/// to local matching instead.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Index unreachable, timed out, or the query could not be embedded.
    #[error("retrieval unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("ground-truth store error: {0}")]
    Store(#[from] StoreError),
}
