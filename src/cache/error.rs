use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors loading the golden-response table.
pub enum GoldenCacheError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("golden table is not valid JSON: {reason}")]
    Parse { reason: String },

    /// A key is not a 64-character hex fingerprint.
    #[error("invalid fingerprint key '{key}'")]
    InvalidKey { key: String },

    #[error("invalid golden response for '{key}': {reason}")]
    InvalidEntry { key: String, reason: String },
}
