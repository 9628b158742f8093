//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An integer setting could not be parsed.
    #[error("failed to parse {name} value '{value}': {source}")]
    IntParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// A float setting could not be parsed.
    #[error("failed to parse {name} value '{value}': {source}")]
    FloatParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// Hybrid blend factor outside `[0, 1]`.
    #[error("invalid hybrid alpha '{value}': must be between 0 and 1")]
    InvalidAlpha { value: String },

    /// Query timeout of zero would fail every retrieval.
    #[error("invalid query timeout '{value}': must be greater than 0 ms")]
    InvalidTimeout { value: String },

    /// Top-k of zero would never return a candidate.
    #[error("invalid top-k '{value}': must be greater than 0")]
    InvalidTopK { value: String },

    /// A required setting was empty.
    #[error("missing required environment variable: {name}")]
    MissingEnvVar { name: &'static str },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a file.
    #[error("path is not a file: {path}")]
    NotAFile { path: PathBuf },
}
