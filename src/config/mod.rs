//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `MEDGUARD_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{DEFAULT_HYBRID_ALPHA, DEFAULT_QUERY_TIMEOUT, DEFAULT_TOP_K};

/// Pipeline configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `MEDGUARD_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Collection holding the medicine vectors. Default: `medicines`.
    pub collection_name: String,

    /// JSON snapshot of ground-truth records and prescriber history.
    pub ground_truth_path: Option<PathBuf>,

    /// JSON table of golden responses keyed by content fingerprint.
    pub golden_path: Option<PathBuf>,

    /// Deadline for one vector-index query. Default: 1500 ms.
    pub query_timeout: Duration,

    /// Dense weight of the hybrid blend, in `[0, 1]`. Default: `0.75`.
    pub hybrid_alpha: f32,

    /// Raw hits requested per query. Default: `5`.
    pub top_k: u64,
}

/// Default Qdrant URL used when `MEDGUARD_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// Default collection used when `MEDGUARD_COLLECTION` is not set.
pub const DEFAULT_COLLECTION_NAME: &str = "medicines";

impl Default for Config {
    fn default() -> Self {
        Self {
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            ground_truth_path: None,
            golden_path: None,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            hybrid_alpha: DEFAULT_HYBRID_ALPHA,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl Config {
    const ENV_QDRANT_URL: &'static str = "MEDGUARD_QDRANT_URL";
    const ENV_COLLECTION: &'static str = "MEDGUARD_COLLECTION";
    const ENV_GROUND_TRUTH_PATH: &'static str = "MEDGUARD_GROUND_TRUTH_PATH";
    const ENV_GOLDEN_PATH: &'static str = "MEDGUARD_GOLDEN_PATH";
    const ENV_QUERY_TIMEOUT_MS: &'static str = "MEDGUARD_QUERY_TIMEOUT_MS";
    const ENV_HYBRID_ALPHA: &'static str = "MEDGUARD_HYBRID_ALPHA";
    const ENV_TOP_K: &'static str = "MEDGUARD_TOP_K";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let qdrant_url = Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url);
        let collection_name =
            Self::parse_string_from_env(Self::ENV_COLLECTION, defaults.collection_name);
        let ground_truth_path = Self::parse_optional_path_from_env(Self::ENV_GROUND_TRUTH_PATH);
        let golden_path = Self::parse_optional_path_from_env(Self::ENV_GOLDEN_PATH);
        let query_timeout = Self::parse_timeout_from_env(defaults.query_timeout)?;
        let hybrid_alpha = Self::parse_alpha_from_env(defaults.hybrid_alpha)?;
        let top_k = Self::parse_top_k_from_env(defaults.top_k)?;

        Ok(Self {
            qdrant_url,
            collection_name,
            ground_truth_path,
            golden_path,
            query_timeout,
            hybrid_alpha,
            top_k,
        })
    }

    /// Validates paths and numeric invariants (does not contact any service).
    pub fn validate(&self) -> Result<(), ConfigError> {
        for path in [&self.ground_truth_path, &self.golden_path].into_iter().flatten() {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        if !(0.0..=1.0).contains(&self.hybrid_alpha) {
            return Err(ConfigError::InvalidAlpha {
                value: self.hybrid_alpha.to_string(),
            });
        }

        if self.query_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout {
                value: self.query_timeout.as_millis().to_string(),
            });
        }

        if self.top_k == 0 {
            return Err(ConfigError::InvalidTopK {
                value: self.top_k.to_string(),
            });
        }

        if self.collection_name.trim().is_empty() {
            return Err(ConfigError::MissingEnvVar {
                name: Self::ENV_COLLECTION,
            });
        }

        Ok(())
    }

    fn parse_timeout_from_env(default: Duration) -> Result<Duration, ConfigError> {
        match env::var(Self::ENV_QUERY_TIMEOUT_MS) {
            Ok(value) => {
                let millis: u64 = value
                    .trim()
                    .parse()
                    .map_err(|e| ConfigError::IntParseError {
                        name: Self::ENV_QUERY_TIMEOUT_MS,
                        value: value.clone(),
                        source: e,
                    })?;

                if millis == 0 {
                    return Err(ConfigError::InvalidTimeout { value });
                }

                Ok(Duration::from_millis(millis))
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_alpha_from_env(default: f32) -> Result<f32, ConfigError> {
        match env::var(Self::ENV_HYBRID_ALPHA) {
            Ok(value) => {
                let alpha: f32 =
                    value
                        .trim()
                        .parse()
                        .map_err(|e| ConfigError::FloatParseError {
                            name: Self::ENV_HYBRID_ALPHA,
                            value: value.clone(),
                            source: e,
                        })?;

                if !(0.0..=1.0).contains(&alpha) {
                    return Err(ConfigError::InvalidAlpha { value });
                }

                Ok(alpha)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_top_k_from_env(default: u64) -> Result<u64, ConfigError> {
        match env::var(Self::ENV_TOP_K) {
            Ok(value) => {
                let top_k: u64 = value
                    .trim()
                    .parse()
                    .map_err(|e| ConfigError::IntParseError {
                        name: Self::ENV_TOP_K,
                        value: value.clone(),
                        source: e,
                    })?;

                if top_k == 0 {
                    return Err(ConfigError::InvalidTopK { value });
                }

                Ok(top_k)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }
}
