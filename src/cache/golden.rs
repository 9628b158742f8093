//! Golden responses keyed by content fingerprint.
//!
//! The table is loaded once and only read afterwards. A hit returns the
//! stored response without running extraction or retrieval.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use super::GoldenCacheError;
use crate::hashing::Fingerprint;
use crate::model::ExtractionResponse;

/// Read-only fingerprint lookup.
pub trait GoldenLookup: Send + Sync {
    fn get(&self, fingerprint: &Fingerprint) -> Option<ExtractionResponse>;
}

/// In-memory golden table.
#[derive(Debug, Clone, Default)]
pub struct GoldenResponses {
    entries: HashMap<Fingerprint, ExtractionResponse>,
}

impl GoldenResponses {
    /// A table that never hits.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, fingerprint: Fingerprint, response: ExtractionResponse) -> Self {
        self.entries.insert(fingerprint, response);
        self
    }

    /// Parses `{"hashes": {hex: entry}}` or a flat `{hex: entry}` map, where an
    /// entry is a response or `{"response": response}`.
    pub fn from_json_str(json: &str) -> Result<Self, GoldenCacheError> {
        let root: Value = serde_json::from_str(json).map_err(|e| GoldenCacheError::Parse {
            reason: e.to_string(),
        })?;

        let table = match root {
            Value::Object(mut map) => match map.remove("hashes") {
                Some(Value::Object(hashes)) => hashes,
                Some(_) => {
                    return Err(GoldenCacheError::Parse {
                        reason: "'hashes' must be an object".to_string(),
                    });
                }
                None => map,
            },
            _ => {
                return Err(GoldenCacheError::Parse {
                    reason: "golden table must be a JSON object".to_string(),
                });
            }
        };

        let mut entries = HashMap::with_capacity(table.len());
        for (key, mut value) in table {
            let fingerprint = Fingerprint::from_hex(&key)
                .ok_or_else(|| GoldenCacheError::InvalidKey { key: key.clone() })?;

            let body = match value.get_mut("response").map(Value::take) {
                Some(inner) => inner,
                None => value,
            };

            let response: ExtractionResponse =
                serde_json::from_value(body).map_err(|e| GoldenCacheError::InvalidEntry {
                    key: key.clone(),
                    reason: e.to_string(),
                })?;

            entries.insert(fingerprint, response);
        }

        Ok(Self { entries })
    }

    pub fn from_json_file(path: &Path) -> Result<Self, GoldenCacheError> {
        let json = std::fs::read_to_string(path).map_err(|source| GoldenCacheError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_json_str(&json)?;
        info!(path = %path.display(), entries = table.len(), "Golden responses loaded");
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl GoldenLookup for GoldenResponses {
    fn get(&self, fingerprint: &Fingerprint) -> Option<ExtractionResponse> {
        let hit = self.entries.get(fingerprint).cloned();
        debug!(fingerprint = %fingerprint, hit = hit.is_some(), "Golden lookup");
        hit
    }
}
