//! Read-only ground-truth medicine store.
//!
//! Records and prescriber history are loaded once and never written by the
//! pipeline. [`GroundTruthStore`] is the seam; [`InMemoryGroundTruth`] is the
//! bundled implementation, loaded from a JSON snapshot.

mod error;

#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::future::Future;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

pub use error::StoreError;

use crate::model::MedicineRecord;
use crate::normalize::brand_key;

/// Ground-truth lookups used by retrieval and degraded matching.
pub trait GroundTruthStore: Send + Sync {
    /// Fetches a record by id (`RecordNotFound` if absent).
    fn lookup_record(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<MedicineRecord, StoreError>> + Send;

    /// Record ids the prescriber has dispensed before.
    fn lookup_priors(
        &self,
        prescriber_id: &str,
    ) -> impl Future<Output = Result<HashSet<String>, StoreError>> + Send;

    /// Every record whose [`brand_key`] equals `key`. Never truncated.
    fn lookup_brand(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Vec<MedicineRecord>, StoreError>> + Send;

    /// Records whose brand or generic name contains `term` (case-insensitive).
    fn search_text(
        &self,
        term: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<MedicineRecord>, StoreError>> + Send;
}

#[derive(Debug, Deserialize)]
struct PrescriberHistoryRow {
    prescriber_id: String,
    record_id: String,
}

#[derive(Debug, Deserialize)]
struct Snapshot {
    records: Vec<MedicineRecord>,
    #[serde(default)]
    prescriber_history: Vec<PrescriberHistoryRow>,
}

/// In-memory store ordered by record id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGroundTruth {
    records: BTreeMap<String, MedicineRecord>,
    priors: HashMap<String, HashSet<String>>,
}

impl InMemoryGroundTruth {
    pub fn new(records: impl IntoIterator<Item = MedicineRecord>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.id.clone(), r)).collect(),
            priors: HashMap::new(),
        }
    }

    /// Associates a prescriber with a previously dispensed record.
    pub fn with_prior(mut self, prescriber_id: &str, record_id: &str) -> Self {
        self.priors
            .entry(prescriber_id.to_string())
            .or_default()
            .insert(record_id.to_string());
        self
    }

    /// Parses a snapshot: `{"records": [...], "prescriber_history": [{"prescriber_id", "record_id"}]}`.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        let mut store = Self::new(snapshot.records);
        for row in snapshot.prescriber_history {
            store = store.with_prior(&row.prescriber_id, &row.record_id);
        }
        Ok(store)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path)?;
        let store = Self::from_json_str(&json).map_err(|e| StoreError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        for record in store.records.values() {
            if let Err(e) = record.ensure_complete() {
                warn!(record_id = %record.id, error = %e, "Incomplete ground-truth record loaded");
            }
        }

        info!(
            path = %path.display(),
            records = store.records.len(),
            prescribers = store.priors.len(),
            "Ground truth loaded"
        );
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &MedicineRecord> {
        self.records.values()
    }
}

impl GroundTruthStore for InMemoryGroundTruth {
    async fn lookup_record(&self, id: &str) -> Result<MedicineRecord, StoreError> {
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::RecordNotFound { id: id.to_string() })
    }

    async fn lookup_priors(&self, prescriber_id: &str) -> Result<HashSet<String>, StoreError> {
        Ok(self.priors.get(prescriber_id).cloned().unwrap_or_default())
    }

    async fn lookup_brand(&self, key: &str) -> Result<Vec<MedicineRecord>, StoreError> {
        let key = brand_key(key);
        if key.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self
            .records
            .values()
            .filter(|r| brand_key(&r.brand_name) == key)
            .cloned()
            .collect())
    }

    async fn search_text(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<MedicineRecord>, StoreError> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let matches: Vec<MedicineRecord> = self
            .records
            .values()
            .filter(|r| {
                r.brand_name.to_lowercase().contains(&needle)
                    || r.generic_name.to_lowercase().contains(&needle)
            })
            .take(limit)
            .cloned()
            .collect();

        debug!(term = %needle, matches = matches.len(), "Ground-truth text search");
        Ok(matches)
    }
}
