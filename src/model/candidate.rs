use serde::{Deserialize, Serialize};

use super::MedicineRecord;

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    /// Hybrid dense + sparse query against the vector index.
    Hybrid,
    /// Local text match against the ground-truth store (index unavailable).
    LocalFallback,
}

/// A ground-truth record proposed for a mention, with its scoring breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub record: MedicineRecord,
    pub dense_score: f32,
    pub sparse_score: f32,
    /// Blended score after the sparse penalty and prescriber prior.
    pub combined_score: f32,
    pub prior_boost: f32,
    /// The record's lexical variant contradicts the query variant.
    pub variant_mismatch: bool,
    pub source: CandidateSource,
}

impl Candidate {
    /// Candidate produced by degraded local matching (no semantic signal, no prior).
    pub fn local(record: MedicineRecord, score: f32) -> Self {
        Self {
            record,
            dense_score: 0.0,
            sparse_score: score,
            combined_score: score,
            prior_boost: 0.0,
            variant_mismatch: false,
            source: CandidateSource::LocalFallback,
        }
    }
}

/// Ranking order: variant-consistent first, then score descending, then record id.
pub(crate) fn rank_order(a: &Candidate, b: &Candidate) -> std::cmp::Ordering {
    a.variant_mismatch
        .cmp(&b.variant_mismatch)
        .then_with(|| b.combined_score.total_cmp(&a.combined_score))
        .then_with(|| a.record.id.cmp(&b.record.id))
}
