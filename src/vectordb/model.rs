use std::collections::HashMap;

use qdrant_client::qdrant::{ScoredPoint, Value};

/// Payload key holding the ground-truth record id.
pub const PAYLOAD_RECORD_ID: &str = "record_id";
/// Payload key holding the indexed brand text.
pub const PAYLOAD_BRAND_NAME: &str = "brand_name";

/// One hit as returned by the index, before blending.
///
/// A record found by only one of the two searches carries `0.0` for the other score.
#[derive(Debug, Clone, PartialEq)]
pub struct RawHit {
    pub record_id: String,
    /// Cosine similarity of the dense vectors.
    pub dense_score: f32,
    /// Dot product of the sparse vectors.
    pub sparse_score: f32,
    /// Indexed lexical text (the record's brand name).
    pub lexical_text: String,
}

impl RawHit {
    pub fn new(record_id: impl Into<String>, lexical_text: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            dense_score: 0.0,
            sparse_score: 0.0,
            lexical_text: lexical_text.into(),
        }
    }

    pub fn with_scores(mut self, dense_score: f32, sparse_score: f32) -> Self {
        self.dense_score = dense_score;
        self.sparse_score = sparse_score;
        self
    }
}

pub(crate) fn payload_str(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
    payload.get(key).and_then(|v| v.as_str()).cloned()
}

/// Extracts `(record_id, lexical_text, score)`; points without a record id are skipped.
pub(crate) fn scored_point_parts(point: &ScoredPoint) -> Option<(String, String, f32)> {
    let record_id = payload_str(&point.payload, PAYLOAD_RECORD_ID)?;
    let lexical_text = payload_str(&point.payload, PAYLOAD_BRAND_NAME).unwrap_or_default();
    Some((record_id, lexical_text, point.score))
}
