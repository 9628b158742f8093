use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;

use super::{RawHit, VectorIndex, VectorIndexError};
use crate::embedding::{EmbeddingError, HashingEmbedder, SparseVector};
use crate::model::MedicineRecord;

/// Forced failure mode for [`MockVectorIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFault {
    /// Every query fails immediately.
    Unavailable,
    /// Every query never completes.
    Hang,
}

#[derive(Clone)]
enum MockScores {
    Vectors { dense: Vec<f32>, sparse: SparseVector },
    Fixed { dense: f32, sparse: f32 },
}

#[derive(Clone)]
struct MockPoint {
    record_id: String,
    lexical_text: String,
    scores: MockScores,
}

/// In-memory index: cosine over dense vectors plus sparse dot products.
#[derive(Default)]
pub struct MockVectorIndex {
    points: RwLock<Vec<MockPoint>>,
    fault: RwLock<Option<IndexFault>>,
    queries: AtomicUsize,
}

impl MockVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes a point with explicit vectors.
    pub fn insert(
        &self,
        record_id: impl Into<String>,
        lexical_text: impl Into<String>,
        dense: Vec<f32>,
        sparse: SparseVector,
    ) {
        self.points.write().push(MockPoint {
            record_id: record_id.into(),
            lexical_text: lexical_text.into(),
            scores: MockScores::Vectors { dense, sparse },
        });
    }

    /// Indexes a point that returns the same scores for every query.
    pub fn insert_scored(
        &self,
        record_id: impl Into<String>,
        lexical_text: impl Into<String>,
        dense: f32,
        sparse: f32,
    ) {
        self.points.write().push(MockPoint {
            record_id: record_id.into(),
            lexical_text: lexical_text.into(),
            scores: MockScores::Fixed { dense, sparse },
        });
    }

    /// Indexes a record from its brand and generic name.
    pub fn insert_record(
        &self,
        record: &MedicineRecord,
        embedder: &HashingEmbedder,
    ) -> Result<(), EmbeddingError> {
        let text = format!("{} {}", record.brand_name, record.generic_name);
        let dense = embedder.embed_dense(&text)?;
        let sparse = embedder.embed_sparse(&text)?;
        self.insert(record.id.clone(), record.brand_name.clone(), dense, sparse);
        Ok(())
    }

    pub fn set_fault(&self, fault: Option<IndexFault>) {
        *self.fault.write() = fault;
    }

    /// Number of queries received, including failed ones.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn point_count(&self) -> usize {
        self.points.read().len()
    }
}

impl VectorIndex for MockVectorIndex {
    async fn query(
        &self,
        dense: Vec<f32>,
        sparse: SparseVector,
        top_k: u64,
    ) -> Result<Vec<RawHit>, VectorIndexError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        let fault = *self.fault.read();
        match fault {
            Some(IndexFault::Unavailable) => {
                return Err(VectorIndexError::Unavailable {
                    reason: "mock index forced offline".to_string(),
                });
            }
            Some(IndexFault::Hang) => std::future::pending::<()>().await,
            None => {}
        }

        let scored: Vec<(String, String, f32, f32)> = self
            .points
            .read()
            .iter()
            .map(|p| {
                let (d, s) = match &p.scores {
                    MockScores::Vectors {
                        dense: pd,
                        sparse: ps,
                    } => (cosine_similarity(&dense, pd), sparse.dot(ps)),
                    MockScores::Fixed { dense, sparse } => (*dense, *sparse),
                };
                (p.record_id.clone(), p.lexical_text.clone(), d, s)
            })
            .collect();

        let limit = top_k as usize;
        let mut by_dense = scored.clone();
        by_dense.sort_by(|a, b| b.2.total_cmp(&a.2));
        by_dense.truncate(limit);

        let mut by_sparse: Vec<_> = scored.into_iter().filter(|p| p.3 > 0.0).collect();
        by_sparse.sort_by(|a, b| b.3.total_cmp(&a.3));
        by_sparse.truncate(limit);

        let mut merged: BTreeMap<String, RawHit> = BTreeMap::new();
        for (id, text, d, _) in by_dense {
            merged
                .entry(id.clone())
                .or_insert_with(|| RawHit::new(id, text))
                .dense_score = d;
        }
        for (id, text, _, s) in by_sparse {
            merged
                .entry(id.clone())
                .or_insert_with(|| RawHit::new(id, text))
                .sparse_score = s;
        }

        Ok(merged.into_values().collect())
    }

    async fn is_ready(&self) -> bool {
        self.fault.read().is_none()
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
