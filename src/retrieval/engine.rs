use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tracing::{debug, instrument, warn};

use super::RetrievalError;
use super::blend::blend_hits;
use crate::audit::{AuditEntry, GuardrailRule};
use crate::config::Config;
use crate::constants::{
    DEFAULT_HYBRID_ALPHA, DEFAULT_QUERY_TIMEOUT, DEFAULT_TOP_K, PRESCRIBER_PRIOR_BOOST,
    SPARSE_VARIANT_PENALTY,
};
use crate::embedding::HybridEmbedder;
use crate::model::candidate::rank_order;
use crate::model::{Candidate, CandidateSource, ExtractedMention};
use crate::store::{GroundTruthStore, StoreError};
use crate::vectordb::VectorIndex;

/// Tunables of the hybrid query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalConfig {
    /// Dense weight of the blend; sparse gets `1 - alpha`.
    pub alpha: f32,
    pub top_k: u64,
    /// Upper bound on the index query.
    pub timeout: Duration,
    pub sparse_penalty: f32,
    pub prior_boost: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_HYBRID_ALPHA,
            top_k: DEFAULT_TOP_K,
            timeout: DEFAULT_QUERY_TIMEOUT,
            sparse_penalty: SPARSE_VARIANT_PENALTY,
            prior_boost: PRESCRIBER_PRIOR_BOOST,
        }
    }
}

impl From<&Config> for RetrievalConfig {
    fn from(config: &Config) -> Self {
        Self {
            alpha: config.hybrid_alpha,
            top_k: config.top_k,
            timeout: config.query_timeout,
            ..Self::default()
        }
    }
}

/// Ranked candidates plus the retrieval-phase audit entries.
#[derive(Debug, Clone, Default)]
pub struct Retrieved {
    pub candidates: Vec<Candidate>,
    pub entries: Vec<AuditEntry>,
}

/// Hybrid dense + sparse retrieval over the vector index, grounded in the store.
pub struct HybridRetriever<I, S> {
    embedder: Arc<dyn HybridEmbedder>,
    index: Arc<I>,
    store: Arc<S>,
    config: RetrievalConfig,
}

impl<I, S> HybridRetriever<I, S>
where
    I: VectorIndex,
    S: GroundTruthStore,
{
    pub fn new(
        embedder: Arc<dyn HybridEmbedder>,
        index: Arc<I>,
        store: Arc<S>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            embedder,
            index,
            store,
            config,
        }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Returns candidates ordered by (variant mismatch, score desc, record id).
    ///
    /// Hits whose record is missing from the store are dropped and logged. The
    /// index query is bounded by the configured timeout and never retried.
    #[instrument(skip_all, fields(brand = %mention.brand, prescriber = prescriber_id.unwrap_or("")))]
    pub async fn retrieve(
        &self,
        mention: &ExtractedMention,
        prescriber_id: Option<&str>,
    ) -> Result<Retrieved, RetrievalError> {
        let text = mention.query_text();

        let (dense, sparse) = tokio::try_join!(
            self.embedder.dense_embed(&text),
            self.embedder.sparse_embed(&text)
        )
        .map_err(|e| RetrievalError::Unavailable {
            reason: format!("query embedding failed: {e}"),
        })?;

        let query = self.index.query(dense, sparse, self.config.top_k);
        let hits = match tokio::time::timeout(self.config.timeout, query).await {
            Ok(Ok(hits)) => hits,
            Ok(Err(e)) => {
                return Err(RetrievalError::Unavailable {
                    reason: e.to_string(),
                });
            }
            Err(_) => {
                return Err(RetrievalError::Unavailable {
                    reason: format!(
                        "vector index query timed out after {} ms",
                        self.config.timeout.as_millis()
                    ),
                });
            }
        };

        let blended = blend_hits(
            &hits,
            mention.variant.as_deref(),
            self.config.alpha,
            self.config.sparse_penalty,
        );

        let priors = match prescriber_id {
            Some(id) => self.load_priors(id).await,
            None => HashSet::new(),
        };

        let lookups = join_all(
            blended
                .iter()
                .map(|hit| self.store.lookup_record(&hit.record_id)),
        )
        .await;

        let mut entries = Vec::new();
        let mut candidates = Vec::with_capacity(blended.len());

        for (hit, lookup) in blended.into_iter().zip(lookups) {
            let record = match lookup {
                Ok(record) => record,
                Err(StoreError::RecordNotFound { id }) => {
                    warn!(record_id = %id, "Index hit has no ground-truth record; discarded");
                    entries.push(AuditEntry::with_detail(
                        GuardrailRule::CandidateDiscarded,
                        &id,
                    ));
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let prior_boost = if priors.contains(&record.id) {
                entries.push(AuditEntry::with_detail(
                    GuardrailRule::PrescriberPrior,
                    &record.id,
                ));
                self.config.prior_boost
            } else {
                0.0
            };

            candidates.push(Candidate {
                record,
                dense_score: hit.dense_score,
                sparse_score: hit.sparse_score,
                combined_score: hit.combined_score + prior_boost,
                prior_boost,
                variant_mismatch: hit.variant_mismatch,
                source: CandidateSource::Hybrid,
            });
        }

        candidates.sort_by(rank_order);

        debug!(
            hits = hits.len(),
            candidates = candidates.len(),
            top = candidates.first().map(|c| c.record.id.as_str()).unwrap_or(""),
            "Hybrid retrieval complete"
        );

        Ok(Retrieved {
            candidates,
            entries,
        })
    }

    /// Prescriber history; a failed lookup means no prior, not a failed query.
    async fn load_priors(&self, prescriber_id: &str) -> HashSet<String> {
        match self.store.lookup_priors(prescriber_id).await {
            Ok(priors) => priors,
            Err(e) => {
                warn!(prescriber = %prescriber_id, error = %e, "Prescriber history lookup failed");
                HashSet::new()
            }
        }
    }
}
