//! Local-only candidate sourcing for when the vector index is unreachable.
//!
//! Exact and substring text matching against the ground-truth store. No
//! semantic ranking and no prescriber prior; the post-match guardrails and
//! the risk classifier still run on whatever this returns.

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, instrument};

use crate::constants::{
    FALLBACK_EXACT_BRAND_SCORE, FALLBACK_EXACT_VARIANT_SCORE, FALLBACK_MIN_TERM_LEN,
    FALLBACK_SEARCH_LIMIT, FALLBACK_TERM_SCORE,
};
use crate::model::candidate::rank_order;
use crate::model::{Candidate, ExtractedMention, MedicineRecord};
use crate::normalize::brand_key;
use crate::retrieval::has_variant_mismatch;
use crate::store::{GroundTruthStore, StoreError};

/// Search terms in priority order: brand, generic name, then long tokens of each.
pub fn search_terms(mention: &ExtractedMention) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    let mut push = |term: &str| {
        let term = term.trim().to_lowercase();
        if !term.is_empty() && !terms.contains(&term) {
            terms.push(term);
        }
    };

    push(&mention.brand);
    if let Some(generic) = mention.generic_name.as_deref() {
        push(generic);
    }

    let words = mention
        .brand
        .split_whitespace()
        .chain(mention.generic_name.iter().flat_map(|g| g.split_whitespace()));
    for word in words {
        if word.chars().count() >= FALLBACK_MIN_TERM_LEN {
            push(word);
        }
    }

    terms
}

/// Local score of a record for a mention.
pub fn local_score(mention: &ExtractedMention, record: &MedicineRecord) -> f32 {
    if brand_key(&record.brand_name) != brand_key(&mention.brand) {
        return FALLBACK_TERM_SCORE;
    }

    if mention.variant.as_deref() == record.brand_variant() {
        FALLBACK_EXACT_VARIANT_SCORE
    } else {
        FALLBACK_EXACT_BRAND_SCORE
    }
}

/// Text matcher over the ground-truth store.
pub struct DegradedMatcher<S> {
    store: Arc<S>,
}

impl<S: GroundTruthStore> DegradedMatcher<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Candidates ranked like hybrid results (variant-consistent first).
    #[instrument(skip_all, fields(brand = %mention.brand))]
    pub async fn match_local(
        &self,
        mention: &ExtractedMention,
    ) -> Result<Vec<Candidate>, StoreError> {
        let terms = search_terms(mention);
        let (exact, searched) = tokio::join!(
            self.store.lookup_brand(&mention.brand),
            join_all(
                terms
                    .iter()
                    .map(|term| self.store.search_text(term, FALLBACK_SEARCH_LIMIT)),
            )
        );

        // Exact brand matches are scored even when a substring search truncated them away.
        let mut best: HashMap<String, Candidate> = HashMap::new();
        for records in std::iter::once(exact).chain(searched) {
            for record in records? {
                let score = local_score(mention, &record);
                let keep = best
                    .get(&record.id)
                    .is_none_or(|existing| existing.combined_score < score);
                if keep {
                    let mut candidate = Candidate::local(record, score);
                    candidate.variant_mismatch = has_variant_mismatch(
                        &candidate.record.brand_name,
                        mention.variant.as_deref(),
                    );
                    best.insert(candidate.record.id.clone(), candidate);
                }
            }
        }

        let mut candidates: Vec<Candidate> = best.into_values().collect();
        candidates.sort_by(rank_order);
        candidates.truncate(FALLBACK_SEARCH_LIMIT);

        debug!(
            terms = terms.len(),
            candidates = candidates.len(),
            "Degraded local match complete"
        );
        Ok(candidates)
    }
}
