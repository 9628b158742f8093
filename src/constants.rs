//! Fixed numbers of the rule engine.
//!
//! Penalties are multiplicative factors applied to a similarity score in `[0, 1]`.
//! Tunables that operators are expected to change (blend factor, timeout, top-k)
//! have their defaults here and are overridden through [`crate::config::Config`].

use std::time::Duration;

/// Dimension of the dense query embedding.
pub const DENSE_EMBEDDING_DIM: usize = 384;

/// Default dense weight in the hybrid blend (`1 - alpha` goes to the sparse signal).
pub const DEFAULT_HYBRID_ALPHA: f32 = 0.75;

/// Default number of raw hits requested from the vector index.
pub const DEFAULT_TOP_K: u64 = 5;

/// Default deadline for a single vector-index query.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_millis(1500);

/// Applied to hits whose lexical variant contradicts the query variant.
pub const SPARSE_VARIANT_PENALTY: f32 = 0.5;

/// Added to candidates found in the prescriber's history.
pub const PRESCRIBER_PRIOR_BOOST: f32 = 0.10;

/// Applied when the extracted form differs from the ground-truth form.
pub const FORM_MISMATCH_PENALTY: f32 = 0.70;

/// Applied when the record's brand carries a different numeric variant.
pub const VARIANT_MISMATCH_PENALTY: f32 = 0.65;

/// Applied when the mention has a variant but the record's brand has none.
pub const VARIANT_ABSENT_PENALTY: f32 = 0.85;

/// Lower bound of the High tier.
pub const HIGH_TIER_THRESHOLD: f32 = 0.85;

/// Lower bound of the Medium tier.
pub const MEDIUM_TIER_THRESHOLD: f32 = 0.65;

/// Scores below this always require manual review, whatever their tier.
pub const MIN_ACCEPTANCE_THRESHOLD: f32 = 0.70;

/// Degraded-mode score for an exact brand match with an equal variant.
pub const FALLBACK_EXACT_VARIANT_SCORE: f32 = 0.90;

/// Degraded-mode score for an exact brand match.
pub const FALLBACK_EXACT_BRAND_SCORE: f32 = 0.82;

/// Degraded-mode score for a substring match on brand or generic name.
pub const FALLBACK_TERM_SCORE: f32 = 0.78;

/// Shortest single brand token used as a degraded-mode search term.
pub const FALLBACK_MIN_TERM_LEN: usize = 4;

/// Maximum records returned by one degraded-mode text search.
pub const FALLBACK_SEARCH_LIMIT: usize = 10;
