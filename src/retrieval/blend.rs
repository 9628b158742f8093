use crate::normalize::numeric_tokens;
use crate::vectordb::RawHit;

/// A raw hit after dense/sparse blending and the sparse variant penalty.
#[derive(Debug, Clone, PartialEq)]
pub struct BlendedHit {
    pub record_id: String,
    pub dense_score: f32,
    pub sparse_score: f32,
    pub combined_score: f32,
    pub variant_mismatch: bool,
}

/// `true` if `lexical_text` carries numeric tokens and none equals the query variant.
///
/// Only numeric query variants participate; a text with no numbers never mismatches.
pub fn has_variant_mismatch(lexical_text: &str, query_variant: Option<&str>) -> bool {
    let Some(variant) = query_variant else {
        return false;
    };
    if variant.is_empty() || !variant.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let mut tokens = numeric_tokens(lexical_text).peekable();
    tokens.peek().is_some() && tokens.all(|t| t != variant)
}

/// Blends dense and sparse scores:
/// `alpha * dense + (1 - alpha) * sparse / max_sparse`, with dense clamped to
/// `[0, 1]`. Mismatched hits are multiplied by `sparse_penalty`.
pub fn blend_hits(
    hits: &[RawHit],
    query_variant: Option<&str>,
    alpha: f32,
    sparse_penalty: f32,
) -> Vec<BlendedHit> {
    let max_sparse = hits
        .iter()
        .map(|h| h.sparse_score)
        .filter(|s| s.is_finite())
        .fold(0.0f32, f32::max);

    hits.iter()
        .map(|hit| {
            let dense = if hit.dense_score.is_finite() {
                hit.dense_score.clamp(0.0, 1.0)
            } else {
                0.0
            };
            let sparse = if max_sparse > 0.0 && hit.sparse_score.is_finite() {
                (hit.sparse_score / max_sparse).clamp(0.0, 1.0)
            } else {
                0.0
            };

            let variant_mismatch = has_variant_mismatch(&hit.lexical_text, query_variant);
            let mut combined = alpha * dense + (1.0 - alpha) * sparse;
            if variant_mismatch {
                combined *= sparse_penalty;
            }

            BlendedHit {
                record_id: hit.record_id.clone(),
                dense_score: hit.dense_score,
                sparse_score: hit.sparse_score,
                combined_score: combined,
                variant_mismatch,
            }
        })
        .collect()
}
