use tracing::debug;

use super::GuardrailError;
use crate::audit::{AuditEntry, GuardrailRule};
use crate::constants::{FORM_MISMATCH_PENALTY, VARIANT_ABSENT_PENALTY, VARIANT_MISMATCH_PENALTY};
use crate::model::{Candidate, ExtractedMention, MedicineRecord};
use crate::normalize::form_key;

/// Multiplicative penalties applied by the post-match rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostMatchPolicy {
    pub form_penalty: f32,
    /// Query variant differs from the record's brand variant.
    pub variant_mismatch_penalty: f32,
    /// Query carries a variant but the record's brand has none.
    pub variant_absent_penalty: f32,
}

impl Default for PostMatchPolicy {
    fn default() -> Self {
        Self {
            form_penalty: FORM_MISMATCH_PENALTY,
            variant_mismatch_penalty: VARIANT_MISMATCH_PENALTY,
            variant_absent_penalty: VARIANT_ABSENT_PENALTY,
        }
    }
}

/// State threaded through the post-match rules.
#[derive(Debug, Clone, PartialEq)]
pub struct PostMatchState {
    pub score: f32,
    pub combination_locked: bool,
    pub strength: Option<String>,
}

impl PostMatchState {
    pub fn new(score: f32) -> Self {
        Self {
            score,
            combination_locked: false,
            strength: None,
        }
    }
}

/// A pure post-match rule: same inputs, same state and entry.
pub type PostMatchRule = fn(
    PostMatchState,
    &ExtractedMention,
    &MedicineRecord,
    &PostMatchPolicy,
) -> (PostMatchState, Option<AuditEntry>);

/// Rules in evaluation order. Penalties compose multiplicatively, so the
/// order only matters for the audit trail.
pub const POST_MATCH_RULES: [PostMatchRule; 4] = [
    combination_lock,
    form_penalty,
    variant_penalty,
    strength_injection,
];

/// Result of running every post-match rule against the top candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct PostMatchOutcome {
    /// Final score, clamped to `[0, 1]`.
    pub score: f32,
    pub combination_locked: bool,
    /// Ground-truth strength; never the extracted one.
    pub strength: String,
    pub entries: Vec<AuditEntry>,
}

pub fn combination_lock(
    mut state: PostMatchState,
    _mention: &ExtractedMention,
    record: &MedicineRecord,
    _policy: &PostMatchPolicy,
) -> (PostMatchState, Option<AuditEntry>) {
    if !record.combination_flag {
        return (state, None);
    }
    state.combination_locked = true;
    (state, Some(AuditEntry::new(GuardrailRule::CombinationLock)))
}

pub fn form_penalty(
    mut state: PostMatchState,
    mention: &ExtractedMention,
    record: &MedicineRecord,
    policy: &PostMatchPolicy,
) -> (PostMatchState, Option<AuditEntry>) {
    let Some(form) = mention.form.as_deref() else {
        return (state, None);
    };

    let extracted = form_key(form);
    let official = form_key(&record.form);
    if extracted == official {
        return (state, None);
    }

    state.score *= policy.form_penalty;
    let entry = AuditEntry::with_detail(
        GuardrailRule::FormPenalty,
        format!("extracted {extracted} vs official {official}"),
    );
    (state, Some(entry))
}

pub fn variant_penalty(
    mut state: PostMatchState,
    mention: &ExtractedMention,
    record: &MedicineRecord,
    policy: &PostMatchPolicy,
) -> (PostMatchState, Option<AuditEntry>) {
    let Some(query_variant) = mention.variant.as_deref() else {
        return (state, None);
    };

    let detail = match record.brand_variant() {
        Some(official) if official == query_variant => return (state, None),
        Some(official) => {
            state.score *= policy.variant_mismatch_penalty;
            format!("extracted {query_variant} vs official {official}")
        }
        None => {
            state.score *= policy.variant_absent_penalty;
            format!("extracted {query_variant} vs official none")
        }
    };

    (
        state,
        Some(AuditEntry::with_detail(
            GuardrailRule::VariantMismatchPenalty,
            detail,
        )),
    )
}

/// Always fires: the output strength is the ground-truth strength.
pub fn strength_injection(
    mut state: PostMatchState,
    _mention: &ExtractedMention,
    record: &MedicineRecord,
    _policy: &PostMatchPolicy,
) -> (PostMatchState, Option<AuditEntry>) {
    state.strength = Some(record.official_strength.clone());
    (state, Some(AuditEntry::new(GuardrailRule::StrengthInjection)))
}

/// Runs every post-match rule against the top-ranked candidate.
pub fn apply_post_match(
    mention: &ExtractedMention,
    top: &Candidate,
    policy: &PostMatchPolicy,
) -> Result<PostMatchOutcome, GuardrailError> {
    let record = &top.record;
    record.ensure_complete()?;

    let mut state = PostMatchState::new(top.combined_score);
    let mut entries = Vec::with_capacity(POST_MATCH_RULES.len());

    for rule in POST_MATCH_RULES {
        let (next, entry) = rule(state, mention, record, policy);
        state = next;
        entries.extend(entry);
    }

    let strength = state
        .strength
        .ok_or_else(|| GuardrailError::StrengthNotInjected {
            record_id: record.id.clone(),
        })?;

    let score = if state.score.is_nan() {
        0.0
    } else {
        state.score.clamp(0.0, 1.0)
    };

    debug!(
        record_id = %record.id,
        raw_score = top.combined_score,
        final_score = score,
        combination_locked = state.combination_locked,
        "Post-match rules applied"
    );

    Ok(PostMatchOutcome {
        score,
        combination_locked: state.combination_locked,
        strength,
        entries,
    })
}
