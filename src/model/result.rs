use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ExtractedMention, MedicineRecord};
use crate::guardrail::GuardrailError;

/// Discrete confidence tier derived from the final similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    High,
    Medium,
    Low,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::High => "High",
            RiskTier::Medium => "Medium",
            RiskTier::Low => "Low",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grounded outcome for one mention.
///
/// Fields are private so a result cannot be edited after the guardrails ran;
/// in particular the output strength is always read from `matched_record`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    extracted: ExtractedMention,
    matched_record: MedicineRecord,
    final_similarity_score: f32,
    risk_classification: RiskTier,
    clinical_risk_tier: RiskTier,
    manual_review_required: bool,
    combination_locked: bool,
    guardrail_logs: Vec<String>,
}

impl MatchResult {
    pub(crate) fn new(
        extracted: ExtractedMention,
        matched_record: MedicineRecord,
        final_similarity_score: f32,
        tier: RiskTier,
        manual_review_required: bool,
        combination_locked: bool,
        guardrail_logs: Vec<String>,
    ) -> Self {
        Self {
            extracted,
            matched_record,
            final_similarity_score,
            risk_classification: tier,
            clinical_risk_tier: tier,
            manual_review_required,
            combination_locked,
            guardrail_logs,
        }
    }

    pub fn extracted(&self) -> &ExtractedMention {
        &self.extracted
    }

    pub fn matched_record(&self) -> &MedicineRecord {
        &self.matched_record
    }

    /// Output strength. Always the ground-truth value.
    pub fn strength(&self) -> &str {
        &self.matched_record.official_strength
    }

    pub fn final_similarity_score(&self) -> f32 {
        self.final_similarity_score
    }

    pub fn risk_classification(&self) -> RiskTier {
        self.risk_classification
    }

    pub fn clinical_risk_tier(&self) -> RiskTier {
        self.clinical_risk_tier
    }

    pub fn manual_review_required(&self) -> bool {
        self.manual_review_required
    }

    pub fn is_combination_locked(&self) -> bool {
        self.combination_locked
    }

    pub fn guardrail_logs(&self) -> &[String] {
        &self.guardrail_logs
    }

    /// Active-ingredient breakdown for downstream consumers.
    ///
    /// Combination products are dispensed as one indivisible entity, so a
    /// locked result refuses the request.
    pub fn component_breakdown(&self) -> Result<Vec<String>, GuardrailError> {
        if self.combination_locked {
            return Err(GuardrailError::CombinationLocked {
                record_id: self.matched_record.id.clone(),
            });
        }

        Ok(vec![self.matched_record.generic_name.clone()])
    }
}
