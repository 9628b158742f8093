//! Contractual JSON shape consumed by the presentation layer.
//!
//! Golden responses are stored in this same shape, so these types both
//! serialize and deserialize.

use serde::{Deserialize, Serialize};

use super::{ExtractedMention, MatchResult, RiskTier};

/// Top-level response for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResponse {
    pub medicines: Vec<ProcessedMedicine>,
    /// Pipeline-wide events (workflow, cache short-circuit, fallback activation).
    #[serde(default)]
    pub guardrail_logs: Vec<String>,
}

/// One processed mention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedMedicine {
    pub original_raw_input: String,
    pub extracted: ExtractedMention,
    /// `None` when no ground-truth record could be resolved.
    pub matched_medicine: Option<MatchedMedicine>,
    pub manual_review_required: bool,
    #[serde(default)]
    pub guardrail_logs: Vec<String>,
}

/// Ground-truth record plus the scoring outcome for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedMedicine {
    pub id: String,
    pub brand_name: String,
    pub generic_name: String,
    pub official_strength: String,
    pub form: String,
    pub combination_flag: bool,
    pub final_similarity_score: f32,
    pub risk_classification: RiskTier,
    pub clinical_risk_tier: RiskTier,
    pub manual_review_required: bool,
}

impl ProcessedMedicine {
    /// Entry for a mention that no ground-truth record could be resolved for.
    pub fn unmatched(extracted: ExtractedMention, guardrail_logs: Vec<String>) -> Self {
        Self {
            original_raw_input: extracted.raw_input.clone(),
            extracted,
            matched_medicine: None,
            manual_review_required: true,
            guardrail_logs,
        }
    }
}

impl From<MatchResult> for ProcessedMedicine {
    fn from(result: MatchResult) -> Self {
        let record = result.matched_record();
        let matched = MatchedMedicine {
            id: record.id.clone(),
            brand_name: record.brand_name.clone(),
            generic_name: record.generic_name.clone(),
            official_strength: result.strength().to_string(),
            form: record.form.clone(),
            combination_flag: record.combination_flag,
            final_similarity_score: result.final_similarity_score(),
            risk_classification: result.risk_classification(),
            clinical_risk_tier: result.clinical_risk_tier(),
            manual_review_required: result.manual_review_required(),
        };

        Self {
            original_raw_input: result.extracted().raw_input.clone(),
            extracted: result.extracted().clone(),
            matched_medicine: Some(matched),
            manual_review_required: result.manual_review_required(),
            guardrail_logs: result.guardrail_logs().to_vec(),
        }
    }
}

impl ExtractionResponse {
    /// Returns `true` if any entry needs a pharmacist's review.
    pub fn requires_manual_review(&self) -> bool {
        self.medicines.iter().any(|m| m.manual_review_required)
    }
}
