//! Confidence tiers and manual-review routing.

use crate::constants::{HIGH_TIER_THRESHOLD, MEDIUM_TIER_THRESHOLD, MIN_ACCEPTANCE_THRESHOLD};
use crate::model::RiskTier;

/// Step-function thresholds over the final similarity score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskPolicy {
    /// Scores at or above this are `High`.
    pub high_threshold: f32,
    /// Scores at or above this (and below `high_threshold`) are `Medium`.
    pub medium_threshold: f32,
    /// Scores below this are routed to a pharmacist regardless of tier.
    pub min_acceptance: f32,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            high_threshold: HIGH_TIER_THRESHOLD,
            medium_threshold: MEDIUM_TIER_THRESHOLD,
            min_acceptance: MIN_ACCEPTANCE_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskAssessment {
    pub tier: RiskTier,
    pub manual_review_required: bool,
}

impl RiskPolicy {
    /// Maps a score to a tier. Never fails; a NaN score is `Low` and reviewed.
    pub fn classify(&self, score: f32) -> RiskAssessment {
        let tier = if score >= self.high_threshold {
            RiskTier::High
        } else if score >= self.medium_threshold {
            RiskTier::Medium
        } else {
            RiskTier::Low
        };

        let manual_review_required =
            tier == RiskTier::Low || score.is_nan() || score < self.min_acceptance;

        RiskAssessment {
            tier,
            manual_review_required,
        }
    }
}

/// Classifies with the default thresholds.
pub fn classify(score: f32) -> RiskAssessment {
    RiskPolicy::default().classify(score)
}
