use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{info, instrument, warn};

use super::{PipelineError, ProcessRequest};
use crate::audit::{AuditEntry, AuditLog, GuardrailRule};
use crate::cache::{DegradedMatcher, GoldenLookup};
use crate::embedding::HybridEmbedder;
use crate::extraction::Extractor;
use crate::guardrail::{GuardrailError, PostMatchPolicy, apply_post_match, apply_pre_match};
use crate::model::{ExtractedMention, ExtractionResponse, MatchResult, ProcessedMedicine};
use crate::normalize::normalize;
use crate::retrieval::{HybridRetriever, RetrievalConfig};
use crate::risk::RiskPolicy;
use crate::store::GroundTruthStore;
use crate::vectordb::VectorIndex;

/// Outcome for one mention.
#[derive(Debug, Clone, PartialEq)]
pub enum MentionOutcome {
    Matched(MatchResult),
    /// No ground-truth record could be resolved; always routed to review.
    Unmatched {
        extracted: ExtractedMention,
        guardrail_logs: Vec<String>,
    },
}

impl MentionOutcome {
    pub fn match_result(&self) -> Option<&MatchResult> {
        match self {
            MentionOutcome::Matched(result) => Some(result),
            MentionOutcome::Unmatched { .. } => None,
        }
    }
}

impl From<MentionOutcome> for ProcessedMedicine {
    fn from(outcome: MentionOutcome) -> Self {
        match outcome {
            MentionOutcome::Matched(result) => result.into(),
            MentionOutcome::Unmatched {
                extracted,
                guardrail_logs,
            } => ProcessedMedicine::unmatched(extracted, guardrail_logs),
        }
    }
}

/// Mention outcome plus whether candidates came from the degraded path.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub outcome: MentionOutcome,
    pub degraded: bool,
}

/// Extraction, guardrails, retrieval and classification for one request.
///
/// Holds only read-only collaborators; every request builds its own audit logs.
pub struct GuardrailPipeline<I, S> {
    extractor: Arc<dyn Extractor>,
    golden: Arc<dyn GoldenLookup>,
    retriever: HybridRetriever<I, S>,
    degraded: DegradedMatcher<S>,
    post_match: PostMatchPolicy,
    risk: RiskPolicy,
}

impl<I, S> GuardrailPipeline<I, S>
where
    I: VectorIndex,
    S: GroundTruthStore,
{
    pub fn new(
        extractor: Arc<dyn Extractor>,
        golden: Arc<dyn GoldenLookup>,
        embedder: Arc<dyn HybridEmbedder>,
        index: Arc<I>,
        store: Arc<S>,
        retrieval: RetrievalConfig,
    ) -> Self {
        Self {
            extractor,
            golden,
            retriever: HybridRetriever::new(embedder, index, Arc::clone(&store), retrieval),
            degraded: DegradedMatcher::new(store),
            post_match: PostMatchPolicy::default(),
            risk: RiskPolicy::default(),
        }
    }

    pub fn with_post_match_policy(mut self, policy: PostMatchPolicy) -> Self {
        self.post_match = policy;
        self
    }

    pub fn with_risk_policy(mut self, policy: RiskPolicy) -> Self {
        self.risk = policy;
        self
    }

    /// Processes one request into the contractual response.
    ///
    /// Known fingerprints return the golden response without extraction or
    /// retrieval. Mentions are resolved concurrently; output keeps input order.
    #[instrument(skip_all, fields(prescriber = request.prescriber().unwrap_or("")))]
    pub async fn process(
        &self,
        request: &ProcessRequest,
    ) -> Result<ExtractionResponse, PipelineError> {
        let input = request.validate()?;
        let fingerprint = input.fingerprint();

        let mut workflow = AuditLog::new();
        workflow.fire(GuardrailRule::WorkflowStarted);

        if let Some(cached) = self.golden.get(&fingerprint) {
            info!(fingerprint = %fingerprint, "Golden cache hit; skipping extraction and retrieval");
            workflow.fire(GuardrailRule::GoldenCacheHit);

            let mut guardrail_logs = workflow.compile_chronological();
            for line in cached.guardrail_logs {
                if !guardrail_logs.contains(&line) {
                    guardrail_logs.push(line);
                }
            }
            return Ok(ExtractionResponse {
                medicines: cached.medicines,
                guardrail_logs,
            });
        }

        let mentions = self.extractor.extract(&input).await?;
        info!(input = input.kind(), mentions = mentions.len(), "Extraction complete");

        let prescriber = request.prescriber();
        let resolutions = join_all(
            mentions
                .iter()
                .map(|mention| self.resolve_mention(mention, prescriber)),
        )
        .await;

        let mut medicines = Vec::with_capacity(resolutions.len());
        let mut degraded = false;
        let mut unmatched = false;
        for resolution in resolutions {
            let resolution = resolution?;
            degraded |= resolution.degraded;
            unmatched |= resolution.outcome.match_result().is_none();
            medicines.push(ProcessedMedicine::from(resolution.outcome));
        }

        if degraded {
            workflow.fire(GuardrailRule::DegradedRetrieval);
        }
        if unmatched {
            workflow.fire(GuardrailRule::NoCandidate);
        }
        workflow.fire(GuardrailRule::WorkflowCompleted);

        let response = ExtractionResponse {
            medicines,
            guardrail_logs: workflow.compile_chronological(),
        };
        info!(
            medicines = response.medicines.len(),
            degraded,
            manual_review = response.requires_manual_review(),
            "Request processed"
        );
        Ok(response)
    }

    /// Runs one extracted mention through normalization, the guardrails,
    /// retrieval (or its degraded fallback) and risk classification.
    #[instrument(skip_all, fields(raw = %mention.raw_input))]
    pub async fn resolve_mention(
        &self,
        mention: &ExtractedMention,
        prescriber_id: Option<&str>,
    ) -> Result<Resolution, GuardrailError> {
        let mut log = AuditLog::new();

        let (normalized, entries) = normalize(mention);
        log.extend(entries);

        let (guarded, entries) = apply_pre_match(&normalized);
        log.extend(entries);

        let (candidates, degraded) = match self.retriever.retrieve(&guarded, prescriber_id).await {
            Ok(retrieved) => {
                log.extend(retrieved.entries);
                (retrieved.candidates, false)
            }
            Err(e) => {
                warn!(error = %e, "Hybrid retrieval unavailable; using local match");
                log.fire(GuardrailRule::DegradedRetrieval);
                let candidates = match self.degraded.match_local(&guarded).await {
                    Ok(candidates) => candidates,
                    Err(e) => {
                        warn!(error = %e, "Local match failed");
                        Vec::new()
                    }
                };
                (candidates, true)
            }
        };

        let Some(top) = candidates.into_iter().next() else {
            log.fire(GuardrailRule::NoCandidate);
            return Ok(Resolution {
                outcome: MentionOutcome::Unmatched {
                    extracted: guarded,
                    guardrail_logs: log.compile(),
                },
                degraded,
            });
        };

        let outcome = apply_post_match(&guarded, &top, &self.post_match)?;
        log.extend(outcome.entries);
        debug_assert_eq!(outcome.strength, top.record.official_strength);

        let assessment = self.risk.classify(outcome.score);
        log.record(AuditEntry::with_detail(
            GuardrailRule::ConfidenceTier,
            format!("{} ({:.2})", assessment.tier, outcome.score),
        ));
        if assessment.manual_review_required {
            log.fire(GuardrailRule::ManualReview);
        }

        let result = MatchResult::new(
            guarded,
            top.record,
            outcome.score,
            assessment.tier,
            assessment.manual_review_required,
            outcome.combination_locked,
            log.compile(),
        );

        Ok(Resolution {
            outcome: MentionOutcome::Matched(result),
            degraded,
        })
    }
}
