//! Audit log compiler.
//!
//! Every guardrail rule that fires produces one [`AuditEntry`]. An [`AuditLog`]
//! is request-local: it is created per mention (or per request for workflow
//! events), never shared, and compiled into the `guardrail_logs` string array
//! once processing finishes. Entries are ordered by [`Phase`] and keep their
//! insertion order within a phase; the same rule application is recorded once.


use serde::Serialize;

/// Pipeline phases in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Workflow,
    Normalize,
    PreMatch,
    Retrieval,
    PostMatch,
    Classification,
}

/// Every rule that can leave a trace in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardrailRule {
    WorkflowStarted,
    GoldenCacheHit,
    WorkflowCompleted,
    LowercaseFields,
    FormAbbreviation,
    FrequencyAbbreviation,
    FormTokenLifted,
    VariantStripped,
    StrengthCleared,
    PrescriberPrior,
    CandidateDiscarded,
    DegradedRetrieval,
    NoCandidate,
    CombinationLock,
    FormPenalty,
    VariantMismatchPenalty,
    StrengthInjection,
    ConfidenceTier,
    ManualReview,
}

impl GuardrailRule {
    pub fn phase(&self) -> Phase {
        use GuardrailRule::*;
        match self {
            WorkflowStarted | GoldenCacheHit | WorkflowCompleted => Phase::Workflow,
            LowercaseFields | FormAbbreviation | FrequencyAbbreviation | FormTokenLifted => {
                Phase::Normalize
            }
            VariantStripped | StrengthCleared => Phase::PreMatch,
            PrescriberPrior | CandidateDiscarded | DegradedRetrieval | NoCandidate => {
                Phase::Retrieval
            }
            CombinationLock | FormPenalty | VariantMismatchPenalty | StrengthInjection => {
                Phase::PostMatch
            }
            ConfidenceTier | ManualReview => Phase::Classification,
        }
    }

    /// Default log line for the rule.
    pub fn message(&self) -> &'static str {
        use GuardrailRule::*;
        match self {
            WorkflowStarted => {
                "Workflow started: cache check -> extraction -> pre-match -> hybrid retrieval -> post-match"
            }
            GoldenCacheHit => "Workflow short-circuited by golden cache hit",
            WorkflowCompleted => "Workflow completed: grounded payload generated",
            LowercaseFields => "Normalization rule applied: lowercased extraction fields",
            FormAbbreviation => "Normalization rule applied for dosage form",
            FrequencyAbbreviation => "Normalization rule applied for frequency",
            FormTokenLifted => "Dosage form token moved from brand name to form",
            VariantStripped => "Variant token stripped from brand name",
            StrengthCleared => "Variant separation enforced: extracted strength cleared",
            PrescriberPrior => "Prescriber prior applied: score boost from history",
            CandidateDiscarded => "Candidate discarded: ground-truth record not found",
            DegradedRetrieval => "Vector index unavailable: degraded local retrieval engaged",
            NoCandidate => "No ground-truth record resolved: manual review required",
            CombinationLock => "Combination lock applied: product cannot be split.",
            FormPenalty => "Form mismatch penalty applied.",
            VariantMismatchPenalty => "Variant mismatch penalty applied.",
            StrengthInjection => "Official strength injected from ground truth.",
            ConfidenceTier => "Confidence classification computed",
            ManualReview => "Risk-based routing: manual review required",
        }
    }
}

/// One fired rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AuditEntry {
    pub rule: GuardrailRule,
    pub message: String,
}

impl AuditEntry {
    /// Entry carrying the rule's default message.
    pub fn new(rule: GuardrailRule) -> Self {
        Self {
            rule,
            message: rule.message().to_string(),
        }
    }

    /// Entry whose message carries application-specific detail.
    pub fn with_detail(rule: GuardrailRule, detail: impl AsRef<str>) -> Self {
        Self {
            rule,
            message: format!("{}: {}", rule.message().trim_end_matches('.'), detail.as_ref()),
        }
    }

    pub fn phase(&self) -> Phase {
        self.rule.phase()
    }
}

/// Ordered, deduplicated trail of fired rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an entry. Returns `false` if this exact application was already recorded.
    pub fn record(&mut self, entry: AuditEntry) -> bool {
        if self.entries.contains(&entry) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Records the rule with its default message.
    pub fn fire(&mut self, rule: GuardrailRule) -> bool {
        self.record(AuditEntry::new(rule))
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = AuditEntry>) {
        for entry in entries {
            self.record(entry);
        }
    }

    pub fn contains(&self, rule: GuardrailRule) -> bool {
        self.entries.iter().any(|e| e.rule == rule)
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Orders entries by phase (stable within a phase) and renders the log lines.
    pub fn compile(mut self) -> Vec<String> {
        self.entries.sort_by_key(AuditEntry::phase);
        self.entries.into_iter().map(|e| e.message).collect()
    }

    /// Renders the log lines in recording order (request-level events).
    pub fn compile_chronological(self) -> Vec<String> {
        self.entries.into_iter().map(|e| e.message).collect()
    }
}
