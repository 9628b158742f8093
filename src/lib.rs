//! Medguard library crate (used by the binary and integration tests).
//!
//! Grounds AI-extracted medicine mentions against a verified ground-truth
//! store. The ground-truth strength always wins over the extracted one.
//!
//! ## Pipeline
//! - [`normalize`] - casing and abbreviation expansion
//! - [`guardrail`] - pre-match variant separation and post-match rules
//! - [`retrieval`] - hybrid dense + sparse candidate retrieval
//! - [`risk`] - confidence tiers and manual-review routing
//! - [`audit`] - per-mention guardrail log
//! - [`cache`] - golden fingerprint intercept and degraded local matching
//! - [`pipeline`] - request validation and orchestration
//!
//! ## Collaborators
//! - [`extraction`] - extractor trait, payload validation, local text extractor
//! - [`embedding`] - dense/sparse embedder trait and a hashing embedder
//! - [`vectordb`] - vector index trait and Qdrant client
//! - [`store`] - ground-truth store trait and in-memory store
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod audit;
pub mod cache;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod extraction;
pub mod guardrail;
pub mod hashing;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod retrieval;
pub mod risk;
pub mod store;
pub mod vectordb;

pub use audit::{AuditEntry, AuditLog, GuardrailRule, Phase};
pub use cache::{DegradedMatcher, GoldenCacheError, GoldenLookup, GoldenResponses};
pub use config::{Config, ConfigError};
pub use embedding::{EmbeddingError, HashingEmbedder, HybridEmbedder, SparseVector};
pub use extraction::{ExtractionError, Extractor, LocalTextExtractor, RawInput};
#[cfg(any(test, feature = "mock"))]
pub use extraction::MockExtractor;
pub use guardrail::{GuardrailError, PostMatchPolicy, apply_post_match, apply_pre_match};
pub use hashing::{Fingerprint, fingerprint_input};
pub use model::{
    Candidate, CandidateSource, ExtractedMention, ExtractionResponse, MatchResult, MatchedMedicine,
    MedicineRecord, ProcessedMedicine, RiskTier,
};
pub use normalize::normalize;
pub use pipeline::{
    GuardrailPipeline, MentionOutcome, PipelineError, ProcessRequest, Resolution, ValidationError,
};
pub use retrieval::{HybridRetriever, RetrievalConfig, RetrievalError};
pub use risk::{RiskAssessment, RiskPolicy, classify};
pub use store::{GroundTruthStore, InMemoryGroundTruth, StoreError};
#[cfg(any(test, feature = "mock"))]
pub use vectordb::{IndexFault, MockVectorIndex};
pub use vectordb::{QdrantIndex, RawHit, VectorIndex, VectorIndexError};
