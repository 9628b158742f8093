use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::guardrail::GuardrailError;

/// Malformed request; no guardrail runs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("request must carry non-empty raw_text or image_base64")]
    EmptyInput,

    #[error("prescriber_id must not be blank when present")]
    BlankPrescriberId,
}

/// Errors surfaced to the caller. Retrieval failures never appear here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("guardrail error: {0}")]
    Guardrail(#[from] GuardrailError),
}
