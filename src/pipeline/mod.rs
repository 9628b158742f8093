//! Request orchestration.
//!
//! fingerprint check -> extraction -> per mention: normalize -> pre-match ->
//! hybrid retrieval (or local fallback) -> post-match -> risk -> audit log.

mod error;
mod request;
mod workflow;


pub use error::{PipelineError, ValidationError};
pub use request::ProcessRequest;
pub use workflow::{GuardrailPipeline, MentionOutcome, Resolution};
