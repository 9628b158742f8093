//! Extraction capability and its boundary.
//!
//! The pipeline consumes extraction through [`Extractor`]. Whatever an
//! extractor produces is validated into [`ExtractedMention`] before any
//! guardrail sees it.

mod error;
mod input;
pub mod local;
#[cfg(any(test, feature = "mock"))]
mod mock;
pub mod payload;


use async_trait::async_trait;

pub use error::ExtractionError;
pub use input::RawInput;
pub use local::{LocalTextExtractor, parse_mention, split_medicines};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockExtractor;
pub use payload::{ExtractionPayload, parse_payloads};

use crate::model::ExtractedMention;

/// Turns raw input into one mention per medicine, in input order.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, input: &RawInput) -> Result<Vec<ExtractedMention>, ExtractionError>;
}
