use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{ExtractionError, Extractor, RawInput, parse_payloads};
use crate::model::ExtractedMention;

/// Extractor returning canned mentions and counting calls.
#[derive(Debug, Default)]
pub struct MockExtractor {
    mentions: Vec<ExtractedMention>,
    fail: bool,
    calls: AtomicUsize,
}

impl MockExtractor {
    pub fn returning(mentions: Vec<ExtractedMention>) -> Self {
        Self {
            mentions,
            ..Self::default()
        }
    }

    /// Mentions from an external extractor's JSON payload, validated at the
    /// boundary by [`parse_payloads`].
    pub fn from_payload_json(json: &str, raw_input: &str) -> Result<Self, ExtractionError> {
        Ok(Self::returning(parse_payloads(json, raw_input)?))
    }

    /// Fails every call with [`ExtractionError::Unparseable`].
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Extractor for MockExtractor {
    async fn extract(&self, _input: &RawInput) -> Result<Vec<ExtractedMention>, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ExtractionError::Unparseable {
                reason: "mock extractor forced failure".to_string(),
            });
        }
        if self.mentions.is_empty() {
            return Err(ExtractionError::EmptyResult);
        }
        Ok(self.mentions.clone())
    }
}
