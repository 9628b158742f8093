use std::sync::Arc;

use medguard::{
    ExtractedMention, GoldenResponses, GuardrailPipeline, HashingEmbedder, InMemoryGroundTruth,
    LocalTextExtractor, MockExtractor, MockVectorIndex, RetrievalConfig,
};

pub type TestPipeline = GuardrailPipeline<MockVectorIndex, InMemoryGroundTruth>;

/// A pipeline with the bundled rule-based text extractor.
pub fn with_local_extractor(index: MockVectorIndex) -> TestPipeline {
    GuardrailPipeline::new(
        Arc::new(LocalTextExtractor::new()),
        Arc::new(GoldenResponses::empty()),
        Arc::new(HashingEmbedder::default()),
        Arc::new(index),
        Arc::new(super::fixtures::ground_truth()),
        RetrievalConfig::default(),
    )
}

/// A pipeline over mock collaborators, with handles kept for assertions.
pub struct Harness {
    pub pipeline: TestPipeline,
    pub extractor: Arc<MockExtractor>,
    pub index: Arc<MockVectorIndex>,
}

pub struct HarnessConfig {
    pub mentions: Vec<ExtractedMention>,
    pub index: MockVectorIndex,
    pub store: InMemoryGroundTruth,
    pub golden: GoldenResponses,
    pub retrieval: RetrievalConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            mentions: Vec::new(),
            index: super::fixtures::scored_index(),
            store: super::fixtures::ground_truth(),
            golden: GoldenResponses::empty(),
            retrieval: RetrievalConfig::default(),
        }
    }
}

pub fn build(config: HarnessConfig) -> Harness {
    let extractor = MockExtractor::returning(config.mentions.clone());
    build_with_extractor(extractor, config)
}

/// Like [`build`], but with a prepared extractor instead of `config.mentions`.
pub fn build_with_extractor(extractor: MockExtractor, config: HarnessConfig) -> Harness {
    let extractor = Arc::new(extractor);
    let index = Arc::new(config.index);

    let pipeline = GuardrailPipeline::new(
        extractor.clone(),
        Arc::new(config.golden),
        Arc::new(HashingEmbedder::default()),
        Arc::clone(&index),
        Arc::new(config.store),
        config.retrieval,
    );

    Harness {
        pipeline,
        extractor,
        index,
    }
}

pub fn with_mentions(mentions: Vec<ExtractedMention>) -> Harness {
    build(HarnessConfig {
        mentions,
        ..HarnessConfig::default()
    })
}
