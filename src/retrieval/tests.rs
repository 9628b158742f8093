use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::audit::GuardrailRule;
use crate::embedding::HashingEmbedder;
use crate::model::{ExtractedMention, MedicineRecord};
use crate::store::InMemoryGroundTruth;
use crate::vectordb::{IndexFault, MockVectorIndex, RawHit};

fn record(id: &str, brand: &str) -> MedicineRecord {
    MedicineRecord {
        id: id.to_string(),
        brand_name: brand.to_string(),
        generic_name: "amoxicillin + clavulanic acid".to_string(),
        official_strength: "500 mg + 125 mg".to_string(),
        form: "tablet".to_string(),
        combination_flag: true,
    }
}

fn retriever(
    index: MockVectorIndex,
    store: InMemoryGroundTruth,
    timeout: Duration,
) -> HybridRetriever<MockVectorIndex, InMemoryGroundTruth> {
    HybridRetriever::new(
        Arc::new(HashingEmbedder::default()),
        Arc::new(index),
        Arc::new(store),
        RetrievalConfig {
            timeout,
            ..RetrievalConfig::default()
        },
    )
}

fn augmentin_625() -> ExtractedMention {
    ExtractedMention::new("Augmentin 625", "augmentin").with_variant("625")
}

#[test]
fn test_has_variant_mismatch() {
    assert!(has_variant_mismatch("Augmentin 375", Some("625")));
    assert!(!has_variant_mismatch("Augmentin 625 Duo", Some("625")));
    assert!(!has_variant_mismatch("Augmentin", Some("625")));
    assert!(!has_variant_mismatch("Augmentin 375", None));
    assert!(!has_variant_mismatch("Augmentin 375", Some("duo")));
    assert!(!has_variant_mismatch("Augmentin 375 625", Some("625")));
}

#[test]
fn test_blend_normalizes_sparse_and_clamps_dense() {
    let hits = vec![
        RawHit::new("a", "crocin").with_scores(1.2, 4.0),
        RawHit::new("b", "crocin").with_scores(-0.3, 2.0),
    ];

    let blended = blend_hits(&hits, None, 0.5, 0.5);

    assert!((blended[0].combined_score - 1.0).abs() < 1e-6);
    assert!((blended[1].combined_score - 0.25).abs() < 1e-6);
}

#[test]
fn test_blend_without_sparse_signal() {
    let hits = vec![RawHit::new("a", "crocin").with_scores(0.8, 0.0)];

    let blended = blend_hits(&hits, None, 0.75, 0.5);

    assert!((blended[0].combined_score - 0.6).abs() < 1e-6);
}

#[test]
fn test_blend_penalizes_variant_mismatch() {
    let hits = vec![RawHit::new("a", "Augmentin 375").with_scores(1.0, 1.0)];

    let blended = blend_hits(&hits, Some("625"), 0.75, 0.5);

    assert!(blended[0].variant_mismatch);
    assert!((blended[0].combined_score - 0.5).abs() < 1e-6);
}

#[tokio::test]
async fn test_sparse_penalty_ranks_mismatched_variant_last() {
    let index = MockVectorIndex::new();
    index.insert_scored("med-375", "Augmentin 375", 0.99, 1.0);
    index.insert_scored("med-625", "Augmentin 625 Duo", 0.80, 2.0);
    let store = InMemoryGroundTruth::new([
        record("med-375", "Augmentin 375"),
        record("med-625", "Augmentin 625 Duo"),
    ]);

    let retrieved = retriever(index, store, Duration::from_secs(1))
        .retrieve(&augmentin_625(), None)
        .await
        .unwrap();

    let ids: Vec<_> = retrieved.candidates.iter().map(|c| c.record.id.as_str()).collect();
    assert_eq!(ids, vec!["med-625", "med-375"]);
    assert!(retrieved.candidates[1].variant_mismatch);
    assert!(retrieved.entries.is_empty());
}

#[tokio::test]
async fn test_ties_break_by_record_id() {
    let index = MockVectorIndex::new();
    index.insert_scored("med-b", "Crocin", 0.9, 0.0);
    index.insert_scored("med-a", "Crocin", 0.9, 0.0);
    let store = InMemoryGroundTruth::new([record("med-a", "Crocin"), record("med-b", "Crocin")]);

    let retrieved = retriever(index, store, Duration::from_secs(1))
        .retrieve(&ExtractedMention::new("crocin", "crocin"), None)
        .await
        .unwrap();

    assert_eq!(retrieved.candidates[0].record.id, "med-a");
    assert_eq!(retrieved.candidates[1].record.id, "med-b");
}

#[tokio::test]
async fn test_prescriber_prior_can_change_ranking() {
    let index = MockVectorIndex::new();
    index.insert_scored("med-a", "Crocin", 0.80, 0.0);
    index.insert_scored("med-b", "Crocin Advance", 0.85, 0.0);
    let store = InMemoryGroundTruth::new([record("med-a", "Crocin"), record("med-b", "Crocin Advance")])
        .with_prior("dr-1", "med-a");
    let retriever = retriever(index, store, Duration::from_secs(1));
    let mention = ExtractedMention::new("crocin", "crocin");

    let without = retriever.retrieve(&mention, None).await.unwrap();
    assert_eq!(without.candidates[0].record.id, "med-b");

    let with = retriever.retrieve(&mention, Some("dr-1")).await.unwrap();
    assert_eq!(with.candidates[0].record.id, "med-a");
    assert!((with.candidates[0].prior_boost - 0.10).abs() < 1e-6);
    assert!((with.candidates[0].combined_score - 0.70).abs() < 1e-5);
    assert_eq!(with.entries[0].rule, GuardrailRule::PrescriberPrior);
}

#[tokio::test]
async fn test_prior_never_lifts_mismatched_variant_above_consistent() {
    let index = MockVectorIndex::new();
    index.insert_scored("med-375", "Augmentin 375", 1.0, 2.0);
    index.insert_scored("med-625", "Augmentin 625 Duo", 0.3, 0.0);
    let store = InMemoryGroundTruth::new([
        record("med-375", "Augmentin 375"),
        record("med-625", "Augmentin 625 Duo"),
    ])
    .with_prior("dr-1", "med-375");

    let retrieved = retriever(index, store, Duration::from_secs(1))
        .retrieve(&augmentin_625(), Some("dr-1"))
        .await
        .unwrap();

    assert_eq!(retrieved.candidates[0].record.id, "med-625");
}

#[tokio::test]
async fn test_missing_record_is_discarded() {
    let index = MockVectorIndex::new();
    index.insert_scored("med-ghost", "Augmentin 625", 0.99, 2.0);
    index.insert_scored("med-625", "Augmentin 625 Duo", 0.80, 2.0);
    let store = InMemoryGroundTruth::new([record("med-625", "Augmentin 625 Duo")]);

    let retrieved = retriever(index, store, Duration::from_secs(1))
        .retrieve(&augmentin_625(), None)
        .await
        .unwrap();

    assert_eq!(retrieved.candidates.len(), 1);
    assert_eq!(retrieved.candidates[0].record.id, "med-625");
    assert_eq!(retrieved.entries[0].rule, GuardrailRule::CandidateDiscarded);
    assert!(retrieved.entries[0].message.ends_with("med-ghost"));
}

#[tokio::test]
async fn test_index_failure_is_unavailable() {
    let index = MockVectorIndex::new();
    index.set_fault(Some(IndexFault::Unavailable));

    let err = retriever(index, InMemoryGroundTruth::default(), Duration::from_secs(1))
        .retrieve(&augmentin_625(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, RetrievalError::Unavailable { .. }));
}

#[tokio::test]
async fn test_index_timeout_is_unavailable() {
    let index = MockVectorIndex::new();
    index.set_fault(Some(IndexFault::Hang));

    let err = retriever(index, InMemoryGroundTruth::default(), Duration::from_millis(20))
        .retrieve(&augmentin_625(), None)
        .await
        .unwrap_err();

    match err {
        RetrievalError::Unavailable { reason } => assert!(reason.contains("timed out")),
        other => panic!("expected Unavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_query_text_is_unavailable() {
    let err = retriever(MockVectorIndex::new(), InMemoryGroundTruth::default(), Duration::from_secs(1))
        .retrieve(&ExtractedMention::new("--", ""), None)
        .await
        .unwrap_err();

    assert!(matches!(err, RetrievalError::Unavailable { .. }));
}

#[test]
fn test_config_from_app_config() {
    let config = crate::config::Config {
        hybrid_alpha: 0.4,
        top_k: 9,
        query_timeout: Duration::from_millis(250),
        ..crate::config::Config::default()
    };

    let retrieval = RetrievalConfig::from(&config);

    assert_eq!(retrieval.alpha, 0.4);
    assert_eq!(retrieval.top_k, 9);
    assert_eq!(retrieval.timeout, Duration::from_millis(250));
    assert_eq!(retrieval.prior_boost, crate::constants::PRESCRIBER_PRIOR_BOOST);
}
