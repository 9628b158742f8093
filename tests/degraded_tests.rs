//! Behavior when the vector index is unreachable.

mod common;

use std::time::Duration;

use medguard::{
    ExtractedMention, GuardrailRule, InMemoryGroundTruth, IndexFault, ProcessRequest,
    RetrievalConfig, RiskTier,
};

use common::fixtures::{AMOXICLAV_625, record, scored_index};
use common::harness::{HarnessConfig, build};

fn degraded_message() -> String {
    GuardrailRule::DegradedRetrieval.message().to_string()
}

fn amoxiclav() -> Vec<ExtractedMention> {
    vec![ExtractedMention::new("Amoxiclav 625 Tab", "Amoxiclav 625").with_form("Tab")]
}

#[tokio::test]
async fn test_offline_index_falls_back_to_local_match() {
    let index = scored_index();
    index.set_fault(Some(IndexFault::Unavailable));
    let harness = build(HarnessConfig {
        mentions: amoxiclav(),
        index,
        ..HarnessConfig::default()
    });

    let response = harness
        .pipeline
        .process(&ProcessRequest::from_text("Amoxiclav 625 Tab"))
        .await
        .expect("Degraded mode should still answer");

    assert_eq!(harness.index.query_count(), 1);
    assert!(response.guardrail_logs.contains(&degraded_message()));

    let medicine = &response.medicines[0];
    assert!(medicine.guardrail_logs.contains(&degraded_message()));
    let matched = medicine.matched_medicine.as_ref().unwrap();
    assert_eq!(matched.id, AMOXICLAV_625);
    assert_eq!(matched.official_strength, "500 mg + 125 mg");
    assert!((matched.final_similarity_score - 0.90).abs() < 1e-6);
    assert_eq!(matched.clinical_risk_tier, RiskTier::High);
}

#[tokio::test]
async fn test_hanging_index_is_bounded_by_timeout() {
    let index = scored_index();
    index.set_fault(Some(IndexFault::Hang));
    let harness = build(HarnessConfig {
        mentions: amoxiclav(),
        index,
        retrieval: RetrievalConfig {
            timeout: Duration::from_millis(50),
            ..RetrievalConfig::default()
        },
        ..HarnessConfig::default()
    });

    let response = tokio::time::timeout(
        Duration::from_secs(5),
        harness
            .pipeline
            .process(&ProcessRequest::from_text("Amoxiclav 625 Tab")),
    )
    .await
    .expect("Pipeline must not hang")
    .unwrap();

    assert!(response.guardrail_logs.contains(&degraded_message()));
    let matched = response.medicines[0].matched_medicine.as_ref().unwrap();
    assert_eq!(matched.id, AMOXICLAV_625);
}

#[tokio::test]
async fn test_healthy_index_does_not_degrade() {
    let harness = build(HarnessConfig {
        mentions: amoxiclav(),
        ..HarnessConfig::default()
    });

    let response = harness
        .pipeline
        .process(&ProcessRequest::from_text("Amoxiclav 625 Tab"))
        .await
        .unwrap();

    assert!(!response.guardrail_logs.contains(&degraded_message()));
}

#[tokio::test]
async fn test_offline_index_grounds_exact_variant_among_many_siblings() {
    let mut records: Vec<_> = (0..12)
        .map(|i| {
            record(
                &format!("a-{i:02}"),
                &format!("Amoxiclav {}", 100 + i),
                "amoxicillin + clavulanic acid",
                "100 mg",
                "Tablet",
                true,
            )
        })
        .collect();
    records.push(record(
        "z-625",
        "Amoxiclav 625",
        "amoxicillin + clavulanic acid",
        "500 mg + 125 mg",
        "Tablet",
        true,
    ));

    let index = scored_index();
    index.set_fault(Some(IndexFault::Unavailable));
    let harness = build(HarnessConfig {
        mentions: vec![ExtractedMention::new("Amoxiclav 625", "Amoxiclav 625")],
        index,
        store: InMemoryGroundTruth::new(records),
        ..HarnessConfig::default()
    });

    let response = harness
        .pipeline
        .process(&ProcessRequest::from_text("Amoxiclav 625"))
        .await
        .unwrap();

    let matched = response.medicines[0].matched_medicine.as_ref().unwrap();
    assert_eq!(matched.id, "z-625");
    assert_eq!(matched.official_strength, "500 mg + 125 mg");
    assert!(!matched.manual_review_required);
}
