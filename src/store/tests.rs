use std::io::Write;

use super::*;

fn record(id: &str, brand: &str, generic: &str) -> MedicineRecord {
    MedicineRecord {
        id: id.to_string(),
        brand_name: brand.to_string(),
        generic_name: generic.to_string(),
        official_strength: "500 mg".to_string(),
        form: "tablet".to_string(),
        combination_flag: false,
    }
}

fn store() -> InMemoryGroundTruth {
    InMemoryGroundTruth::new([
        record("med-1", "Augmentin 625 Duo", "amoxicillin + clavulanic acid"),
        record("med-2", "Crocin", "paracetamol"),
        record("med-3", "Dolo 650", "paracetamol"),
    ])
    .with_prior("dr-1", "med-1")
}

#[tokio::test]
async fn test_lookup_record() {
    let store = store();

    let found = store.lookup_record("med-2").await.unwrap();
    assert_eq!(found.brand_name, "Crocin");

    let err = store.lookup_record("med-9").await.unwrap_err();
    assert!(matches!(err, StoreError::RecordNotFound { id } if id == "med-9"));
}

#[tokio::test]
async fn test_lookup_priors() {
    let store = store();

    let priors = store.lookup_priors("dr-1").await.unwrap();
    assert!(priors.contains("med-1"));

    assert!(store.lookup_priors("dr-unknown").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_text_matches_brand_and_generic() {
    let store = store();

    let by_brand = store.search_text("AUGMENTIN", 10).await.unwrap();
    assert_eq!(by_brand.len(), 1);

    let by_generic = store.search_text("paracetamol", 10).await.unwrap();
    let ids: Vec<_> = by_generic.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["med-2", "med-3"]);

    assert_eq!(store.search_text("paracetamol", 1).await.unwrap().len(), 1);
    assert!(store.search_text("  ", 10).await.unwrap().is_empty());
}

#[test]
fn test_from_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ground_truth.json");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(
        file,
        r#"{{
            "records": [
                {{"id": "med-1", "brand_name": "Augmentin 625 Duo", "generic_name": "amoxicillin + clavulanic acid",
                  "official_strength": "500 mg + 125 mg", "form": "tablet", "combination_flag": true}}
            ],
            "prescriber_history": [{{"prescriber_id": "dr-1", "record_id": "med-1"}}]
        }}"#
    )
    .unwrap();

    let store = InMemoryGroundTruth::from_json_file(&path).unwrap();

    assert_eq!(store.len(), 1);
    assert!(store.records().all(|r| r.combination_flag));
}

#[test]
fn test_from_json_file_rejects_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{"records": "nope"}"#).unwrap();

    let err = InMemoryGroundTruth::from_json_file(&path).unwrap_err();
    assert!(matches!(err, StoreError::Load { .. }));
}

#[test]
fn test_from_json_file_missing() {
    let err = InMemoryGroundTruth::from_json_file(Path::new("/nonexistent/gt.json")).unwrap_err();
    assert!(matches!(err, StoreError::Io(_)));
}

#[tokio::test]
async fn test_lookup_brand_matches_variant_stripped_key() {
    let store = store();

    let augmentin = store.lookup_brand("augmentin duo").await.unwrap();
    assert_eq!(augmentin.len(), 1);
    assert_eq!(augmentin[0].id, "med-1");

    let dolo = store.lookup_brand("Dolo").await.unwrap();
    assert_eq!(dolo[0].id, "med-3");

    assert!(store.lookup_brand("augmentin").await.unwrap().is_empty());
    assert!(store.lookup_brand(" ").await.unwrap().is_empty());
}
