use medguard::{HashingEmbedder, InMemoryGroundTruth, MedicineRecord, MockVectorIndex};

pub const AMOXICLAV_625: &str = "med-amoxiclav-625";
pub const AMOXICLAV_375: &str = "med-amoxiclav-375";
pub const AUGMENTIN_625: &str = "med-augmentin-625";
pub const DOLO_650: &str = "med-dolo-650";
pub const CROCIN: &str = "med-crocin-advance";

pub fn record(
    id: &str,
    brand: &str,
    generic: &str,
    strength: &str,
    form: &str,
    combination: bool,
) -> MedicineRecord {
    MedicineRecord {
        id: id.to_string(),
        brand_name: brand.to_string(),
        generic_name: generic.to_string(),
        official_strength: strength.to_string(),
        form: form.to_string(),
        combination_flag: combination,
    }
}

pub fn formulary() -> Vec<MedicineRecord> {
    vec![
        record(
            AMOXICLAV_625,
            "Amoxiclav 625",
            "amoxicillin + clavulanic acid",
            "500 mg + 125 mg",
            "Tablet",
            true,
        ),
        record(
            AMOXICLAV_375,
            "Amoxiclav 375",
            "amoxicillin + clavulanic acid",
            "250 mg + 125 mg",
            "Tablet",
            true,
        ),
        record(
            AUGMENTIN_625,
            "Augmentin 625 Duo",
            "amoxicillin + clavulanic acid",
            "500 mg + 125 mg",
            "Tablet",
            true,
        ),
        record(DOLO_650, "Dolo 650", "paracetamol", "650 mg", "Tablet", false),
        record(CROCIN, "Crocin Advance", "paracetamol", "500 mg", "Tablet", false),
    ]
}

pub fn ground_truth() -> InMemoryGroundTruth {
    InMemoryGroundTruth::new(formulary())
}

/// Index whose points score every query the same way.
///
/// Amoxiclav 625 and 375 are near-ties on dense similarity.
pub fn scored_index() -> MockVectorIndex {
    let index = MockVectorIndex::new();
    index.insert_scored(AMOXICLAV_625, "Amoxiclav 625", 0.93, 1.0);
    index.insert_scored(AMOXICLAV_375, "Amoxiclav 375", 0.91, 0.8);
    index.insert_scored(DOLO_650, "Dolo 650", 0.30, 0.0);
    index
}

/// Index embedding every formulary record with the hashing embedder.
pub fn embedded_index() -> MockVectorIndex {
    let embedder = HashingEmbedder::default();
    let index = MockVectorIndex::new();
    for record in formulary() {
        index
            .insert_record(&record, &embedder)
            .expect("formulary records embed");
    }
    index
}
