use serde::{Deserialize, Serialize};

use crate::guardrail::GuardrailError;
use crate::normalize::numeric_tokens;

/// Verified ground-truth medicine record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicineRecord {
    pub id: String,
    pub brand_name: String,
    pub generic_name: String,
    pub official_strength: String,
    pub form: String,
    #[serde(default)]
    pub combination_flag: bool,
}

impl MedicineRecord {
    /// First numeric token of the brand name (e.g. `"625"` for "Augmentin 625 Duo").
    pub fn brand_variant(&self) -> Option<&str> {
        numeric_tokens(&self.brand_name).next()
    }

    /// Ensures every field the post-match rules read is present.
    ///
    /// A record missing one of these cannot be grounded against, so the rule
    /// engine refuses it instead of skipping the rule.
    pub fn ensure_complete(&self) -> Result<(), GuardrailError> {
        let required = [
            ("id", &self.id),
            ("brand_name", &self.brand_name),
            ("official_strength", &self.official_strength),
            ("form", &self.form),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(GuardrailError::MissingRecordField {
                    record_id: self.id.clone(),
                    field,
                });
            }
        }

        Ok(())
    }
}
