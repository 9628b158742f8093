//! Boundary validation for extraction payloads.
//!
//! External extractors return loosely-typed JSON. It is validated here into
//! [`ExtractedMention`]; nothing downstream sees the raw payload.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::ExtractionError;
use crate::model::ExtractedMention;
use crate::normalize::collapse_whitespace;

/// One medicine as reported by an extractor.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExtractionPayload {
    #[serde(default, alias = "brand_name", deserialize_with = "lenient_string")]
    pub brand: Option<String>,
    #[serde(default, alias = "brand_variant", deserialize_with = "lenient_string")]
    pub variant: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub generic_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub strength: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub form: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub frequency: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PayloadBatch {
    Batch { medicines: Vec<ExtractionPayload> },
    Many(Vec<ExtractionPayload>),
    One(ExtractionPayload),
}

/// Accepts strings and numbers (`"variant": 625`); null is unset.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| collapse_whitespace(&v))
        .filter(|v| !v.is_empty())
}

impl ExtractionPayload {
    /// Validates into a mention; `brand` must be present and non-blank.
    pub fn into_mention(self, raw_input: &str) -> Result<ExtractedMention, ExtractionError> {
        let brand = clean(self.brand).ok_or_else(|| ExtractionError::InvalidPayload {
            reason: "missing brand".to_string(),
        })?;

        Ok(ExtractedMention {
            raw_input: raw_input.to_string(),
            brand,
            variant: clean(self.variant),
            generic_name: clean(self.generic_name),
            strength: clean(self.strength),
            form: clean(self.form),
            frequency: clean(self.frequency),
        })
    }
}

/// Parses a single payload, an array, or `{"medicines": [...]}`.
pub fn parse_payloads(json: &str, raw_input: &str) -> Result<Vec<ExtractedMention>, ExtractionError> {
    let batch: PayloadBatch =
        serde_json::from_str(json).map_err(|e| ExtractionError::InvalidPayload {
            reason: e.to_string(),
        })?;

    let payloads = match batch {
        PayloadBatch::Batch { medicines } | PayloadBatch::Many(medicines) => medicines,
        PayloadBatch::One(payload) => vec![payload],
    };

    if payloads.is_empty() {
        return Err(ExtractionError::EmptyResult);
    }

    payloads
        .into_iter()
        .map(|p| p.into_mention(raw_input))
        .collect()
}
