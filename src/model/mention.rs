use serde::{Deserialize, Serialize};

/// One medicine mention as extracted from the request input.
///
/// Guardrail stages never mutate a mention in place; each returns a new one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractedMention {
    pub raw_input: String,
    pub brand: String,
    pub variant: Option<String>,
    pub generic_name: Option<String>,
    pub strength: Option<String>,
    pub form: Option<String>,
    pub frequency: Option<String>,
}

impl ExtractedMention {
    /// Creates a mention with only the raw input and brand set.
    pub fn new(raw_input: impl Into<String>, brand: impl Into<String>) -> Self {
        Self {
            raw_input: raw_input.into(),
            brand: brand.into(),
            ..Default::default()
        }
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    pub fn with_generic_name(mut self, generic_name: impl Into<String>) -> Self {
        self.generic_name = Some(generic_name.into());
        self
    }

    pub fn with_strength(mut self, strength: impl Into<String>) -> Self {
        self.strength = Some(strength.into());
        self
    }

    pub fn with_form(mut self, form: impl Into<String>) -> Self {
        self.form = Some(form.into());
        self
    }

    pub fn with_frequency(mut self, frequency: impl Into<String>) -> Self {
        self.frequency = Some(frequency.into());
        self
    }

    /// Text used to build the dense and sparse query embeddings.
    pub fn query_text(&self) -> String {
        [
            Some(self.brand.as_str()),
            self.variant.as_deref(),
            self.generic_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}
