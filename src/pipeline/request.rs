use serde::{Deserialize, Serialize};

use super::ValidationError;
use crate::extraction::RawInput;

/// Inbound request: image or text, plus an optional prescriber.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRequest {
    #[serde(default)]
    pub image_base64: Option<String>,
    #[serde(default)]
    pub raw_text: Option<String>,
    #[serde(default)]
    pub prescriber_id: Option<String>,
}

impl ProcessRequest {
    pub fn from_text(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: Some(raw_text.into()),
            ..Self::default()
        }
    }

    pub fn from_image(image_base64: impl Into<String>) -> Self {
        Self {
            image_base64: Some(image_base64.into()),
            ..Self::default()
        }
    }

    pub fn with_prescriber(mut self, prescriber_id: impl Into<String>) -> Self {
        self.prescriber_id = Some(prescriber_id.into());
        self
    }

    /// Checks the request and picks the input: a non-blank image wins over text.
    pub fn validate(&self) -> Result<RawInput, ValidationError> {
        if self
            .prescriber_id
            .as_deref()
            .is_some_and(|p| p.trim().is_empty())
        {
            return Err(ValidationError::BlankPrescriberId);
        }

        let non_blank = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());

        if let Some(image) = non_blank(&self.image_base64) {
            return Ok(RawInput::Image(image));
        }
        if let Some(text) = non_blank(&self.raw_text) {
            return Ok(RawInput::Text(text));
        }
        Err(ValidationError::EmptyInput)
    }

    pub fn prescriber(&self) -> Option<&str> {
        self.prescriber_id.as_deref().map(str::trim)
    }
}
