use crate::hashing::{Fingerprint, fingerprint_input};

/// Raw request input handed to an extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInput {
    /// Free prescription text.
    Text(String),
    /// Base64 image or PDF payload.
    Image(String),
}

impl RawInput {
    /// Bytes the content fingerprint is computed over.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RawInput::Text(text) => text.as_bytes(),
            RawInput::Image(payload) => payload.as_bytes(),
        }
    }

    pub fn fingerprint(&self) -> Fingerprint {
        fingerprint_input(self.as_bytes())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RawInput::Text(_) => "text",
            RawInput::Image(_) => "image",
        }
    }
}
