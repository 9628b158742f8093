use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuardrailError {
    /// The matched ground-truth record lacks a field a post-match rule reads.
    #[error("ground-truth record '{record_id}' is missing required field '{field}'")]
    MissingRecordField {
        record_id: String,
        field: &'static str,
    },

    /// A combination product was asked to be split into components.
    #[error("record '{record_id}' is a combination product and cannot be split")]
    CombinationLocked { record_id: String },

    #[error("official strength was not injected for record '{record_id}'")]
    StrengthNotInjected { record_id: String },
}
