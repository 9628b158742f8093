use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The input could not be turned into any medicine mention.
    #[error("could not parse input: {reason}")]
    Unparseable { reason: String },

    /// This extractor does not handle the input kind.
    #[error("unsupported input: {reason}")]
    UnsupportedInput { reason: String },

    /// An extraction payload failed boundary validation.
    #[error("invalid extraction payload: {reason}")]
    InvalidPayload { reason: String },

    #[error("extraction produced no medicines")]
    EmptyResult,
}
