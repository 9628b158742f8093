//! Fallback cache.
//!
//! - [`golden`] intercepts known inputs by fingerprint before extraction.
//! - [`degraded`] sources candidates locally when hybrid retrieval is unavailable.

pub mod degraded;
mod error;
pub mod golden;


pub use degraded::{DegradedMatcher, local_score, search_terms};
pub use error::GoldenCacheError;
pub use golden::{GoldenLookup, GoldenResponses};
