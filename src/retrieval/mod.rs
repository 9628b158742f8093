//! Hybrid retrieval engine.
//!
//! Embeds the query text twice (dense and sparse), queries the vector index
//! under a timeout, blends the two signals with an explicit alpha, penalizes
//! variant-contradicting hits, applies the prescriber prior, and resolves each
//! hit against ground truth.

mod blend;
mod engine;
mod error;

#[cfg(test)]
mod tests;

pub use blend::{BlendedHit, blend_hits, has_variant_mismatch};
pub use engine::{HybridRetriever, RetrievalConfig, Retrieved};
pub use error::RetrievalError;
