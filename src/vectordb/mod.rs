//! Vector index integration (Qdrant).
//!
//! The index is queried only; collection lifecycle is managed elsewhere.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;


pub use client::{DENSE_VECTOR_NAME, QdrantIndex, SPARSE_VECTOR_NAME, VectorIndex, merge_hits};
pub use error::VectorIndexError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{IndexFault, MockVectorIndex, cosine_similarity};
pub use model::{PAYLOAD_BRAND_NAME, PAYLOAD_RECORD_ID, RawHit};
