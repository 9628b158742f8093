//! Dense and sparse query embeddings.
//!
//! Retrieval needs two views of the same query text: a dense vector for
//! semantic similarity and a sparse term vector for exact lexical overlap
//! (variant numbers in particular). [`HybridEmbedder`] is the seam; the
//! bundled [`HashingEmbedder`] is deterministic and needs no model files.

mod error;


use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::debug;

pub use error::EmbeddingError;

use crate::constants::DENSE_EMBEDDING_DIM;
use crate::hashing::{hash_to_u64, hash_token};

/// Sparse term-weight vector (indices are unique and ascending).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    pub indices: Vec<u32>,
    pub values: Vec<f32>,
}

impl SparseVector {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Dot product against another sparse vector.
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j, mut sum) = (0, 0, 0.0);
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Produces both query embeddings for a text.
#[async_trait]
pub trait HybridEmbedder: Send + Sync {
    async fn dense_embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    async fn sparse_embed(&self, text: &str) -> Result<SparseVector, EmbeddingError>;
}

/// Lowercase alphanumeric tokens of `text`.
pub fn lexical_tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

/// Feature-hashing embedder.
///
/// Dense vectors hash character trigrams of each token into a fixed number of
/// buckets and are L2-normalized. Sparse vectors map each token to a BLAKE3
/// bucket weighted by term frequency.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self {
            dim: DENSE_EMBEDDING_DIM,
        }
    }
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Result<Self, EmbeddingError> {
        if dim == 0 {
            return Err(EmbeddingError::InvalidDimension {
                expected: DENSE_EMBEDDING_DIM,
                actual: dim,
            });
        }
        Ok(Self { dim })
    }

    pub fn embedding_dim(&self) -> usize {
        self.dim
    }

    /// Synchronous dense embedding.
    pub fn embed_dense(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut embedding = vec![0.0f32; self.dim];
        let mut features = 0usize;

        for token in lexical_tokens(text) {
            let padded: Vec<char> = format!("#{token}#").chars().collect();
            for gram in padded.windows(3) {
                let gram: String = gram.iter().collect();
                let h = hash_to_u64(gram.as_bytes());
                let bucket = (h % self.dim as u64) as usize;
                let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
                embedding[bucket] += sign;
                features += 1;
            }
        }

        if features == 0 {
            return Err(EmbeddingError::EmptyInput);
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut embedding {
                *x /= norm;
            }
        }

        debug!(text_len = text.len(), features, "Generated dense embedding");
        Ok(embedding)
    }

    /// Synchronous sparse embedding.
    pub fn embed_sparse(&self, text: &str) -> Result<SparseVector, EmbeddingError> {
        let mut weights: BTreeMap<u32, f32> = BTreeMap::new();
        for token in lexical_tokens(text) {
            *weights.entry(hash_token(&token)).or_default() += 1.0;
        }

        if weights.is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let (indices, values) = weights.into_iter().unzip();
        Ok(SparseVector { indices, values })
    }
}

#[async_trait]
impl HybridEmbedder for HashingEmbedder {
    async fn dense_embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_dense(text)
    }

    async fn sparse_embed(&self, text: &str) -> Result<SparseVector, EmbeddingError> {
        self.embed_sparse(text)
    }
}
