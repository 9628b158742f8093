use std::collections::BTreeMap;
use std::future::Future;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{ScoredPoint, SearchPointsBuilder};
use tracing::{debug, instrument};

use super::error::VectorIndexError;
use super::model::{RawHit, scored_point_parts};
use crate::embedding::SparseVector;

/// Named vector holding the dense embedding.
pub const DENSE_VECTOR_NAME: &str = "dense";
/// Named vector holding the sparse term weights.
pub const SPARSE_VECTOR_NAME: &str = "sparse";

/// Read-only hybrid query capability over the medicine index.
pub trait VectorIndex: Send + Sync {
    /// Runs the dense and sparse searches and merges hits by record id.
    fn query(
        &self,
        dense: Vec<f32>,
        sparse: SparseVector,
        top_k: u64,
    ) -> impl Future<Output = Result<Vec<RawHit>, VectorIndexError>> + Send;

    /// Returns `true` if the index answers.
    fn is_ready(&self) -> impl Future<Output = bool> + Send;
}

#[derive(Clone)]
/// Qdrant-backed index with named `dense` and `sparse` vectors.
pub struct QdrantIndex {
    client: Qdrant,
    url: String,
    collection: String,
}

impl QdrantIndex {
    /// Creates a client for `url`. Does not contact the server.
    pub fn new(url: &str, collection: &str) -> Result<Self, VectorIndexError> {
        let client =
            Qdrant::from_url(url)
                .build()
                .map_err(|e| VectorIndexError::ConnectionFailed {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

        Ok(Self {
            client,
            url: url.to_string(),
            collection: collection.to_string(),
        })
    }

    /// Returns the configured URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Performs a basic health check request.
    pub async fn health_check(&self) -> Result<(), VectorIndexError> {
        self.client
            .health_check()
            .await
            .map_err(|e| VectorIndexError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn search_dense(
        &self,
        vector: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<ScoredPoint>, VectorIndexError> {
        let builder = SearchPointsBuilder::new(&self.collection, vector, limit)
            .vector_name(DENSE_VECTOR_NAME)
            .with_payload(true);
        self.search(builder).await
    }

    async fn search_sparse(
        &self,
        sparse: SparseVector,
        limit: u64,
    ) -> Result<Vec<ScoredPoint>, VectorIndexError> {
        let builder = SearchPointsBuilder::new(&self.collection, sparse.values, limit)
            .vector_name(SPARSE_VECTOR_NAME)
            .sparse_indices(sparse.indices)
            .with_payload(true);
        self.search(builder).await
    }

    async fn search(
        &self,
        builder: SearchPointsBuilder,
    ) -> Result<Vec<ScoredPoint>, VectorIndexError> {
        let response = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| VectorIndexError::SearchFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;
        Ok(response.result)
    }
}

/// Merges the two result lists by record id (ascending id order).
pub fn merge_hits(dense: Vec<ScoredPoint>, sparse: Vec<ScoredPoint>) -> Vec<RawHit> {
    let mut merged: BTreeMap<String, RawHit> = BTreeMap::new();

    for (record_id, text, score) in dense.iter().filter_map(scored_point_parts) {
        merged
            .entry(record_id.clone())
            .or_insert_with(|| RawHit::new(record_id, text))
            .dense_score = score;
    }

    for (record_id, text, score) in sparse.iter().filter_map(scored_point_parts) {
        merged
            .entry(record_id.clone())
            .or_insert_with(|| RawHit::new(record_id, text))
            .sparse_score = score;
    }

    merged.into_values().collect()
}

impl VectorIndex for QdrantIndex {
    #[instrument(skip_all, fields(collection = %self.collection, top_k))]
    async fn query(
        &self,
        dense: Vec<f32>,
        sparse: SparseVector,
        top_k: u64,
    ) -> Result<Vec<RawHit>, VectorIndexError> {
        let (dense_hits, sparse_hits) =
            tokio::join!(self.search_dense(dense, top_k), self.search_sparse(sparse, top_k));

        let hits = merge_hits(dense_hits?, sparse_hits?);
        debug!(hits = hits.len(), "Hybrid index query complete");
        Ok(hits)
    }

    async fn is_ready(&self) -> bool {
        self.health_check().await.is_ok()
    }
}
