//! Vector store abstraction layer.
//!
//! The core needs exactly three operations from a similarity index: append
//! records, count records, and fetch the texts of the k nearest records. The
//! [`VectorStore`] trait is that contract and nothing more - no deletes, no
//! updates, no score inspection. Retrieval uses every returned text
//! regardless of distance; relevance thresholds are deliberately not part of
//! the contract.
//!
//! `count() == 0` is the sentinel for "no documents ingested yet" and drives
//! the RAG/direct mode decision upstream.
//!
//! # Example
//!
//! ```rust,ignore
//! use mentor::db::vectorstore::VectorStoreProvider;
//!
//! // In-memory store (default when no CHROMADB_URL is configured)
//! let store = VectorStoreProvider::InMemory.create_store("documents").await?;
//!
//! store.add(records).await?;
//! let texts = store.query(&query_embedding, 5).await?;
//! ```

use crate::types::{ChunkRecord, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

// ============================================================================
// Vector Store Provider Configuration
// ============================================================================

/// Configuration for vector store backends.
#[derive(Debug, Clone)]
pub enum VectorStoreProvider {
    /// ChromaDB server, reached over its REST API.
    Chroma {
        /// ChromaDB server URL (e.g. `http://localhost:8000`).
        url: String,
    },
    /// Process-local store. Data is lost when the process exits; this is the
    /// default for development and the reference behavior for tests.
    InMemory,
}

impl VectorStoreProvider {
    /// Pick a provider from storage configuration: ChromaDB when a URL is
    /// configured, in-memory otherwise.
    pub fn from_config(storage: &crate::utils::config::StorageConfig) -> Self {
        match &storage.chroma_url {
            Some(url) => VectorStoreProvider::Chroma { url: url.clone() },
            None => VectorStoreProvider::InMemory,
        }
    }

    /// Create a store instance for `collection`.
    pub async fn create_store(&self, collection: &str) -> Result<std::sync::Arc<dyn VectorStore>> {
        match self {
            VectorStoreProvider::Chroma { url } => {
                let store = super::chroma::ChromaStore::connect(url, collection).await?;
                Ok(std::sync::Arc::new(store))
            }
            VectorStoreProvider::InMemory => {
                Ok(std::sync::Arc::new(InMemoryVectorStore::new()))
            }
        }
    }
}

// ============================================================================
// Vector Store Trait
// ============================================================================

/// Narrow contract over a similarity index.
///
/// The store is an append-only set keyed by record id; what happens when an
/// existing id is added again is backend-defined (the in-memory backend
/// replaces, ChromaDB applies its own semantics). The core never generates
/// duplicate ids.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Short backend name, for logs.
    fn provider_name(&self) -> &'static str;

    /// Append `records` to the store.
    async fn add(&self, records: Vec<ChunkRecord>) -> Result<()>;

    /// Current record count.
    async fn count(&self) -> Result<usize>;

    /// Texts of the up-to-`top_k` records nearest to `embedding`,
    /// nearest-first. An empty store yields an empty result, not an error.
    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<String>>;
}

// ============================================================================
// In-Memory Vector Store
// ============================================================================

/// Process-local vector store using cosine similarity.
pub struct InMemoryVectorStore {
    records: RwLock<HashMap<String, ChunkRecord>>,
}

impl InMemoryVectorStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }

        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    fn provider_name(&self) -> &'static str {
        "in-memory"
    }

    async fn add(&self, records: Vec<ChunkRecord>) -> Result<()> {
        let mut map = self.records.write();
        for record in records {
            map.insert(record.id.clone(), record);
        }
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().len())
    }

    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<String>> {
        let map = self.records.read();

        let mut scored: Vec<(f32, &ChunkRecord)> = map
            .values()
            .map(|record| (Self::cosine_similarity(embedding, &record.embedding), record))
            .collect();

        // Nearest first. No score threshold: all top-k results are used
        // regardless of distance.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        Ok(scored.into_iter().map(|(_, r)| r.text.clone()).collect())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChunkMetadata;

    fn record(id: &str, embedding: Vec<f32>, text: &str) -> ChunkRecord {
        ChunkRecord {
            id: id.to_string(),
            embedding,
            metadata: ChunkMetadata {
                filename: "test.txt".to_string(),
                chunk_index: 0,
            },
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_store_queries_cleanly() {
        let store = InMemoryVectorStore::new();
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.query(&[1.0, 0.0], 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_and_count() {
        let store = InMemoryVectorStore::new();
        store
            .add(vec![
                record("a_0", vec![1.0, 0.0], "first"),
                record("a_1", vec![0.0, 1.0], "second"),
            ])
            .await
            .unwrap();
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_query_returns_nearest_first() {
        let store = InMemoryVectorStore::new();
        store
            .add(vec![
                record("a_0", vec![1.0, 0.0], "exact"),
                record("a_1", vec![0.0, 1.0], "orthogonal"),
                record("a_2", vec![0.9, 0.1], "close"),
            ])
            .await
            .unwrap();

        let texts = store.query(&[1.0, 0.0], 2).await.unwrap();
        assert_eq!(texts, vec!["exact".to_string(), "close".to_string()]);
    }

    #[tokio::test]
    async fn test_query_does_not_filter_by_score() {
        // A zero query vector scores 0.0 against everything but still
        // returns results - thresholding is not part of the contract.
        let store = InMemoryVectorStore::new();
        store
            .add(vec![record("a_0", vec![1.0, 0.0], "anything")])
            .await
            .unwrap();

        let texts = store.query(&[0.0, 0.0], 5).await.unwrap();
        assert_eq!(texts.len(), 1);
    }

    #[tokio::test]
    async fn test_add_replaces_on_duplicate_id() {
        let store = InMemoryVectorStore::new();
        store
            .add(vec![record("a_0", vec![1.0, 0.0], "old")])
            .await
            .unwrap();
        store
            .add(vec![record("a_0", vec![1.0, 0.0], "new")])
            .await
            .unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.query(&[1.0, 0.0], 1).await.unwrap(), vec!["new".to_string()]);
    }

    #[test]
    fn test_cosine_similarity() {
        // Identical vectors
        assert!(
            (InMemoryVectorStore::cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 0.001
        );

        // Orthogonal vectors
        assert!(InMemoryVectorStore::cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 0.001);

        // Zero vector degrades to 0.0, not NaN
        assert_eq!(InMemoryVectorStore::cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}
