//! Embedding client abstraction.

use crate::types::Result;
use async_trait::async_trait;

/// Turns text into a fixed-dimension vector.
///
/// The two entry points encode a deliberate asymmetry between the write and
/// read paths:
///
/// - [`embed`](Embedder::embed) fails loudly. Document ingestion uses it, and
///   any failure rejects the whole document.
/// - [`embed_query`](Embedder::embed_query) never fails. Retrieval uses it,
///   and on any failure it substitutes the all-zero vector so a chat turn can
///   continue (degraded to meaningless similarity, which the caller treats
///   like an empty retrieval at worst).
///
/// Implementations must not weaken either side of this contract.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed `text`, failing on any transport, status, or degenerate-output
    /// problem.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Length of the vectors this embedder produces.
    fn dimensions(&self) -> usize;

    /// Embed a retrieval query, degrading to the all-zero vector on failure.
    async fn embed_query(&self, text: &str) -> Vec<f32> {
        match self.embed(text).await {
            Ok(embedding) => embedding,
            Err(e) => {
                tracing::warn!(error = %e, "query embedding failed, substituting zero vector");
                vec![0.0; self.dimensions()]
            }
        }
    }
}
