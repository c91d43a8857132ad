//! Context retrieval for chat turns.

use std::sync::Arc;

use crate::db::vectorstore::VectorStore;
use crate::llm::client::Embedder;
use crate::types::Result;

/// Fetches the chunks most relevant to a user query.
///
/// Retrieval must never abort a chat turn: every failure path collapses to
/// an empty result, which downstream simply means "answer without context".
/// An empty store short-circuits before any embedding call is made.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    top_k: usize,
}

impl Retriever {
    /// Assemble a retriever fetching `top_k` chunks per query.
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>, top_k: usize) -> Self {
        Self {
            embedder,
            store,
            top_k,
        }
    }

    /// The texts of the up-to-`top_k` chunks nearest to `query`,
    /// nearest-first. Infallible by design.
    pub async fn retrieve(&self, query: &str) -> Vec<String> {
        match self.try_retrieve(query).await {
            Ok(chunks) => chunks,
            Err(e) => {
                tracing::warn!(error = %e, "retrieval failed, continuing without context");
                Vec::new()
            }
        }
    }

    async fn try_retrieve(&self, query: &str) -> Result<Vec<String>> {
        if self.store.count().await? == 0 {
            return Ok(Vec::new());
        }

        // Read path: a failed embedding degrades to the zero vector rather
        // than erroring (see Embedder::embed_query).
        let embedding = self.embedder.embed_query(query).await;
        self.store.query(&embedding, self.top_k).await
    }
}
