//! Document ingestion: chunk, embed, store.

use std::sync::Arc;

use crate::db::vectorstore::VectorStore;
use crate::llm::client::Embedder;
use crate::rag::chunker::TextChunker;
use crate::types::{ChunkMetadata, ChunkRecord, Result};

/// Writes a document's chunks and embeddings into the vector store.
///
/// Submission is all-or-nothing per document: chunks are embedded one at a
/// time (one in-flight call, predictable load on the model service), and a
/// failure on any chunk aborts the whole document with nothing written. The
/// caller owns cleanup of whatever it persisted alongside.
pub struct IngestionPipeline {
    chunker: TextChunker,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
}

impl IngestionPipeline {
    /// Assemble a pipeline over the given chunker, embedder, and store.
    pub fn new(
        chunker: TextChunker,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            chunker,
            embedder,
            store,
        }
    }

    /// Ingest one document, returning the number of records written. An
    /// empty document is a no-op (`Ok(0)`).
    pub async fn ingest(&self, document_id: &str, text: &str, filename: &str) -> Result<usize> {
        let chunks = self.chunker.chunk(text);
        if chunks.is_empty() {
            tracing::debug!(document_id, "empty document, nothing to ingest");
            return Ok(0);
        }

        let mut records = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.into_iter().enumerate() {
            let embedding = self.embedder.embed(&chunk).await?;
            records.push(ChunkRecord {
                id: format!("{document_id}_{index}"),
                embedding,
                metadata: ChunkMetadata {
                    filename: filename.to_string(),
                    chunk_index: index,
                },
                text: chunk,
            });
        }

        let count = records.len();
        self.store.add(records).await?;

        tracing::info!(
            document_id,
            filename,
            chunks = count,
            store = self.store.provider_name(),
            "document ingested"
        );

        Ok(count)
    }
}
