//! # Mentor - retrieval-augmented document chat server
//!
//! Upload course material (PDF, Word, text, images), ask questions about it,
//! and stream grounded answers from a local model. Documents are chunked,
//! embedded, and indexed in a vector store; each chat turn retrieves the
//! most relevant chunks, folds them into the prompt, and streams the model's
//! answer back as server-sent events. When nothing has been uploaded (or
//! retrieval comes back empty) the turn falls back to the model's general
//! knowledge.
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use mentor::{AppState, utils::config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env().expect("configuration");
//!     let state = AppState::from_config(config).await?;
//!
//!     // Ingest a document
//!     state.ingestion.ingest("doc-1", "some text", "notes.txt").await?;
//!
//!     // Stream a chat turn
//!     use futures::StreamExt;
//!     let mut events = state.chat.handle_turn("what do my notes say?", None).await;
//!     while let Some(event) = events.next().await {
//!         println!("{}", event.payload());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`rag`] - chunking, ingestion, retrieval, prompt assembly, chat turns
//! - [`llm`] - Ollama client (embeddings, streamed generation, vision)
//! - [`db`] - vector store contract and backends (in-memory, ChromaDB)
//! - [`extract`] - document text extraction
//! - [`api`] - REST API handlers and routes
//! - [`types`] - common types and error handling
//! - [`utils`] - configuration
//!
//! ## Failure policy
//!
//! Writes fail loudly, reads degrade silently: an embedding failure during
//! ingestion rejects the whole document (nothing is stored), while the same
//! failure during retrieval falls back to an uncontexted answer. Generation
//! failures surface as a single terminal error frame in the response stream,
//! never as a broken HTTP response.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Vector store contract and backends.
pub mod db;
/// Document text extraction.
pub mod extract;
/// Model endpoint clients.
pub mod llm;
/// The retrieval-augmented generation pipeline.
pub mod rag;
/// Core types (requests, responses, records, events, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use db::{InMemoryVectorStore, VectorStore, VectorStoreProvider};
pub use llm::{Embedder, OllamaClient};
pub use rag::{ChatAction, ChatPipeline, IngestionPipeline, Retriever, TextChunker};
pub use types::{AppError, ChatEvent, Result};

use std::sync::Arc;
use utils::config::Config;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Resolved configuration.
    pub config: Arc<Config>,
    /// Model endpoint client.
    pub ollama: Arc<OllamaClient>,
    /// Vector store handle (injected, so tests can swap in a fake).
    pub store: Arc<dyn VectorStore>,
    /// Document ingestion pipeline.
    pub ingestion: Arc<IngestionPipeline>,
    /// Chat turn pipeline.
    pub chat: Arc<ChatPipeline>,
}

impl AppState {
    /// Wire up the full application from configuration: model client, vector
    /// store (ChromaDB when configured, in-memory otherwise), and the
    /// ingestion and chat pipelines on top.
    pub async fn from_config(config: Config) -> Result<Self> {
        let config = Arc::new(config);

        let ollama = Arc::new(OllamaClient::new(&config.llm)?);
        let store = VectorStoreProvider::from_config(&config.storage)
            .create_store(&config.storage.collection)
            .await?;

        tracing::info!(
            store = store.provider_name(),
            collection = %config.storage.collection,
            "vector store ready"
        );

        let embedder: Arc<dyn Embedder> = ollama.clone();

        let ingestion = Arc::new(IngestionPipeline::new(
            TextChunker::new(config.rag.chunk_size, config.rag.chunk_overlap),
            embedder.clone(),
            store.clone(),
        ));

        let retriever = Retriever::new(embedder, store.clone(), config.rag.top_k);
        let chat = Arc::new(ChatPipeline::new(retriever, ollama.clone()));

        Ok(Self {
            config,
            ollama,
            store,
            ingestion,
            chat,
        })
    }
}
