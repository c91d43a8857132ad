//! Model endpoint clients.
//!
//! The embedding seam is the [`client::Embedder`] trait, so the ingestion and
//! retrieval paths can be exercised against in-process fakes. Generation
//! streaming and image description live on the concrete [`ollama::OllamaClient`],
//! which speaks the endpoint's newline-delimited JSON protocol directly.

/// The embedding trait seam.
pub mod client;
/// Ollama-backed implementation: embeddings, streamed generation, vision.
pub mod ollama;

pub use client::Embedder;
pub use ollama::OllamaClient;
