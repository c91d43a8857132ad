//! Retrieval-augmented generation pipeline.
//!
//! # Module Structure
//!
//! - [`chunker`] - overlapping fixed-size text windows
//! - [`ingest`] - chunk, embed, and store a document
//! - [`retriever`] - fetch the nearest chunks for a query
//! - [`prompt`] - deterministic prompt assembly (RAG and direct modes)
//! - [`chat`] - one chat turn: retrieve, compose, stream
//!
//! # Pipeline
//!
//! Producer side, once per uploaded document:
//!
//! 1. **Chunking** - the extracted text is split into overlapping windows
//! 2. **Embedding** - each chunk is embedded, one call at a time
//! 3. **Storage** - all records for the document land in one store call
//!
//! Consumer side, once per chat turn:
//!
//! 1. **Retrieval** - top-k nearest chunks, or nothing if the store is empty
//! 2. **Composition** - RAG template when context exists, direct otherwise
//! 3. **Generation** - the model's answer streams back incrementally
//!
//! The two sides share only the vector store.

/// One chat turn: retrieve, compose, stream.
pub mod chat;
/// Overlapping fixed-size text windows.
pub mod chunker;
/// Chunk, embed, and store a document.
pub mod ingest;
/// Deterministic prompt assembly.
pub mod prompt;
/// Nearest-chunk retrieval with degrade-to-empty semantics.
pub mod retriever;

pub use chat::ChatPipeline;
pub use chunker::TextChunker;
pub use ingest::IngestionPipeline;
pub use prompt::{compose, ChatAction};
pub use retriever::Retriever;
