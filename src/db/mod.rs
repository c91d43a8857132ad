//! Vector store adapters.
//!
//! The application talks to a similarity index through the narrow
//! [`vectorstore::VectorStore`] contract. Backends:
//! - `in-memory` (default) - cosine similarity over a process-local map
//! - `chromadb` - REST adapter for a running ChromaDB server

/// ChromaDB REST adapter.
pub mod chroma;
/// The store contract, provider selection, and the in-memory backend.
pub mod vectorstore;

pub use chroma::ChromaStore;
pub use vectorstore::{InMemoryVectorStore, VectorStore, VectorStoreProvider};
