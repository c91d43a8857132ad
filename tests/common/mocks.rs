//! Mock implementations for testing.
//!
//! In-process fakes for the embedding and vector store seams, with call
//! counters so tests can assert what the pipelines actually invoked.

#![allow(dead_code)]

use async_trait::async_trait;
use mentor::db::VectorStore;
use mentor::llm::Embedder;
use mentor::types::{AppError, ChunkRecord, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Embedder that counts calls and can be configured to fail.
///
/// # Examples
///
/// ```ignore
/// // Always succeeds with a fixed vector
/// let embedder = CountingEmbedder::reliable(768);
///
/// // Succeeds twice, then fails on every later call
/// let embedder = CountingEmbedder::failing_after(2, 768);
///
/// // Fails from the first call
/// let embedder = CountingEmbedder::always_failing(768);
/// ```
pub struct CountingEmbedder {
    dimensions: usize,
    calls: AtomicUsize,
    fail_from: Option<usize>,
}

impl CountingEmbedder {
    /// An embedder that always succeeds.
    pub fn reliable(dimensions: usize) -> Self {
        Self {
            dimensions,
            calls: AtomicUsize::new(0),
            fail_from: None,
        }
    }

    /// An embedder that fails on every call.
    pub fn always_failing(dimensions: usize) -> Self {
        Self {
            dimensions,
            calls: AtomicUsize::new(0),
            fail_from: Some(0),
        }
    }

    /// An embedder that succeeds `successes` times, then fails.
    pub fn failing_after(successes: usize, dimensions: usize) -> Self {
        Self {
            dimensions,
            calls: AtomicUsize::new(0),
            fail_from: Some(successes),
        }
    }

    /// Number of `embed` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for CountingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(fail_from) = self.fail_from {
            if call >= fail_from {
                return Err(AppError::ServiceUnavailable {
                    service: "embedding",
                    endpoint: "http://localhost:11434/api/embeddings".to_string(),
                    detail: "simulated outage".to_string(),
                });
            }
        }
        Ok(vec![0.5; self.dimensions])
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Vector store that records every `add` batch and `query` vector.
pub struct RecordingStore {
    count: AtomicUsize,
    query_results: Vec<String>,
    fail_queries: bool,
    added: Mutex<Vec<Vec<ChunkRecord>>>,
    queries: Mutex<Vec<Vec<f32>>>,
}

impl RecordingStore {
    /// A store reporting `count` pre-existing records.
    pub fn with_count(count: usize) -> Self {
        Self {
            count: AtomicUsize::new(count),
            query_results: Vec::new(),
            fail_queries: false,
            added: Mutex::new(Vec::new()),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Fix the texts every query returns.
    pub fn with_query_results(mut self, results: &[&str]) -> Self {
        self.query_results = results.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Make every query fail with a store error.
    pub fn failing_queries(mut self) -> Self {
        self.fail_queries = true;
        self
    }

    /// Number of `add` calls (batches, not records).
    pub fn add_calls(&self) -> usize {
        self.added.lock().unwrap().len()
    }

    /// All records ever added, in submission order.
    pub fn added_records(&self) -> Vec<ChunkRecord> {
        self.added.lock().unwrap().iter().flatten().cloned().collect()
    }

    /// Number of `query` calls.
    pub fn query_calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    /// The most recent query vector, if any.
    pub fn last_query_vector(&self) -> Option<Vec<f32>> {
        self.queries.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl VectorStore for RecordingStore {
    fn provider_name(&self) -> &'static str {
        "recording"
    }

    async fn add(&self, records: Vec<ChunkRecord>) -> Result<()> {
        self.count.fetch_add(records.len(), Ordering::SeqCst);
        self.added.lock().unwrap().push(records);
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.count.load(Ordering::SeqCst))
    }

    async fn query(&self, embedding: &[f32], _top_k: usize) -> Result<Vec<String>> {
        self.queries.lock().unwrap().push(embedding.to_vec());
        if self.fail_queries {
            return Err(AppError::Store("simulated store failure".to_string()));
        }
        Ok(self.query_results.clone())
    }
}
