//! ChromaDB REST adapter.
//!
//! Implements the [`VectorStore`] contract against a running ChromaDB
//! server. The collection is resolved (or created) once at connect time;
//! afterwards every call is a single round-trip. All failures map to
//! [`AppError::Store`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::db::vectorstore::VectorStore;
use crate::types::{AppError, ChunkMetadata, ChunkRecord, Result};

/// Vector store backed by a ChromaDB server.
pub struct ChromaStore {
    client: Client,
    base_url: String,
    collection_id: String,
    collection_name: String,
}

#[derive(Serialize)]
struct CreateCollectionRequest<'a> {
    name: &'a str,
    get_or_create: bool,
}

#[derive(Deserialize)]
struct CollectionInfo {
    id: String,
}

#[derive(Serialize)]
struct AddRequest {
    ids: Vec<String>,
    embeddings: Vec<Vec<f32>>,
    metadatas: Vec<ChunkMetadata>,
    documents: Vec<String>,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query_embeddings: Vec<&'a [f32]>,
    n_results: usize,
    include: Vec<&'a str>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    documents: Vec<Vec<String>>,
}

impl ChromaStore {
    /// Connect to the server at `base_url` and resolve (or create) the named
    /// collection.
    pub async fn connect(base_url: &str, collection: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {e}")))?;

        let base_url = base_url.trim_end_matches('/').to_string();
        let url = format!("{base_url}/api/v1/collections");
        let request = CreateCollectionRequest {
            name: collection,
            get_or_create: true,
        };

        let response = client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Store(format!("cannot reach ChromaDB at {base_url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Store(format!(
                "ChromaDB refused collection '{collection}' (HTTP {}): {body}",
                status.as_u16()
            )));
        }

        let info: CollectionInfo = response
            .json()
            .await
            .map_err(|e| AppError::Store(format!("malformed ChromaDB collection response: {e}")))?;

        tracing::info!(
            collection = collection,
            collection_id = %info.id,
            "connected to ChromaDB"
        );

        Ok(Self {
            client,
            base_url,
            collection_id: info.id,
            collection_name: collection.to_string(),
        })
    }

    fn collection_url(&self, operation: &str) -> String {
        format!(
            "{}/api/v1/collections/{}/{operation}",
            self.base_url, self.collection_id
        )
    }
}

#[async_trait]
impl VectorStore for ChromaStore {
    fn provider_name(&self) -> &'static str {
        "chromadb"
    }

    async fn add(&self, records: Vec<ChunkRecord>) -> Result<()> {
        let mut request = AddRequest {
            ids: Vec::with_capacity(records.len()),
            embeddings: Vec::with_capacity(records.len()),
            metadatas: Vec::with_capacity(records.len()),
            documents: Vec::with_capacity(records.len()),
        };
        for record in records {
            request.ids.push(record.id);
            request.embeddings.push(record.embedding);
            request.metadatas.push(record.metadata);
            request.documents.push(record.text);
        }

        let url = self.collection_url("add");
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Store(format!("ChromaDB add failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Store(format!(
                "ChromaDB add failed (HTTP {}): {body}",
                status.as_u16()
            )));
        }

        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        let url = self.collection_url("count");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Store(format!("ChromaDB count failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Store(format!(
                "ChromaDB count failed (HTTP {}): {body}",
                status.as_u16()
            )));
        }

        response
            .json::<usize>()
            .await
            .map_err(|e| AppError::Store(format!("malformed ChromaDB count response: {e}")))
    }

    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<String>> {
        let url = self.collection_url("query");
        let request = QueryRequest {
            query_embeddings: vec![embedding],
            n_results: top_k,
            include: vec!["documents"],
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Store(format!("ChromaDB query failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Store(format!(
                "ChromaDB query failed (HTTP {}): {body}",
                status.as_u16()
            )));
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| AppError::Store(format!("malformed ChromaDB query response: {e}")))?;

        // One query embedding in, one result row out.
        Ok(parsed.documents.into_iter().next().unwrap_or_default())
    }
}

impl std::fmt::Debug for ChromaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChromaStore")
            .field("base_url", &self.base_url)
            .field("collection", &self.collection_name)
            .finish()
    }
}
