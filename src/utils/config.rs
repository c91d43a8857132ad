//! Environment-driven configuration.
//!
//! Every setting has a default, so a bare `mentor-server` against a local
//! Ollama works with no configuration at all. A `.env` file is loaded when
//! present.

use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Root configuration, assembled from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Model endpoint settings.
    pub llm: LlmConfig,
    /// Chunking and retrieval settings.
    pub rag: RagConfig,
    /// Upload directory and vector store settings.
    pub storage: StorageConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (`HOST`, default `127.0.0.1`).
    pub host: String,
    /// Bind port (`PORT`, default `8000`).
    pub port: u16,
}

/// Model endpoint settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the Ollama-compatible endpoint (`OLLAMA_URL`).
    pub base_url: String,
    /// Embedding model name (`EMBEDDING_MODEL`, default `nomic-embed-text`).
    pub embed_model: String,
    /// Generation model name (`CHAT_MODEL`, default `llama3.2`).
    pub chat_model: String,
    /// Vision model used to describe image uploads (`VISION_MODEL`).
    pub vision_model: String,
    /// Embedding dimensionality (`EMBEDDING_DIMENSIONS`, default 768 for
    /// nomic-embed-text). Also the length of the degraded zero vector.
    pub embedding_dimensions: usize,
    /// Timeout for embedding and vision calls, seconds (`EMBED_TIMEOUT_SECS`).
    pub embed_timeout_secs: u64,
    /// Timeout for a whole generation stream, seconds
    /// (`GENERATE_TIMEOUT_SECS`).
    pub generate_timeout_secs: u64,
}

/// Chunking and retrieval settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RagConfig {
    /// Window size in characters (`CHUNK_SIZE`, default 1000).
    pub chunk_size: usize,
    /// Window overlap in characters (`CHUNK_OVERLAP`, default 200). Must be
    /// strictly less than `chunk_size`.
    pub chunk_overlap: usize,
    /// Number of nearest chunks retrieved per chat turn (`TOP_K`, default 5).
    pub top_k: usize,
}

impl RagConfig {
    /// Check the chunking precondition; the chunker panics on violation, so
    /// bad values are rejected here at startup instead.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.chunk_overlap >= self.chunk_size {
            return Err(format!(
                "CHUNK_OVERLAP ({}) must be strictly less than CHUNK_SIZE ({})",
                self.chunk_overlap, self.chunk_size
            ));
        }
        if self.top_k == 0 {
            return Err("TOP_K must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Upload directory and vector store settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory for raw uploaded files (`UPLOAD_DIR`, default `./uploads`).
    pub upload_dir: PathBuf,
    /// Vector store collection name (`COLLECTION_NAME`).
    pub collection: String,
    /// ChromaDB server URL (`CHROMADB_URL`). When unset, an in-memory store
    /// is used instead.
    pub chroma_url: Option<String>,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl Config {
    /// Assemble the configuration from the environment (and `.env`, if any).
    pub fn from_env() -> std::result::Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            server: ServerConfig {
                host: var_or("HOST", "127.0.0.1"),
                port: var_or("PORT", "8000").parse()?,
            },
            llm: LlmConfig {
                base_url: var_or("OLLAMA_URL", "http://localhost:11434")
                    .trim_end_matches('/')
                    .to_string(),
                embed_model: var_or("EMBEDDING_MODEL", "nomic-embed-text"),
                chat_model: var_or("CHAT_MODEL", "llama3.2"),
                vision_model: var_or("VISION_MODEL", "llava:7b"),
                embedding_dimensions: var_or("EMBEDDING_DIMENSIONS", "768").parse()?,
                embed_timeout_secs: var_or("EMBED_TIMEOUT_SECS", "60").parse()?,
                generate_timeout_secs: var_or("GENERATE_TIMEOUT_SECS", "300").parse()?,
            },
            rag: RagConfig {
                chunk_size: var_or("CHUNK_SIZE", "1000").parse()?,
                chunk_overlap: var_or("CHUNK_OVERLAP", "200").parse()?,
                top_k: var_or("TOP_K", "5").parse()?,
            },
            storage: StorageConfig {
                upload_dir: PathBuf::from(var_or("UPLOAD_DIR", "./uploads")),
                collection: var_or("COLLECTION_NAME", "documents"),
                chroma_url: env::var("CHROMADB_URL")
                    .ok()
                    .filter(|url| !url.is_empty())
                    .map(|url| url.trim_end_matches('/').to_string()),
            },
        };

        config.rag.validate()?;

        Ok(config)
    }
}
