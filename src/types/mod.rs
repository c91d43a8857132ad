//! Core types: API requests/responses, vector store records, chat stream
//! events, and error handling.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============= API Request/Response Types =============

/// A single chat turn from the client.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatRequest {
    /// The user's message.
    pub message: String,
    /// Optional action hint (`summarize`, `suggest_projects`, `explain`).
    /// Unknown values silently fall back to the default template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

/// Result of a successful document upload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    /// Always `"success"` for a 2xx response.
    pub status: String,
    /// Generated document id (UUID).
    pub file_id: String,
    /// Original filename as uploaded.
    pub filename: String,
    /// Number of chunks written to the vector store.
    pub chunks_indexed: usize,
}

/// An uploaded file as listed by `GET /files`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileInfo {
    /// Document id (UUID).
    pub id: String,
    /// Original filename.
    pub filename: String,
    /// Upload time, from filesystem metadata when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Response body for `GET /files`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileListResponse {
    /// All uploaded files currently on disk.
    pub files: Vec<FileInfo>,
}

// ============= Vector Store Types =============

/// Metadata stored alongside each chunk in the vector store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Filename of the owning document.
    pub filename: String,
    /// 0-based, sequential position of the chunk within its document.
    pub chunk_index: usize,
}

/// One vector store record: a chunk of a document together with its
/// embedding. The record id is `{document_id}_{chunk_index}` and is globally
/// unique because document ids are UUIDs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Record key, `{document_id}_{chunk_index}`.
    pub id: String,
    /// Embedding vector for `text`.
    pub embedding: Vec<f32>,
    /// Owning document metadata.
    pub metadata: ChunkMetadata,
    /// The chunk's raw text.
    pub text: String,
}

// ============= Chat Stream Events =============

/// One unit of the chat response stream.
///
/// The JSON shapes are part of the wire contract with clients and must not
/// change: `{"chunk": "<text>"}`, `{"done": true}`, `{"error": "<message>"}`.
/// `Done` and `Error` are terminal; nothing follows them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ChatEvent {
    /// An incremental text fragment of the model's answer.
    Chunk {
        /// The text fragment.
        chunk: String,
    },
    /// Successful end of the stream.
    Done {
        /// Always `true`.
        done: bool,
    },
    /// Failed end of the stream.
    Error {
        /// Human-readable failure description.
        error: String,
    },
}

impl ChatEvent {
    /// An incremental text fragment.
    pub fn chunk(text: impl Into<String>) -> Self {
        ChatEvent::Chunk { chunk: text.into() }
    }

    /// The terminal success event.
    pub fn done() -> Self {
        ChatEvent::Done { done: true }
    }

    /// The terminal failure event.
    pub fn error(message: impl Into<String>) -> Self {
        ChatEvent::Error {
            error: message.into(),
        }
    }

    /// Whether this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ChatEvent::Done { .. } | ChatEvent::Error { .. })
    }

    /// The event's JSON payload, exactly as sent on the wire. JSON string
    /// escaping keeps the payload single-line even when a fragment contains
    /// newlines.
    pub fn payload(&self) -> String {
        match self {
            ChatEvent::Chunk { chunk } => serde_json::json!({ "chunk": chunk }).to_string(),
            ChatEvent::Done { done } => serde_json::json!({ "done": done }).to_string(),
            ChatEvent::Error { error } => serde_json::json!({ "error": error }).to_string(),
        }
    }
}

// ============= Error Types =============

/// Application error taxonomy.
///
/// Propagation policy: ingestion-path errors propagate to the caller (the
/// upload is rejected); retrieval-path errors are absorbed and downgrade the
/// turn to direct mode; generation-path errors surface as a single terminal
/// [`ChatEvent::Error`] and are never raised past the stream boundary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A model or store endpoint could not be reached at the transport level.
    #[error("{service} service unavailable at {endpoint}: {detail}")]
    ServiceUnavailable {
        /// Which service failed (e.g. `"embedding"`).
        service: &'static str,
        /// The endpoint URL that was contacted.
        endpoint: String,
        /// Underlying transport error.
        detail: String,
    },

    /// The embedding model returned a zero-length vector.
    #[error("embedding model returned an empty vector")]
    EmptyEmbedding,

    /// An upstream endpoint answered with a non-2xx status.
    #[error("upstream error (HTTP {status}): {body}")]
    UpstreamStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, best effort.
        body: String,
    },

    /// A vector store operation failed.
    #[error("vector store error: {0}")]
    Store(String),

    /// Text could not be extracted from an uploaded file.
    #[error("text extraction failed: {0}")]
    Extraction(String),

    /// The request was malformed or unsupported.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Anything else.
    #[error("internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status = match &self {
            AppError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::EmptyEmbedding | AppError::UpstreamStatus { .. } => StatusCode::BAD_GATEWAY,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({
            "error": self.to_string()
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_event_payloads() {
        assert_eq!(ChatEvent::chunk("hi").payload(), r#"{"chunk":"hi"}"#);
        assert_eq!(ChatEvent::done().payload(), r#"{"done":true}"#);
        assert_eq!(ChatEvent::error("boom").payload(), r#"{"error":"boom"}"#);
    }

    #[test]
    fn test_chat_event_escapes_newlines() {
        let payload = ChatEvent::chunk("a\nb").payload();
        assert_eq!(payload, r#"{"chunk":"a\nb"}"#);
        assert!(!payload.contains('\n'));
    }

    #[test]
    fn test_terminal_events() {
        assert!(!ChatEvent::chunk("x").is_terminal());
        assert!(ChatEvent::done().is_terminal());
        assert!(ChatEvent::error("x").is_terminal());
    }
}
