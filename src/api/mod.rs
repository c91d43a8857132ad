//! HTTP API handlers and routes.
//!
//! The REST surface, built on Axum:
//!
//! - `POST /upload` - upload a document (multipart), extract its text, and
//!   ingest it into the vector store
//! - `POST /chat` - one chat turn, answered as a server-sent-event stream of
//!   `{"chunk"}` / `{"done"}` / `{"error"}` frames
//! - `GET /files` - list uploaded documents
//! - `GET /health` - liveness probe

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
