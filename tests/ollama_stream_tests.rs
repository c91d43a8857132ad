//! Ollama client tests with mocked network responses.
//!
//! These use wiremock to stand in for the model endpoint and validate:
//! - the NDJSON streaming protocol (fragments, done, malformed lines)
//! - the terminal error event on connect/status failures
//! - the embedding error taxonomy and the read-path zero-vector degrade

use futures::StreamExt;
use mentor::llm::{Embedder, OllamaClient};
use mentor::types::{AppError, ChatEvent};
use mentor::utils::config::LlmConfig;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============= Helper Functions =============

fn test_config(base_url: &str) -> LlmConfig {
    LlmConfig {
        base_url: base_url.trim_end_matches('/').to_string(),
        embed_model: "nomic-embed-text".to_string(),
        chat_model: "llama3.2".to_string(),
        vision_model: "llava:7b".to_string(),
        embedding_dimensions: 768,
        embed_timeout_secs: 5,
        generate_timeout_secs: 5,
    }
}

fn client_for(server: &MockServer) -> OllamaClient {
    OllamaClient::new(&test_config(&server.uri())).expect("client")
}

/// NDJSON response body from raw lines.
fn ndjson(lines: &[&str]) -> String {
    let mut body = lines.join("\n");
    body.push('\n');
    body
}

async fn collect_events(client: &OllamaClient, prompt: &str) -> Vec<ChatEvent> {
    client
        .generate_stream(prompt.to_string())
        .collect::<Vec<_>>()
        .await
}

// ============= Generation Streaming Tests =============

#[tokio::test]
async fn test_stream_emits_fragments_then_done() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            ndjson(&[
                r#"{"response":"a"}"#,
                r#"{"response":"b","done":false}"#,
                r#"{"done":true}"#,
            ]),
            "application/x-ndjson",
        ))
        .mount(&server)
        .await;

    let events = collect_events(&client_for(&server), "prompt").await;

    assert_eq!(
        events,
        vec![ChatEvent::chunk("a"), ChatEvent::chunk("b"), ChatEvent::done()]
    );
}

#[tokio::test]
async fn test_stream_discards_input_after_done() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            ndjson(&[
                r#"{"response":"kept"}"#,
                r#"{"done":true}"#,
                r#"{"response":"discarded"}"#,
            ]),
            "application/x-ndjson",
        ))
        .mount(&server)
        .await;

    let events = collect_events(&client_for(&server), "prompt").await;

    assert_eq!(events, vec![ChatEvent::chunk("kept"), ChatEvent::done()]);
}

#[tokio::test]
async fn test_stream_skips_malformed_lines() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            ndjson(&[
                "this is not json",
                r#"{"response":"ok"}"#,
                "{broken",
                "",
                r#"{"done":true}"#,
            ]),
            "application/x-ndjson",
        ))
        .mount(&server)
        .await;

    let events = collect_events(&client_for(&server), "prompt").await;

    assert_eq!(events, vec![ChatEvent::chunk("ok"), ChatEvent::done()]);
}

#[tokio::test]
async fn test_stream_final_line_with_fragment_and_done() {
    // Ollama's last line typically carries both an (empty) fragment and the
    // done flag; both events are emitted.
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            ndjson(&[r#"{"response":"answer"}"#, r#"{"response":"","done":true}"#]),
            "application/x-ndjson",
        ))
        .mount(&server)
        .await;

    let events = collect_events(&client_for(&server), "prompt").await;

    assert_eq!(
        events,
        vec![ChatEvent::chunk("answer"), ChatEvent::chunk(""), ChatEvent::done()]
    );
}

#[tokio::test]
async fn test_stream_connect_failure_yields_single_error_event() {
    // Nothing listens on port 1.
    let client = OllamaClient::new(&test_config("http://127.0.0.1:1")).expect("client");

    let events = collect_events(&client, "prompt").await;

    assert_eq!(events.len(), 1);
    match &events[0] {
        ChatEvent::Error { error } => {
            assert!(error.contains("http://127.0.0.1:1/api/generate"), "{error}");
            assert!(error.contains("llama3.2"), "{error}");
        }
        other => panic!("expected error event, got {other:?}"),
    }
}

#[tokio::test]
async fn test_stream_http_error_yields_single_error_event() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let events = collect_events(&client_for(&server), "prompt").await;

    assert_eq!(events.len(), 1);
    match &events[0] {
        ChatEvent::Error { error } => {
            assert!(error.contains("500"), "{error}");
            assert!(error.contains("model not loaded"), "{error}");
        }
        other => panic!("expected error event, got {other:?}"),
    }
}

#[tokio::test]
async fn test_stream_without_done_just_ends() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            ndjson(&[r#"{"response":"partial"}"#]),
            "application/x-ndjson",
        ))
        .mount(&server)
        .await;

    let events = collect_events(&client_for(&server), "prompt").await;

    assert_eq!(events, vec![ChatEvent::chunk("partial")]);
}

// ============= Embedding Tests =============

#[tokio::test]
async fn test_embed_returns_vector() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "embedding": [0.1, 0.2, 0.3]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let embedding = client.embed("some text").await.unwrap();
    assert_eq!(embedding, vec![0.1, 0.2, 0.3]);
}

#[tokio::test]
async fn test_embed_rejects_empty_vector() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/embeddings"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "embedding": [] })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(matches!(
        client.embed("some text").await,
        Err(AppError::EmptyEmbedding)
    ));
}

#[tokio::test]
async fn test_embed_maps_http_error_to_upstream_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/embeddings"))
        .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    match client.embed("some text").await {
        Err(AppError::UpstreamStatus { status, body }) => {
            assert_eq!(status, 404);
            assert_eq!(body, "model not found");
        }
        other => panic!("expected UpstreamStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_embed_connect_failure_is_service_unavailable() {
    let client = OllamaClient::new(&test_config("http://127.0.0.1:1")).expect("client");

    match client.embed("some text").await {
        Err(AppError::ServiceUnavailable { service, endpoint, .. }) => {
            assert_eq!(service, "embedding");
            assert!(endpoint.contains("/api/embeddings"));
        }
        other => panic!("expected ServiceUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_embed_query_degrades_to_zero_vector() {
    // The exact failure that is loud on the write path becomes a silent
    // zero-vector fallback on the read path.
    let client = OllamaClient::new(&test_config("http://127.0.0.1:1")).expect("client");

    let embedding = client.embed_query("some text").await;
    assert_eq!(embedding, vec![0.0; 768]);
}
