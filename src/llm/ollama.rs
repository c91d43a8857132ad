//! Ollama HTTP client: embeddings, streamed generation, and image
//! description.
//!
//! Generation uses the endpoint's newline-delimited JSON protocol directly so
//! that stream errors can be folded into the chat event stream instead of
//! surfacing as transport faults.

use std::time::Duration;

use async_stream::stream;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use futures::{Stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::llm::client::Embedder;
use crate::types::{AppError, ChatEvent, Result};
use crate::utils::config::LlmConfig;

const IMAGE_DESCRIPTION_PROMPT: &str = "Describe this image in detail, focusing on any text, \
     diagrams, or important visual elements. Be thorough and specific.";

/// Client for an Ollama-compatible model endpoint.
pub struct OllamaClient {
    /// Client with the moderate timeout, for embedding calls.
    client: Client,
    /// Client with the long timeout, for generation and vision calls.
    stream_client: Client,
    base_url: String,
    embed_model: String,
    chat_model: String,
    vision_model: String,
    dimensions: usize,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl OllamaClient {
    /// Build a client from configuration. The two timeouts are enforced here
    /// at the transport layer; nothing downstream re-checks them.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.embed_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {e}")))?;
        let stream_client = Client::builder()
            .timeout(Duration::from_secs(config.generate_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            stream_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            embed_model: config.embed_model.clone(),
            chat_model: config.chat_model.clone(),
            vision_model: config.vision_model.clone(),
            dimensions: config.embedding_dimensions,
        })
    }

    /// Stream a generation for `prompt`.
    ///
    /// The endpoint answers with one JSON object per line. Each `response`
    /// fragment is re-emitted as [`ChatEvent::Chunk`]; `done: true` emits the
    /// terminal [`ChatEvent::Done`] and stops reading, discarding anything
    /// the endpoint sends afterwards. Malformed lines are skipped. Every
    /// failure mode (connect, status, mid-stream) ends the stream with
    /// exactly one [`ChatEvent::Error`]; nothing is raised past this
    /// boundary.
    pub fn generate_stream(&self, prompt: String) -> impl Stream<Item = ChatEvent> + Send + 'static {
        let client = self.stream_client.clone();
        let url = format!("{}/api/generate", self.base_url);
        let model = self.chat_model.clone();

        stream! {
            let request = serde_json::json!({
                "model": model.as_str(),
                "prompt": prompt,
                "stream": true,
            });

            let response = match client.post(&url).json(&request).send().await {
                Ok(response) => response,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    yield ChatEvent::error(format!(
                        "Cannot connect to Ollama at {url}. Make sure Ollama is running \
                         and the model '{model}' is installed."
                    ));
                    return;
                }
                Err(e) => {
                    yield ChatEvent::error(format!("Error communicating with Ollama: {e}"));
                    return;
                }
            };

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                yield ChatEvent::error(format!(
                    "Ollama API error ({}): {}",
                    status.as_u16(),
                    body
                ));
                return;
            }

            let mut body = Box::pin(response.bytes_stream());
            let mut buffer = String::new();

            while let Some(next) = body.next().await {
                let bytes = match next {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        yield ChatEvent::error(format!("Error communicating with Ollama: {e}"));
                        return;
                    }
                };
                buffer.push_str(&String::from_utf8_lossy(&bytes));

                while let Some(newline) = buffer.find('\n') {
                    let line: String = buffer.drain(..=newline).collect();
                    match parse_stream_line(line.trim()) {
                        LineEvent::Skip => {}
                        LineEvent::Fragment(text) => yield ChatEvent::chunk(text),
                        LineEvent::FragmentThenDone(text) => {
                            yield ChatEvent::chunk(text);
                            yield ChatEvent::done();
                            return;
                        }
                        LineEvent::Done => {
                            yield ChatEvent::done();
                            return;
                        }
                    }
                }
            }

            // The endpoint closed without a trailing newline; drain what's left.
            match parse_stream_line(buffer.trim()) {
                LineEvent::Skip => {}
                LineEvent::Fragment(text) => yield ChatEvent::chunk(text),
                LineEvent::FragmentThenDone(text) => {
                    yield ChatEvent::chunk(text);
                    yield ChatEvent::done();
                }
                LineEvent::Done => yield ChatEvent::done(),
            }
        }
    }

    /// Describe an image with the vision model (non-streaming generate
    /// call). Used by text extraction for image uploads.
    pub async fn describe_image(&self, image: &[u8]) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let request = serde_json::json!({
            "model": self.vision_model.as_str(),
            "prompt": IMAGE_DESCRIPTION_PROMPT,
            "images": [BASE64.encode(image)],
            "stream": false,
        });

        let response = self
            .stream_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::ServiceUnavailable {
                service: "vision",
                endpoint: url.clone(),
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("malformed vision response: {e}")))?;

        if parsed.response.is_empty() {
            Ok("Image description unavailable".to_string())
        } else {
            Ok(parsed.response)
        }
    }
}

#[async_trait]
impl Embedder for OllamaClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);
        let request = EmbedRequest {
            model: &self.embed_model,
            prompt: text,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::ServiceUnavailable {
                service: "embedding",
                endpoint: url.clone(),
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: EmbedResponse = response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("malformed embedding response: {e}")))?;

        if parsed.embedding.is_empty() {
            return Err(AppError::EmptyEmbedding);
        }

        Ok(parsed.embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// What one line of the generation stream contributes.
enum LineEvent {
    /// Blank or malformed line, or a keep-alive object with nothing in it.
    Skip,
    /// A text fragment.
    Fragment(String),
    /// A text fragment on the final line.
    FragmentThenDone(String),
    /// The final line, no fragment.
    Done,
}

fn parse_stream_line(line: &str) -> LineEvent {
    if line.is_empty() {
        return LineEvent::Skip;
    }
    let Ok(value) = serde_json::from_str::<serde_json::Value>(line) else {
        return LineEvent::Skip;
    };

    let fragment = value
        .get("response")
        .and_then(|v| v.as_str())
        .map(str::to_string);
    let done = value
        .get("done")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    match (fragment, done) {
        (Some(text), true) => LineEvent::FragmentThenDone(text),
        (Some(text), false) => LineEvent::Fragment(text),
        (None, true) => LineEvent::Done,
        (None, false) => LineEvent::Skip,
    }
}
