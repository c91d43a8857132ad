//! One chat turn, end to end.

use std::sync::Arc;

use futures::Stream;

use crate::llm::ollama::OllamaClient;
use crate::rag::prompt::{compose, ChatAction};
use crate::rag::retriever::Retriever;
use crate::types::ChatEvent;

/// Composes retrieval, prompt assembly, and streamed generation.
///
/// A chat turn never hard-fails: retrieval degrades to direct mode, and
/// generation failures arrive as a single terminal error event in the
/// stream.
pub struct ChatPipeline {
    retriever: Retriever,
    ollama: Arc<OllamaClient>,
}

impl ChatPipeline {
    /// Assemble a pipeline over the given retriever and generation client.
    pub fn new(retriever: Retriever, ollama: Arc<OllamaClient>) -> Self {
        Self { retriever, ollama }
    }

    /// Run one turn: retrieve context, pick RAG or direct mode, compose the
    /// prompt, and stream the model's answer.
    pub async fn handle_turn(
        &self,
        message: &str,
        action: Option<ChatAction>,
    ) -> impl Stream<Item = ChatEvent> + Send + 'static {
        let context = self.retriever.retrieve(message).await;
        let rag_enabled = !context.is_empty();

        tracing::debug!(
            context_chunks = context.len(),
            rag = rag_enabled,
            action = ?action,
            "chat turn composed"
        );

        let prompt = compose(message, &context, action, rag_enabled);
        self.ollama.generate_stream(prompt)
    }
}
