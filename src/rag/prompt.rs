//! Prompt assembly.
//!
//! A pure function from (query, retrieved context, action, mode flag) to the
//! final prompt string. RAG mode is used only when the caller enables it AND
//! context is actually present; otherwise the direct templates apply. Four
//! actions per mode, eight templates total. Identical inputs always produce
//! byte-identical output.

/// Client-selectable response style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatAction {
    /// Summarize the material.
    Summarize,
    /// Suggest practical projects grounded in the material.
    SuggestProjects,
    /// Explain a concept in depth.
    Explain,
}

impl ChatAction {
    /// Parse an action string. Unknown values map to `None`, which selects
    /// the default template - never an error.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "summarize" => Some(Self::Summarize),
            "suggest_projects" => Some(Self::SuggestProjects),
            "explain" => Some(Self::Explain),
            _ => None,
        }
    }
}

const RAG_SYSTEM_PROMPT: &str = "You are a helpful AI assistant for engineering students. You help them understand their academic materials, answer questions, and provide insights based on the documents they have uploaded.

Use the following context from their uploaded documents to answer their questions accurately and helpfully. If the context doesn't contain relevant information, you can supplement with your general knowledge.";

const DIRECT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant for engineering students. You help them understand concepts, answer questions, and provide insights. Be thorough, accurate, and educational in your responses.";

/// Build the prompt for one chat turn.
///
/// RAG mode activates only when `rag_enabled` is true and `context_chunks`
/// is non-empty; the non-emptiness re-check is a second guard on top of the
/// caller's decision. Context chunks are joined by a blank line ahead of the
/// instruction. Output is `system + "\n\n" + user`.
pub fn compose(
    query: &str,
    context_chunks: &[String],
    action: Option<ChatAction>,
    rag_enabled: bool,
) -> String {
    if rag_enabled && !context_chunks.is_empty() {
        let context = context_chunks.join("\n\n");
        let user = match action {
            Some(ChatAction::Summarize) => format!(
                "Based on the following context from the uploaded documents, provide a comprehensive summary.\n\nContext:\n{context}\n\nPlease provide a clear, well-structured summary of the key points and main ideas."
            ),
            Some(ChatAction::SuggestProjects) => format!(
                "Based on the following context from the uploaded documents, suggest practical project ideas that would help the student apply and deepen their understanding of these concepts.\n\nContext:\n{context}\n\nProvide creative, actionable project suggestions that relate to the material."
            ),
            Some(ChatAction::Explain) => format!(
                "Based on the following context from the uploaded documents, explain the concepts mentioned in the user's query in a clear and educational way.\n\nContext:\n{context}\n\nUser Query: {query}\n\nProvide a detailed explanation that helps the student understand the concept."
            ),
            None => format!(
                "Context from uploaded documents:\n{context}\n\nUser Question: {query}\n\nPlease answer the user's question based on the provided context. If the context is insufficient, use your general knowledge to provide a helpful answer."
            ),
        };
        format!("{RAG_SYSTEM_PROMPT}\n\n{user}")
    } else {
        let user = match action {
            Some(ChatAction::Summarize) => format!(
                "The user is asking for a summary. Please provide a helpful response to: {query}"
            ),
            Some(ChatAction::SuggestProjects) => format!(
                "Suggest practical project ideas related to: {query}. Provide creative, actionable project suggestions."
            ),
            Some(ChatAction::Explain) => format!(
                "Explain the following concept in a clear and educational way: {query}. Provide a detailed explanation that helps the student understand."
            ),
            None => format!(
                "User Question: {query}\n\nPlease answer the user's question. Be thorough, accurate, and helpful."
            ),
        };
        format!("{DIRECT_SYSTEM_PROMPT}\n\n{user}")
    }
}
