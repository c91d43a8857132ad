//! Chat streaming handler.

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, Sse},
    Json,
};
use futures::{Stream, StreamExt};

use crate::rag::prompt::ChatAction;
use crate::types::ChatRequest;
use crate::AppState;

/// Handle one chat turn, streaming the answer as server-sent events.
///
/// Each frame on the wire is `data: <json>` followed by a blank line, where
/// `<json>` is one of `{"chunk": "<text>"}`, `{"done": true}`, or
/// `{"error": "<message>"}`. The turn never fails at the HTTP level; worst
/// case the stream carries a single error frame.
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Server-sent event stream of chunk/done/error frames"),
    ),
    tag = "chat"
)]
pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let action = payload.action.as_deref().and_then(ChatAction::parse);

    tracing::info!(
        message_chars = payload.message.len(),
        action = ?action,
        "chat turn started"
    );

    let events = state.chat.handle_turn(&payload.message, action).await;

    Sse::new(events.map(|event| Ok(Event::default().data(event.payload()))))
}
