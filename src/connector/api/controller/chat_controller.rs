use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::connector::api::AppState;
use crate::domain::{Conversation, ConversationTurn};

/// Wire shape of a chat request. Both historical shapes are accepted: a bare
/// `message` string and a structured `messages` history. The duality ends
/// here; everything past this point sees the canonical conversation.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<ConversationTurn>>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /api/chat
///
/// Always answers 200: dispatch failures come back as a textual reply, not
/// as an error status.
pub async fn chat(
    State(container): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let conversation =
        Conversation::from_parts(request.message, request.messages.unwrap_or_default());
    debug!("Chat request with {} turn(s)", conversation.len());

    let reply = container.chat_use_case().execute(&conversation).await;

    Json(ChatResponse { reply })
}
