use async_trait::async_trait;

use crate::domain::{ConversationTurn, DomainError};

/// A remote chat-completion model.
///
/// Implementations own transport, signing, and any retry behavior against the
/// provider; callers see only the two completion shapes. Both operations
/// return the assistant's reply text.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Complete a single user message.
    async fn single_turn(
        &self,
        message: &str,
        system_prompt: &str,
    ) -> Result<String, DomainError>;

    /// Complete a multi-turn conversation. The history is sent verbatim, in
    /// the given order.
    async fn multi_turn(
        &self,
        history: &[ConversationTurn],
        system_prompt: &str,
    ) -> Result<String, DomainError>;
}
