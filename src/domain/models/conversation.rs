use serde::{Deserialize, Serialize};

/// Who produced a conversation turn. The set is closed: anything else in an
/// incoming request is rejected during deserialization, before it reaches the
/// core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One `{role, content}` unit of dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The canonical ordered conversation, the only shape internal components
/// operate on. Order is chronological and meaningful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    turns: Vec<ConversationTurn>,
}

impl Conversation {
    /// Fold the two wire shapes into the canonical form.
    ///
    /// A non-empty structured history wins and is used verbatim, in the given
    /// order. Otherwise a present `message` string (empty included) becomes a
    /// single user turn. With neither, the result is a single user turn with
    /// empty content: empty input is accepted, not rejected.
    pub fn from_parts(message: Option<String>, history: Vec<ConversationTurn>) -> Self {
        if !history.is_empty() {
            return Self { turns: history };
        }

        Self {
            turns: vec![ConversationTurn::user(message.unwrap_or_default())],
        }
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn is_multi_turn(&self) -> bool {
        self.turns.len() > 1
    }
}
