//! Conversation history and prompt rendering.

use serde::{Deserialize, Serialize};

/// Who sent a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The student.
    User,
    /// The agent.
    Assistant,
}

/// One message of the conversation so far.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Sender.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// A user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// An assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Split off the last user message, which drives the turn. Returns the
/// messages before it and its text (empty when there is none).
pub fn split_latest(messages: &[ChatMessage]) -> (&[ChatMessage], &str) {
    match messages.iter().rposition(|m| m.role == Role::User) {
        Some(idx) => (&messages[..idx], messages[idx].content.as_str()),
        None => (messages, ""),
    }
}

/// The user turn handed to the collaborator.
///
/// With history, prior messages are rendered as `User:`/`Assistant:` lines
/// ahead of the residual. Without history the residual stands alone, or
/// `(session started)` when it is empty.
pub fn build_prompt(history: &[ChatMessage], residual: &str) -> String {
    if history.is_empty() {
        return if residual.is_empty() {
            "(session started)".to_string()
        } else {
            residual.to_string()
        };
    }

    let rendered: Vec<String> = history
        .iter()
        .map(|m| {
            let label = match m.role {
                Role::User => "User",
                Role::Assistant => "Assistant",
            };
            format!("{label}: {}", m.content)
        })
        .collect();
    format!(
        "Conversation so far:\n\n{}\n\n---\n\nUser: {residual}",
        rendered.join("\n\n")
    )
}
