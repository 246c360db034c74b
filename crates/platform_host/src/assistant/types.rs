//! Assistant request records.

use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Typed by the user.
    User,
    /// Produced by the assistant.
    Assistant,
}

/// One prior turn sent along with a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantTurn {
    /// Author.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
    /// Context token active when this turn was written.
    pub context: String,
}

/// Request for one assistant reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantPrompt {
    /// Context token framing the reply (`general`, `coding`, `email`, `brainstorming`).
    pub context: String,
    /// Human-readable context label.
    pub context_label: String,
    /// The new user message.
    pub message: String,
    /// Earlier turns, oldest first.
    pub history: Vec<AssistantTurn>,
}
