//! Generation request: three role-tagged messages plus a fixed seed.

use serde::{Deserialize, Serialize};

/// Seed sent with every generation request so identical diffs tend to
/// classify the same way.
pub const GENERATION_SEED: i64 = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Immutable request: system instruction, rules instruction, change set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    messages: [ChatMessage; 3],
    seed: i64,
}

impl GenerationRequest {
    pub(crate) fn new(system: String, instructions: String, change_set: String) -> Self {
        Self {
            messages: [
                ChatMessage::system(system),
                ChatMessage::user(instructions),
                ChatMessage::user(change_set),
            ],
            seed: GENERATION_SEED,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn seed(&self) -> i64 {
        self.seed
    }

    /// The change set segment, exactly as it was handed to the composer.
    pub fn change_set(&self) -> &str {
        &self.messages[2].content
    }
}
