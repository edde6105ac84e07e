//! Assistant chat history and inbox models.

use serde::{Deserialize, Serialize};

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    /// Storage string for the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }

    /// Parse a storage string back into a role.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "user" => Some(ChatRole::User),
            "assistant" => Some(ChatRole::Assistant),
            _ => None,
        }
    }
}

/// One message in the assistant conversation history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub owner_id: String,
    pub role: ChatRole,
    /// Message body, persisted verbatim
    pub content: String,
    pub created_at: String,
}

impl ChatMessage {
    /// Create a message authored by the user.
    pub fn user(owner_id: String, content: String) -> Self {
        Self::new(owner_id, ChatRole::User, content)
    }

    /// Create a message authored by the assistant.
    pub fn assistant(owner_id: String, content: String) -> Self {
        Self::new(owner_id, ChatRole::Assistant, content)
    }

    fn new(owner_id: String, role: ChatRole, content: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id,
            role,
            content,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// A patient message the assistant could not handle, pushed for staff review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InboxMessage {
    pub id: String,
    pub owner_id: String,
    pub patient_id: String,
    pub message: String,
    pub received_at: String,
    pub resolved: bool,
}

impl InboxMessage {
    pub fn new(owner_id: String, patient_id: String, message: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id,
            patient_id,
            message,
            received_at: chrono::Utc::now().to_rfc3339(),
            resolved: false,
        }
    }
}
