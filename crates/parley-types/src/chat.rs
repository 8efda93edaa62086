//! Chat session and message types for Parley.
//!
//! A session is a titled conversation owned by a user or by the guest scope.
//! Messages belong to exactly one session and are written in user/assistant
//! pairs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::identity::Owner;

/// Title every session starts with until the first qualifying message.
pub const DEFAULT_SESSION_TITLE: &str = "New Chat";

/// Assistant reply stored when the completion provider fails.
pub const FALLBACK_REPLY: &str =
    "Sorry, I encountered an error while processing your request. Please try again.";

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A chat session.
///
/// Serialized as `{id, title, userId, createdAt, updatedAt}` where `userId`
/// is `null` for guest-owned sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "userId")]
    pub owner: Owner,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    /// Whether the title has never been changed from the default.
    pub fn has_default_title(&self) -> bool {
        self.title == DEFAULT_SESSION_TITLE
    }
}

/// A single message within a chat session.
///
/// Messages are ordered by `timestamp` within a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    pub content: String,
    pub role: MessageRole,
    pub timestamp: DateTime<Utc>,
}
