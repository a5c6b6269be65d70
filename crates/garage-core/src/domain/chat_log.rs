use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which responder produced a chat answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatSource {
    Ai,
    Fallback,
}

impl ChatSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatSource::Ai => "ai",
            ChatSource::Fallback => "fallback",
        }
    }
}

impl fmt::Display for ChatSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted chat request/response pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatLog {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub message: String,
    pub response: String,
    pub source: ChatSource,
    pub created_at: DateTime<Utc>,
}

impl ChatLog {
    pub fn new(user_id: Option<Uuid>, message: String, response: String, source: ChatSource) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            message,
            response,
            source,
            created_at: Utc::now(),
        }
    }
}
