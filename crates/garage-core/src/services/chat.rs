//! Chat pipeline: AI model first, keyword fallback on failure, best-effort log.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::chat::{fallback, prompt};
use crate::domain::{ChatLog, ChatSource};
use crate::error::DomainError;
use crate::ports::{BaseRepository, ChatLogRepository, GenerativeModel};

pub const MAX_MESSAGE_CHARS: usize = 500;

#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub response: String,
    pub source: ChatSource,
    pub timestamp: DateTime<Utc>,
}

pub struct ChatService {
    model: Arc<dyn GenerativeModel>,
    logs: Arc<dyn ChatLogRepository>,
}

impl ChatService {
    pub fn new(model: Arc<dyn GenerativeModel>, logs: Arc<dyn ChatLogRepository>) -> Self {
        Self { model, logs }
    }

    /// Answer one message. Only input validation can fail; backend and
    /// storage errors are logged and absorbed.
    pub async fn respond(
        &self,
        user_id: Option<Uuid>,
        message: &str,
        history: &[String],
    ) -> Result<ChatTurn, DomainError> {
        validate_message(message)?;

        let full_prompt = prompt::build_prompt(message, history);
        let (response, source) = match self.model.generate(&full_prompt).await {
            Ok(text) => (text, ChatSource::Ai),
            Err(e) => {
                tracing::warn!(error = %e, "AI backend failed, using keyword fallback");
                (fallback::respond(message).to_string(), ChatSource::Fallback)
            }
        };

        let log = ChatLog::new(user_id, message.to_string(), response.clone(), source);
        if let Err(e) = self.logs.insert(log).await {
            tracing::warn!(error = %e, "Failed to persist chat log");
        }

        Ok(ChatTurn {
            response,
            source,
            timestamp: Utc::now(),
        })
    }
}

pub fn validate_message(message: &str) -> Result<(), DomainError> {
    if message.trim().is_empty() {
        return Err(DomainError::validation("メッセージが必要です"));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(DomainError::validation(
            "メッセージが長すぎます（500文字以内）",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_bounds_count_characters() {
        assert!(validate_message("").is_err());
        assert!(validate_message("   ").is_err());
        // 500 multi-byte characters is within the limit
        assert!(validate_message(&"音".repeat(500)).is_ok());
        assert!(validate_message(&"音".repeat(501)).is_err());
    }
}
