//! One conversation with the chat endpoint.

use anyhow::{Context, Result, bail};
use garage_shared::ErrorResponse;
use garage_shared::dto::{ChatRequest, ChatResponse};

/// Prior messages sent along with each question.
pub const HISTORY_SENT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    fn label(self) -> &'static str {
        match self {
            Speaker::User => "ユーザー",
            Speaker::Assistant => "AI",
        }
    }
}

pub struct ChatSession {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    transcript: Vec<(Speaker, String)>,
}

impl ChatSession {
    pub fn new(api_url: &str, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .context("building HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/chat", api_url.trim_end_matches('/')),
            token,
            transcript: Vec::new(),
        })
    }

    /// The trailing `HISTORY_SENT` transcript entries as `"<speaker>: <text>"` lines.
    pub fn history(&self) -> Vec<String> {
        let start = self.transcript.len().saturating_sub(HISTORY_SENT);
        self.transcript[start..]
            .iter()
            .map(|(speaker, text)| format!("{}: {}", speaker.label(), text))
            .collect()
    }

    pub async fn ask(&mut self, message: &str) -> Result<ChatResponse> {
        let body = ChatRequest {
            message: Some(message.to_string()),
            history: self.history(),
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("sending to {}", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|e| e.detail)
                .unwrap_or_else(|| status.to_string());
            bail!("{detail}");
        }

        let reply: ChatResponse = response.json().await.context("decoding chat response")?;
        self.push(Speaker::User, message);
        self.push(Speaker::Assistant, &reply.response);
        Ok(reply)
    }

    fn push(&mut self, speaker: Speaker, text: &str) {
        self.transcript.push((speaker, text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_keeps_last_four_labelled() {
        let mut session = ChatSession::new("http://localhost:8080/", None).unwrap();
        assert!(session.history().is_empty());

        for i in 1..=3 {
            session.push(Speaker::User, &format!("質問{i}"));
            session.push(Speaker::Assistant, &format!("回答{i}"));
        }

        assert_eq!(
            session.history(),
            vec!["ユーザー: 質問2", "AI: 回答2", "ユーザー: 質問3", "AI: 回答3"]
        );
        assert_eq!(session.endpoint, "http://localhost:8080/api/chat");
    }
}
