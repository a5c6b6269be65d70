//! Generative-AI port.

use async_trait::async_trait;

/// Sampling parameters sent with every generation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    /// Low temperature keeps repair advice conservative.
    fn default() -> Self {
        Self {
            temperature: 0.3,
            top_p: 0.8,
            top_k: 40,
            max_output_tokens: 1000,
        }
    }
}

/// A text-generation backend (Gemini in production).
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Generate a completion for a fully assembled prompt.
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("AI backend is not configured")]
    NotConfigured,

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Backend returned no text")]
    EmptyResponse,
}
