//! Generative-AI backends.

mod gemini;

pub use gemini::{GeminiClient, GeminiConfig};
