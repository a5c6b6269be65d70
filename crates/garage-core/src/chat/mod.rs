//! Chatbot decision logic: prompt assembly, keyword fallback and usage limits.

pub mod fallback;
pub mod prompt;
pub mod usage;

pub use usage::{DAILY_LIMIT, DailyUsage};
