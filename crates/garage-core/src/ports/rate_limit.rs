//! Rate limiting port.

use std::time::Duration;

/// Rate limiter trait - abstraction over rate limiting backends.
///
/// `check` is synchronous so it can run inline in request middleware.
pub trait RateLimiter: Send + Sync {
    /// Check whether a request for `key` is allowed and consume one unit if so.
    fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError>;
}

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_after: Duration,
}

/// Rate limit errors.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Backend error: {0}")]
    Backend(String),
}
