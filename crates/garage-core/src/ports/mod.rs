//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod ai;
mod auth;
mod rate_limit;
mod repository;

pub use ai::{AiError, GenerationConfig, GenerativeModel};
pub use auth::{AuthError, MIN_PASSWORD_CHARS, PasswordService, TokenClaims, TokenService};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use repository::{
    BaseRepository, CategoryRepository, ChatLogRepository, PostRepository, ReplyRepository,
    UserRepository,
};
