//! Domain-level error types.
//!
//! Messages on `DomainError` are user-facing and written in the forum's
//! display language; `RepoError` messages only ever reach the logs.

use thiserror::Error;
use uuid::Uuid;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity}が見つかりません")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("ログインが必要です")]
    Unauthorized,

    #[error("メールアドレスまたはパスワードが正しくありません")]
    InvalidCredentials,

    #[error("{0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    pub fn post_not_found(id: Uuid) -> Self {
        DomainError::NotFound { entity: "投稿", id }
    }

    pub fn reply_not_found(id: Uuid) -> Self {
        DomainError::NotFound { entity: "回答", id }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        DomainError::Internal(err.to_string())
    }
}
