//! Middleware modules.

pub mod auth;
pub mod error;
pub mod request_id;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;
