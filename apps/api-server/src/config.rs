//! Application configuration loaded from environment variables.

use std::env;

#[cfg(feature = "postgres")]
use garage_infra::database::DatabaseConfig;
#[cfg(feature = "rate-limit")]
use garage_infra::RateLimitConfig;
use garage_infra::GeminiConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    #[cfg(feature = "rate-limit")]
    pub rate_limit: RateLimitConfig,
    pub gemini: GeminiConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        #[cfg(feature = "postgres")]
        let database = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(|url| DatabaseConfig {
                url,
                max_connections: env_parse("DB_MAX_CONNECTIONS").unwrap_or(20),
                min_connections: env_parse("DB_MIN_CONNECTIONS").unwrap_or(2),
            });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env_parse("PORT").unwrap_or(8080),
            #[cfg(feature = "postgres")]
            database,
            #[cfg(feature = "rate-limit")]
            rate_limit: RateLimitConfig::from_env(),
            gemini: GeminiConfig::from_env(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
