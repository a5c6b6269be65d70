//! Application state - shared across all handlers.

use std::sync::Arc;

use async_trait::async_trait;

use garage_core::ports::{AiError, GenerativeModel, TokenService};
use garage_core::services::{AccountService, ChatService, ForumRepositories, ForumService};
use garage_infra::{Argon2PasswordService, GeminiClient, InMemoryDatabase, JwtTokenService};

#[cfg(feature = "postgres")]
use garage_infra::database::{
    DatabaseConnections, PostgresCategoryRepository, PostgresChatLogRepository,
    PostgresPostRepository, PostgresReplyRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub forum: Arc<ForumService>,
    pub chat: Arc<ChatService>,
    pub tokens: Arc<dyn TokenService>,
    /// `postgres` or `memory`.
    pub storage: &'static str,
}

/// Stand-in model used when the Gemini client cannot be built.
pub struct OfflineModel;

#[async_trait]
impl GenerativeModel for OfflineModel {
    async fn generate(&self, _prompt: &str) -> Result<String, AiError> {
        Err(AiError::NotConfigured)
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (repos, storage) = Self::repositories(config).await;

        let model: Arc<dyn GenerativeModel> = match GeminiClient::new(config.gemini.clone()) {
            Ok(client) => {
                if !config.gemini.is_configured() {
                    tracing::warn!("GEMINI_API_KEY not set. Chat will answer from keyword fallback.");
                }
                Arc::new(client)
            }
            Err(e) => {
                tracing::error!("Failed to build Gemini client: {}. Chat runs offline.", e);
                Arc::new(OfflineModel)
            }
        };

        let state = Self::build(repos, model, Arc::new(JwtTokenService::from_env()), storage);
        tracing::info!(storage, model = %config.gemini.model, "Application state initialized");
        state
    }

    /// Wire services over the given adapters.
    pub fn build(
        repos: ForumRepositories,
        model: Arc<dyn GenerativeModel>,
        tokens: Arc<dyn TokenService>,
        storage: &'static str,
    ) -> Self {
        Self {
            accounts: Arc::new(AccountService::new(
                repos.users.clone(),
                Arc::new(Argon2PasswordService::new()),
                tokens.clone(),
            )),
            chat: Arc::new(ChatService::new(model, repos.chat_logs.clone())),
            forum: Arc::new(ForumService::new(repos)),
            tokens,
            storage,
        }
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> (ForumRepositories, &'static str) {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return (InMemoryDatabase::seeded().await.repositories(), "memory");
        };

        match DatabaseConnections::init(db_config).await {
            Ok(connections) => {
                let db = connections.main;
                let repos = ForumRepositories {
                    users: Arc::new(PostgresUserRepository::new(db.clone())),
                    categories: Arc::new(PostgresCategoryRepository::new(db.clone())),
                    posts: Arc::new(PostgresPostRepository::new(db.clone())),
                    replies: Arc::new(PostgresReplyRepository::new(db.clone())),
                    chat_logs: Arc::new(PostgresChatLogRepository::new(db)),
                };
                (repos, "postgres")
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                (InMemoryDatabase::seeded().await.repositories(), "memory")
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(_config: &AppConfig) -> (ForumRepositories, &'static str) {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        (InMemoryDatabase::seeded().await.repositories(), "memory")
    }
}
