//! Chat pipeline over the in-memory chat log store.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use garage_core::DomainError;
use garage_core::chat::fallback;
use garage_core::domain::{ChatLog, ChatSource};
use garage_core::error::RepoError;
use garage_core::ports::{AiError, BaseRepository, ChatLogRepository, GenerativeModel};
use garage_core::services::ChatService;
use garage_infra::InMemoryDatabase;
use uuid::Uuid;

struct FailingModel;

#[async_trait]
impl GenerativeModel for FailingModel {
    async fn generate(&self, _prompt: &str) -> Result<String, AiError> {
        Err(AiError::Status {
            status: 503,
            body: "overloaded".to_string(),
        })
    }
}

/// Echoes the prompt so tests can inspect what was sent.
#[derive(Default)]
struct EchoModel {
    calls: AtomicUsize,
}

#[async_trait]
impl GenerativeModel for EchoModel {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(prompt.to_string())
    }
}

/// Log store whose database is down.
struct UnreachableLogs;

#[async_trait]
impl BaseRepository<ChatLog, Uuid> for UnreachableLogs {
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<ChatLog>, RepoError> {
        Ok(None)
    }

    async fn insert(&self, _entity: ChatLog) -> Result<ChatLog, RepoError> {
        Err(RepoError::Connection("connection refused".to_string()))
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(0)
    }
}

impl ChatLogRepository for UnreachableLogs {}

#[tokio::test]
async fn failing_model_falls_back_and_logs() {
    let repos = InMemoryDatabase::new().repositories();
    let chat = ChatService::new(Arc::new(FailingModel), repos.chat_logs.clone());

    let turn = chat
        .respond(None, "ブレーキから異音がします", &[])
        .await
        .unwrap();

    assert_eq!(turn.source, ChatSource::Fallback);
    assert_eq!(turn.response, fallback::BRAKE_ANSWER);
    assert_eq!(repos.chat_logs.count().await.unwrap(), 1);
}

#[tokio::test]
async fn model_sees_only_recent_history() {
    let repos = InMemoryDatabase::new().repositories();
    let model = Arc::new(EchoModel::default());
    let chat = ChatService::new(model.clone(), repos.chat_logs.clone());

    let history: Vec<String> = (1..=7).map(|i| format!("ユーザー: 履歴{i}")).collect();
    let turn = chat.respond(None, "オイル交換の時期は？", &history).await.unwrap();

    assert_eq!(turn.source, ChatSource::Ai);
    assert!(!turn.response.contains("履歴2"));
    assert!(turn.response.contains("履歴3"));
    assert!(turn.response.contains("履歴7"));
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn oversized_message_is_rejected_before_the_model() {
    let repos = InMemoryDatabase::new().repositories();
    let model = Arc::new(EchoModel::default());
    let chat = ChatService::new(model.clone(), repos.chat_logs.clone());

    let result = chat.respond(None, &"a".repeat(501), &[]).await;

    assert!(matches!(result, Err(DomainError::Validation(_))));
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    assert_eq!(repos.chat_logs.count().await.unwrap(), 0);
}

#[tokio::test]
async fn log_store_outage_still_answers() {
    let chat = ChatService::new(Arc::new(FailingModel), Arc::new(UnreachableLogs));

    let turn = chat
        .respond(None, "エアコンが効かない", &[])
        .await
        .unwrap();

    assert_eq!(turn.source, ChatSource::Fallback);
    assert_eq!(turn.response, fallback::AIR_CONDITIONING_ANSWER);
}
