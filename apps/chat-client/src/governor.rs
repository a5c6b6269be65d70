//! Daily limit check wrapped around one chat request.

use anyhow::Result;
use chrono::NaiveDate;
use garage_shared::dto::ChatResponse;

use crate::session::ChatSession;
use crate::usage_store::UsageStore;

pub enum Outcome {
    /// Today's allowance is spent; nothing was sent.
    Limited,
    Answered { reply: ChatResponse, remaining: u32 },
}

/// Checks the allowance before sending and counts the turn only after a
/// successful answer.
pub async fn governed_ask(
    session: &mut ChatSession,
    store: &UsageStore,
    today: NaiveDate,
    message: &str,
) -> Result<Outcome> {
    let mut usage = store.load();
    if !usage.allows(today) {
        return Ok(Outcome::Limited);
    }

    let reply = session.ask(message).await?;

    usage.record(today);
    if let Err(e) = store.save(&usage) {
        tracing::warn!(path = %store.path().display(), error = %e, "Failed to save usage");
    }

    Ok(Outcome::Answered {
        reply,
        remaining: usage.remaining(today),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use garage_core::chat::{DAILY_LIMIT, DailyUsage};

    #[tokio::test]
    async fn test_spent_allowance_sends_nothing() {
        let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let path = std::env::temp_dir().join(format!("garage-chat-limit-{nanos}.json"));
        let store = UsageStore::new(&path);
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let spent = DailyUsage {
            date: Some(today),
            count: DAILY_LIMIT,
        };
        store.save(&spent).unwrap();

        // TEST-NET-1; any attempted request would fail instead of returning Limited
        let mut session = ChatSession::new("http://192.0.2.1:9", None).unwrap();
        let outcome = governed_ask(&mut session, &store, today, "ブレーキの点検").await.unwrap();

        assert!(matches!(outcome, Outcome::Limited));
        assert_eq!(store.load(), spent);
        assert!(session.history().is_empty());
        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_failed_request_is_not_counted() {
        let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let path = std::env::temp_dir().join(format!("garage-chat-refused-{nanos}.json"));
        let store = UsageStore::new(&path);
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        // nothing listens on port 1 of loopback
        let mut session = ChatSession::new("http://127.0.0.1:1", None).unwrap();
        let result = governed_ask(&mut session, &store, today, "オイル交換").await;

        assert!(result.is_err());
        assert_eq!(store.load().used_on(today), 0);
    }
}
