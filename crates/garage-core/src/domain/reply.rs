use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::AuthorSummary;

/// Reply entity - an answer to a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub is_best_answer: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reply {
    pub fn new(post_id: Uuid, user_id: Uuid, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            content,
            is_best_answer: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyDetails {
    #[serde(flatten)]
    pub reply: Reply,
    pub user: AuthorSummary,
}

/// Best answer first, then oldest first.
pub fn sort_for_display(replies: &mut [ReplyDetails]) {
    replies.sort_by(|a, b| {
        b.reply
            .is_best_answer
            .cmp(&a.reply.is_best_answer)
            .then(a.reply.created_at.cmp(&b.reply.created_at))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use chrono::TimeDelta;

    fn details(reply: Reply) -> ReplyDetails {
        ReplyDetails {
            user: AuthorSummary {
                id: reply.user_id,
                name: "整備士".to_string(),
                role: UserRole::User,
            },
            reply,
        }
    }

    #[test]
    fn test_best_answer_sorts_first() {
        let post_id = Uuid::new_v4();
        let mut first = Reply::new(post_id, Uuid::new_v4(), "first".to_string());
        let mut second = Reply::new(post_id, Uuid::new_v4(), "second".to_string());
        let mut best = Reply::new(post_id, Uuid::new_v4(), "best".to_string());
        first.created_at -= TimeDelta::minutes(10);
        second.created_at -= TimeDelta::minutes(5);
        best.is_best_answer = true;

        let mut replies = vec![details(second), details(best), details(first)];
        sort_for_display(&mut replies);

        let order: Vec<&str> = replies.iter().map(|r| r.reply.content.as_str()).collect();
        assert_eq!(order, vec!["best", "first", "second"]);
    }
}
