use serde::{Deserialize, Serialize};

use super::post::PostDetails;
use super::user::User;

/// Admin dashboard snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumStats {
    pub user_count: u64,
    pub post_count: u64,
    pub reply_count: u64,
    pub chat_count: u64,
    pub avg_replies_per_post: f64,
    pub recent_users: Vec<User>,
    pub recent_posts: Vec<PostDetails>,
}
