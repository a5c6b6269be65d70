//! Domain entities - the core business objects.

mod category;
mod chat_log;
mod post;
mod reply;
mod stats;
mod user;

pub use category::{Category, CategorySummary, CategoryWithCount};
pub use chat_log::{ChatLog, ChatSource};
pub use post::{Page, Post, PostDetails, PostQuery, PostStatus};
pub use reply::{Reply, ReplyDetails, sort_for_display};
pub use stats::ForumStats;
pub use user::{AuthorSummary, User, UserRole};
