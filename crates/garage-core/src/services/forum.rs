//! Forum rules: posting, replying, moderation and the admin overview.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{
    CategoryWithCount, ForumStats, Page, Post, PostDetails, PostQuery, Reply, ReplyDetails,
    UserRole,
};
use crate::error::DomainError;
use crate::ports::{
    BaseRepository, CategoryRepository, ChatLogRepository, PostRepository, ReplyRepository,
    UserRepository,
};

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
const RECENT_LIMIT: u64 = 5;

/// The authenticated caller of an operation.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl Actor {
    /// Authors always control their own content; staff control everything.
    fn can_manage(&self, owner_id: Uuid) -> bool {
        self.user_id == owner_id || self.role.can_moderate()
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    /// Category slug.
    pub category: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ListPosts {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct ForumRepositories {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub replies: Arc<dyn ReplyRepository>,
    pub chat_logs: Arc<dyn ChatLogRepository>,
}

pub struct ForumService {
    repos: ForumRepositories,
}

impl ForumService {
    pub fn new(repos: ForumRepositories) -> Self {
        Self { repos }
    }

    pub async fn list_categories(&self) -> Result<Vec<CategoryWithCount>, DomainError> {
        Ok(self.repos.categories.list_with_counts().await?)
    }

    pub async fn list_posts(&self, params: ListPosts) -> Result<Page<PostDetails>, DomainError> {
        let mut query = PostQuery::new(params.page, params.limit);

        // An unknown slug is ignored rather than rejected.
        if let Some(slug) = params.category.as_deref().filter(|s| !s.is_empty()) {
            query.category_id = self
                .repos
                .categories
                .find_by_slug(slug)
                .await?
                .map(|c| c.id);
        }
        query.search = params
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(self.repos.posts.list_published(&query).await?)
    }

    pub async fn get_post(&self, id: Uuid) -> Result<PostDetails, DomainError> {
        self.repos
            .posts
            .find_published_details(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    pub async fn create_post(&self, actor: Actor, input: NewPost) -> Result<PostDetails, DomainError> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(DomainError::validation("タイトルは必須です"));
        }
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(DomainError::validation(
                "タイトルは200文字以内で入力してください",
            ));
        }
        if input.content.trim().is_empty() {
            return Err(DomainError::validation("内容は必須です"));
        }
        let slug = input.category.trim();
        if slug.is_empty() {
            return Err(DomainError::validation("カテゴリは必須です"));
        }
        let image_url = input.image_url.filter(|u| !u.trim().is_empty());
        if let Some(url) = image_url.as_deref() {
            validate_image_url(url)?;
        }

        let category = self
            .repos
            .categories
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::validation("無効なカテゴリです"))?;

        let author = self
            .repos
            .users
            .find_by_id(actor.user_id)
            .await?
            .ok_or(DomainError::Unauthorized)?;

        let post = Post::new(author.id, category.id, title.to_string(), input.content)
            .with_image_url(image_url);
        let post = self.repos.posts.insert(post).await?;

        tracing::info!(post_id = %post.id, category = %category.slug, "Post created");

        Ok(PostDetails {
            post,
            user: author.summary(),
            category: category.summary(),
            reply_count: 0,
        })
    }

    pub async fn delete_post(&self, actor: Actor, id: Uuid) -> Result<(), DomainError> {
        let post = self
            .repos
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))?;

        if !actor.can_manage(post.user_id) {
            return Err(DomainError::Forbidden("削除権限がありません".to_string()));
        }

        self.repos.posts.delete_with_replies(id).await?;
        tracing::info!(post_id = %id, deleted_by = %actor.user_id, "Post deleted");
        Ok(())
    }

    pub async fn list_replies(&self, post_id: Uuid) -> Result<Vec<ReplyDetails>, DomainError> {
        self.require_published(post_id).await?;
        Ok(self.repos.replies.list_for_post(post_id).await?)
    }

    pub async fn create_reply(
        &self,
        actor: Actor,
        post_id: Uuid,
        content: String,
    ) -> Result<ReplyDetails, DomainError> {
        if content.trim().is_empty() {
            return Err(DomainError::validation("回答内容は必須です"));
        }

        self.require_published(post_id).await?;

        let author = self
            .repos
            .users
            .find_by_id(actor.user_id)
            .await?
            .ok_or(DomainError::Unauthorized)?;

        let reply = self
            .repos
            .replies
            .insert(Reply::new(post_id, author.id, content))
            .await?;

        tracing::info!(post_id = %post_id, reply_id = %reply.id, "Reply created");

        Ok(ReplyDetails {
            reply,
            user: author.summary(),
        })
    }

    pub async fn mark_best_answer(
        &self,
        actor: Actor,
        post_id: Uuid,
        reply_id: Uuid,
    ) -> Result<(), DomainError> {
        let post = self.require_published(post_id).await?;
        if !actor.can_manage(post.user_id) {
            return Err(DomainError::Forbidden(
                "ベストアンサーを選択する権限がありません".to_string(),
            ));
        }

        match self.repos.replies.find_by_id(reply_id).await? {
            Some(reply) if reply.post_id == post_id => {}
            _ => return Err(DomainError::reply_not_found(reply_id)),
        }

        self.repos.replies.mark_best_answer(post_id, reply_id).await?;
        tracing::info!(post_id = %post_id, reply_id = %reply_id, "Best answer selected");
        Ok(())
    }

    /// Dashboard counts for staff. Post figures cover published posts only.
    pub async fn stats(&self, actor: Actor) -> Result<ForumStats, DomainError> {
        if !actor.role.can_moderate() {
            return Err(DomainError::Forbidden("管理者権限が必要です".to_string()));
        }

        let published = self
            .repos
            .posts
            .list_published(&PostQuery::new(Some(1), Some(RECENT_LIMIT)))
            .await?;
        let reply_count = self.repos.replies.count().await?;

        Ok(ForumStats {
            user_count: self.repos.users.count().await?,
            post_count: published.total,
            reply_count,
            chat_count: self.repos.chat_logs.count().await?,
            avg_replies_per_post: average_replies(reply_count, published.total),
            recent_users: self.repos.users.recent(RECENT_LIMIT).await?,
            recent_posts: published.items,
        })
    }

    async fn require_published(&self, post_id: Uuid) -> Result<Post, DomainError> {
        match self.repos.posts.find_by_id(post_id).await? {
            Some(post) if post.is_published() => Ok(post),
            _ => Err(DomainError::post_not_found(post_id)),
        }
    }
}

/// Replies per published post, rounded to one decimal place.
fn average_replies(replies: u64, posts: u64) -> f64 {
    if posts == 0 {
        return 0.0;
    }
    (replies as f64 / posts as f64 * 10.0).round() / 10.0
}

fn validate_image_url(url: &str) -> Result<(), DomainError> {
    if let Some(rest) = url.strip_prefix("data:image/") {
        // base64 inflates by 4/3
        let payload = rest.split_once(',').map_or(rest, |(_, data)| data);
        if payload.len() / 4 * 3 > MAX_IMAGE_BYTES {
            return Err(DomainError::validation(
                "画像ファイルは5MB以下にしてください",
            ));
        }
        return Ok(());
    }
    if url.starts_with("https://") || url.starts_with("http://") {
        return Ok(());
    }
    Err(DomainError::validation("画像URLが不正です"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_permissions() {
        let owner = Uuid::new_v4();
        let user = Actor {
            user_id: Uuid::new_v4(),
            role: UserRole::User,
        };
        let moderator = Actor {
            user_id: Uuid::new_v4(),
            role: UserRole::Moderator,
        };
        let author = Actor {
            user_id: owner,
            role: UserRole::User,
        };

        assert!(!user.can_manage(owner));
        assert!(moderator.can_manage(owner));
        assert!(author.can_manage(owner));
    }

    #[test]
    fn test_image_url_validation() {
        assert!(validate_image_url("https://cdn.example.com/a.jpg").is_ok());
        assert!(validate_image_url("data:image/png;base64,iVBORw0KGgo=").is_ok());
        assert!(validate_image_url("ftp://example.com/a.jpg").is_err());

        let huge = format!("data:image/png;base64,{}", "A".repeat(MAX_IMAGE_BYTES / 3 * 4 + 8));
        assert!(validate_image_url(&huge).is_err());
    }

    #[test]
    fn test_average_replies_rounds_to_one_decimal() {
        assert_eq!(average_replies(0, 0), 0.0);
        assert_eq!(average_replies(5, 0), 0.0);
        assert_eq!(average_replies(4, 3), 1.3);
        assert_eq!(average_replies(10, 4), 2.5);
    }
}
