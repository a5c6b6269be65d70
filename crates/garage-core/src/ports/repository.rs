use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Category, CategoryWithCount, ChatLog, Page, Post, PostDetails, PostQuery, Reply, ReplyDetails,
    User,
};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Total number of rows.
    async fn count(&self) -> Result<u64, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Most recently registered users, newest first.
    async fn recent(&self, limit: u64) -> Result<Vec<User>, RepoError>;
}

#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    /// All categories ordered by name, with published post counts.
    async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Published posts matching the query, newest first.
    async fn list_published(&self, query: &PostQuery) -> Result<Page<PostDetails>, RepoError>;

    /// A single published post with author, category and reply count.
    async fn find_published_details(&self, id: Uuid) -> Result<Option<PostDetails>, RepoError>;

    /// Delete a post and all of its replies atomically.
    async fn delete_with_replies(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait ReplyRepository: BaseRepository<Reply, Uuid> {
    /// Replies to a post with their authors, best answer first then oldest first.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<ReplyDetails>, RepoError>;

    /// Flag one reply as the best answer and clear the flag on its siblings.
    async fn mark_best_answer(&self, post_id: Uuid, reply_id: Uuid) -> Result<(), RepoError>;
}

/// Append-only store for chat request/response pairs.
pub trait ChatLogRepository: BaseRepository<ChatLog, Uuid> {}
