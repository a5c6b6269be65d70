//! In-memory repositories - used when no database is configured and in tests.
//!
//! Note: Data is lost on process restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use garage_core::domain::{
    Category, CategoryWithCount, ChatLog, Page, Post, PostDetails, PostQuery, Reply, ReplyDetails,
    User, sort_for_display,
};
use garage_core::error::RepoError;
use garage_core::ports::{
    BaseRepository, CategoryRepository, ChatLogRepository, PostRepository, ReplyRepository,
    UserRepository,
};
use garage_core::services::ForumRepositories;

/// Categories every fresh forum starts with: (name, slug, description).
pub const DEFAULT_CATEGORIES: [(&str, &str, &str); 5] = [
    ("エンジン", "engine", "エンジン本体・オイル・冷却系の整備"),
    ("トランスミッション", "transmission", "AT・CVT・MTの不具合と整備"),
    ("電装系", "electrical", "バッテリー・ハイブリッド・配線トラブル"),
    ("故障診断", "diagnosis", "診断機の使い方と故障コードの読み方"),
    ("工場経営", "business", "整備工場の経営・集客・人材"),
];

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    categories: HashMap<Uuid, Category>,
    posts: HashMap<Uuid, Post>,
    replies: HashMap<Uuid, Reply>,
    chat_logs: HashMap<Uuid, ChatLog>,
}

impl Tables {
    fn post_details(&self, post: &Post) -> Option<PostDetails> {
        let user = self.users.get(&post.user_id)?;
        let category = self.categories.get(&post.category_id)?;
        let reply_count = self
            .replies
            .values()
            .filter(|r| r.post_id == post.id)
            .count() as u64;

        Some(PostDetails {
            post: post.clone(),
            user: user.summary(),
            category: category.summary(),
            reply_count,
        })
    }
}

/// Shared in-memory store backing all forum repositories.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with the default categories.
    pub async fn seeded() -> Self {
        let db = Self::new();
        {
            let mut tables = db.tables.write().await;
            for (name, slug, description) in DEFAULT_CATEGORIES {
                let category =
                    Category::new(name.to_string(), slug.to_string(), Some(description.to_string()));
                tables.categories.insert(category.id, category);
            }
        }
        db
    }

    /// Repository handles sharing this store.
    pub fn repositories(&self) -> ForumRepositories {
        ForumRepositories {
            users: Arc::new(InMemoryUserRepository(self.clone())),
            categories: Arc::new(InMemoryCategoryRepository(self.clone())),
            posts: Arc::new(InMemoryPostRepository(self.clone())),
            replies: Arc::new(InMemoryReplyRepository(self.clone())),
            chat_logs: Arc::new(InMemoryChatLogRepository(self.clone())),
        }
    }
}

pub struct InMemoryUserRepository(InMemoryDatabase);
pub struct InMemoryCategoryRepository(InMemoryDatabase);
pub struct InMemoryPostRepository(InMemoryDatabase);
pub struct InMemoryReplyRepository(InMemoryDatabase);
pub struct InMemoryChatLogRepository(InMemoryDatabase);

/// Implements `BaseRepository` for a repository over one table.
macro_rules! base_repository {
    ($repo:ty, $entity:ty, $table:ident) => {
        #[async_trait]
        impl BaseRepository<$entity, Uuid> for $repo {
            async fn find_by_id(&self, id: Uuid) -> Result<Option<$entity>, RepoError> {
                Ok(self.0.tables.read().await.$table.get(&id).cloned())
            }

            async fn insert(&self, entity: $entity) -> Result<$entity, RepoError> {
                let mut tables = self.0.tables.write().await;
                self.check_insert(&tables, &entity)?;
                tables.$table.insert(entity.id, entity.clone());
                Ok(entity)
            }

            async fn count(&self) -> Result<u64, RepoError> {
                Ok(self.0.tables.read().await.$table.len() as u64)
            }
        }
    };
}

base_repository!(InMemoryUserRepository, User, users);
base_repository!(InMemoryCategoryRepository, Category, categories);
base_repository!(InMemoryPostRepository, Post, posts);
base_repository!(InMemoryReplyRepository, Reply, replies);
base_repository!(InMemoryChatLogRepository, ChatLog, chat_logs);

impl InMemoryUserRepository {
    fn check_insert(&self, tables: &Tables, user: &User) -> Result<(), RepoError> {
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        Ok(())
    }
}

impl InMemoryCategoryRepository {
    fn check_insert(&self, tables: &Tables, category: &Category) -> Result<(), RepoError> {
        if tables.categories.values().any(|c| c.slug == category.slug) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        Ok(())
    }
}

impl InMemoryPostRepository {
    fn check_insert(&self, tables: &Tables, post: &Post) -> Result<(), RepoError> {
        if !tables.users.contains_key(&post.user_id)
            || !tables.categories.contains_key(&post.category_id)
        {
            return Err(RepoError::Constraint("Unknown author or category".to_string()));
        }
        Ok(())
    }
}

impl InMemoryReplyRepository {
    fn check_insert(&self, tables: &Tables, reply: &Reply) -> Result<(), RepoError> {
        if !tables.users.contains_key(&reply.user_id) || !tables.posts.contains_key(&reply.post_id)
        {
            return Err(RepoError::Constraint("Unknown author or post".to_string()));
        }
        Ok(())
    }
}

impl InMemoryChatLogRepository {
    fn check_insert(&self, _tables: &Tables, _log: &ChatLog) -> Result<(), RepoError> {
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.0.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn recent(&self, limit: u64) -> Result<Vec<User>, RepoError> {
        let tables = self.0.tables.read().await;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        users.truncate(limit as usize);
        Ok(users)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.0.tables.read().await;
        Ok(tables.categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError> {
        let tables = self.0.tables.read().await;
        let mut categories: Vec<CategoryWithCount> = tables
            .categories
            .values()
            .map(|category| CategoryWithCount {
                post_count: tables
                    .posts
                    .values()
                    .filter(|p| p.category_id == category.id && p.is_published())
                    .count() as u64,
                category: category.clone(),
            })
            .collect();
        categories.sort_by(|a, b| a.category.name.cmp(&b.category.name));
        Ok(categories)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list_published(&self, query: &PostQuery) -> Result<Page<PostDetails>, RepoError> {
        let tables = self.0.tables.read().await;

        let mut matching: Vec<&Post> = tables
            .posts
            .values()
            .filter(|p| p.is_published())
            .filter(|p| query.category_id.is_none_or(|id| p.category_id == id))
            .filter(|p| query.matches_search(p))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .filter_map(|p| tables.post_details(p))
            .collect();

        Ok(Page {
            items,
            page: query.page,
            limit: query.limit,
            total,
        })
    }

    async fn find_published_details(&self, id: Uuid) -> Result<Option<PostDetails>, RepoError> {
        let tables = self.0.tables.read().await;
        Ok(tables
            .posts
            .get(&id)
            .filter(|p| p.is_published())
            .and_then(|p| tables.post_details(p)))
    }

    async fn delete_with_replies(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.0.tables.write().await;
        tables.posts.remove(&id).ok_or(RepoError::NotFound)?;
        tables.replies.retain(|_, r| r.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl ReplyRepository for InMemoryReplyRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<ReplyDetails>, RepoError> {
        let tables = self.0.tables.read().await;
        let mut replies: Vec<ReplyDetails> = tables
            .replies
            .values()
            .filter(|r| r.post_id == post_id)
            .filter_map(|r| {
                let user = tables.users.get(&r.user_id)?;
                Some(ReplyDetails {
                    reply: r.clone(),
                    user: user.summary(),
                })
            })
            .collect();
        sort_for_display(&mut replies);
        Ok(replies)
    }

    async fn mark_best_answer(&self, post_id: Uuid, reply_id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.0.tables.write().await;
        match tables.replies.get(&reply_id) {
            Some(reply) if reply.post_id == post_id => {}
            _ => return Err(RepoError::NotFound),
        }

        for reply in tables.replies.values_mut().filter(|r| r.post_id == post_id) {
            reply.is_best_answer = reply.id == reply_id;
        }
        Ok(())
    }
}

impl ChatLogRepository for InMemoryChatLogRepository {}
