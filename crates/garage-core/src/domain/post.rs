use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::CategorySummary;
use super::user::AuthorSummary;

/// Publication state of a post. Only published posts are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostStatus {
    #[default]
    Published,
    Draft,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Published => "PUBLISHED",
            PostStatus::Draft => "DRAFT",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PUBLISHED" => Ok(PostStatus::Published),
            "DRAFT" => Ok(PostStatus::Draft),
            other => Err(format!("unknown post status: {other}")),
        }
    }
}

/// Post entity - a question or discussion thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new published post.
    pub fn new(user_id: Uuid, category_id: Uuid, title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            category_id,
            title,
            content,
            image_url: None,
            status: PostStatus::Published,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url;
        self
    }

    pub fn with_status(mut self, status: PostStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }
}

/// Post joined with its author, category and reply count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetails {
    #[serde(flatten)]
    pub post: Post,
    pub user: AuthorSummary,
    pub category: CategorySummary,
    pub reply_count: u64,
}

/// Filter and paging options for the post listing.
#[derive(Debug, Clone)]
pub struct PostQuery {
    pub page: u64,
    pub limit: u64,
    pub category_id: Option<Uuid>,
    pub search: Option<String>,
}

impl PostQuery {
    pub const DEFAULT_LIMIT: u64 = 10;
    pub const MAX_LIMIT: u64 = 100;

    /// Clamp raw paging input: page starts at 1, limit stays within 1..=100.
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
            category_id: None,
            search: None,
        }
    }

    /// Rows to skip, capped at `i64::MAX` so it always fits a SQL bigint.
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit)
            .min(i64::MAX as u64)
    }

    /// Case-insensitive match against title or content.
    pub fn matches_search(&self, post: &Post) -> bool {
        match self.search.as_deref() {
            None => true,
            Some(term) => {
                let term = term.to_lowercase();
                post.title.to_lowercase().contains(&term)
                    || post.content.to_lowercase().contains(&term)
            }
        }
    }
}

/// One page of results plus the total row count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.limit.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_clamps_paging() {
        let q = PostQuery::new(Some(0), Some(500));
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, 100);

        let q = PostQuery::new(None, None);
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, 10);
        assert_eq!(q.offset(), 0);

        let q = PostQuery::new(Some(3), Some(20));
        assert_eq!(q.offset(), 40);
    }

    #[test]
    fn test_offset_saturates_for_huge_pages() {
        let q = PostQuery::new(Some(u64::MAX), Some(100));
        assert_eq!(q.offset(), i64::MAX as u64);
    }

    #[test]
    fn test_search_matches_title_or_content() {
        let post = Post::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "CVTの異音診断について相談".to_string(),
            "Whining noise on acceleration".to_string(),
        );

        let mut q = PostQuery::new(None, None);
        assert!(q.matches_search(&post));

        q.search = Some("異音".to_string());
        assert!(q.matches_search(&post));

        q.search = Some("WHINING".to_string());
        assert!(q.matches_search(&post));

        q.search = Some("brake".to_string());
        assert!(!q.matches_search(&post));
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page: Page<()> = Page {
            items: vec![],
            page: 1,
            limit: 10,
            total: 21,
        };
        assert_eq!(page.total_pages(), 3);
    }
}
