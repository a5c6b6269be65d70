//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    #[serde(default)]
    pub name: String,
    pub email: String,
    pub password: String,
    /// `USER` (default) or `MODERATOR`.
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub profile: Option<String>,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

/// Request to open a new thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Category slug.
    #[serde(default, alias = "categoryId")]
    pub category_id: String,
    #[serde(default, alias = "imageUrl")]
    pub image_url: Option<String>,
}

/// Query string for the post listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        Self {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit.max(1)),
        }
    }
}

/// One page of posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse<T> {
    pub posts: Vec<T>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReplyRequest {
    #[serde(default)]
    pub content: String,
}

/// Chat message submission.
///
/// `history` holds prior turns as `"<speaker>: <text>"` lines, oldest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub history: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub timestamp: String,
    /// `ai` or `fallback`.
    pub source: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_post_accepts_camel_case_aliases() {
        let req: CreatePostRequest = serde_json::from_str(
            r#"{"title":"異音","content":"本文","categoryId":"engine","imageUrl":"https://x/a.jpg"}"#,
        )
        .unwrap();

        assert_eq!(req.category_id, "engine");
        assert_eq!(req.image_url.as_deref(), Some("https://x/a.jpg"));
    }

    #[test]
    fn test_pagination_total_pages() {
        let json = serde_json::to_value(Pagination::new(1, 10, 21)).unwrap();
        assert_eq!(json["totalPages"], 3);

        assert_eq!(Pagination::new(1, 10, 0).total_pages, 0);
    }

    #[test]
    fn test_chat_request_defaults() {
        let req: ChatRequest = serde_json::from_str("{}").unwrap();
        assert!(req.message.is_none());
        assert!(req.history.is_empty());
    }
}
