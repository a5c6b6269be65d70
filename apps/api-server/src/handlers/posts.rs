//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use garage_core::services::{ListPosts, NewPost};
use garage_shared::ApiResponse;
use garage_shared::dto::{CreatePostRequest, ListPostsQuery, Pagination, PostListResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();

    let page = state
        .forum
        .list_posts(ListPosts {
            page: query.page,
            limit: query.limit,
            category: query.category,
            search: query.search,
        })
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostListResponse {
        pagination: Pagination::new(page.page, page.limit, page.total),
        posts: page.items,
    })))
}

/// GET /api/posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = state.forum.get_post(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let post = state
        .forum
        .create_post(
            identity.actor(),
            NewPost {
                title: req.title,
                content: req.content,
                category: req.category_id,
                image_url: req.image_url,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        post,
        "投稿が正常に作成されました",
    )))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .forum
        .delete_post(identity.actor(), path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("投稿が正常に削除されました")))
}
