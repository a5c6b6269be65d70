use actix_web::{HttpResponse, web};
use serde::Serialize;

use garage_core::domain::PostDetails;
use garage_shared::ApiResponse;
use garage_shared::dto::UserResponse;

use super::user_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

#[derive(Serialize)]
struct StatsResponse {
    user_count: u64,
    post_count: u64,
    reply_count: u64,
    chat_count: u64,
    avg_replies_per_post: f64,
    recent_users: Vec<UserResponse>,
    recent_posts: Vec<PostDetails>,
}

/// GET /api/admin/stats
pub async fn stats(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let stats = state.forum.stats(identity.actor()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(StatsResponse {
        user_count: stats.user_count,
        post_count: stats.post_count,
        reply_count: stats.reply_count,
        chat_count: stats.chat_count,
        avg_replies_per_post: stats.avg_replies_per_post,
        recent_users: stats.recent_users.iter().map(user_response).collect(),
        recent_posts: stats.recent_posts,
    })))
}
