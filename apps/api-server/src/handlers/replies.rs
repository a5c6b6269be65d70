//! Reply handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use garage_shared::ApiResponse;
use garage_shared::dto::CreateReplyRequest;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts/{id}/replies
pub async fn list(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let replies = state.forum.list_replies(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(replies)))
}

/// POST /api/posts/{id}/replies
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CreateReplyRequest>,
) -> AppResult<HttpResponse> {
    let reply = state
        .forum
        .create_reply(identity.actor(), path.into_inner(), body.into_inner().content)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        reply,
        "回答が正常に投稿されました",
    )))
}

/// POST /api/posts/{id}/replies/{reply_id}/best-answer
pub async fn best_answer(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, reply_id) = path.into_inner();

    state
        .forum
        .mark_best_answer(identity.actor(), post_id, reply_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("ベストアンサーを選択しました")))
}
