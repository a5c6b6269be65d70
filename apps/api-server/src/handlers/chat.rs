//! Chatbot endpoint.

use actix_web::{HttpResponse, web};

use garage_shared::dto::{ChatRequest, ChatResponse};

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::middleware::request_id::RequestId;
use crate::state::AppState;

/// POST /api/chat
///
/// Signed-in callers get the log linked to their account.
pub async fn send(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    request_id: RequestId,
    body: web::Json<ChatRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let user_id = identity.0.map(|i| i.user_id);

    let turn = state
        .chat
        .respond(user_id, req.message.as_deref().unwrap_or_default(), &req.history)
        .await?;

    tracing::info!(
        request_id = %request_id.as_str(),
        source = %turn.source,
        signed_in = user_id.is_some(),
        "Chat answered"
    );

    Ok(HttpResponse::Ok().json(ChatResponse {
        response: turn.response,
        timestamp: turn.timestamp.to_rfc3339(),
        source: turn.source.as_str().to_string(),
    }))
}
