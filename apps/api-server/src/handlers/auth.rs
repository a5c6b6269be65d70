//! Authentication handlers.

use actix_web::{HttpResponse, web};

use garage_core::services::{Registration, Session};
use garage_shared::ApiResponse;
use garage_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest};

use super::user_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn auth_response(session: Session) -> AuthResponse {
    AuthResponse {
        access_token: session.access_token,
        token_type: "Bearer".to_string(),
        expires_in: session.expires_in.max(0) as u64,
        user: user_response(&session.user),
    }
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let session = state
        .accounts
        .register(Registration {
            name: req.name,
            email: req.email,
            password: req.password,
            role: req.role,
            profile: req.profile,
        })
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        auth_response(session),
        "ユーザー登録が完了しました",
    )))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let session = state.accounts.login(&req.email, &req.password).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        auth_response(session),
        "ログインしました",
    )))
}

/// GET /api/auth/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.accounts.current_user(identity.user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(user_response(&user))))
}
