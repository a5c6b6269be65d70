use actix_web::{HttpResponse, web};

use garage_shared::ApiResponse;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/categories
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.forum.list_categories().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(categories)))
}
