//! HTTP handlers and route configuration.

mod admin;
mod auth;
mod categories;
mod chat;
mod health;
mod posts;
mod replies;


use actix_web::web;

use garage_core::domain::User;
use garage_shared::dto::UserResponse;

use crate::middleware::error::{json_error_handler, path_error_handler, query_error_handler};
use crate::state::AppState;

/// App data and routes for one worker.
pub fn configure(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(state.tokens.clone()))
            .app_data(web::Data::new(state))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .configure(configure_routes);
    }
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/categories", web::get().to(categories::list))
            .route("/chat", web::post().to(chat::send))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("", web::post().to(posts::create))
                    .route("/{id}", web::get().to(posts::get))
                    .route("/{id}", web::delete().to(posts::delete))
                    .route("/{id}/replies", web::get().to(replies::list))
                    .route("/{id}/replies", web::post().to(replies::create))
                    .route(
                        "/{id}/replies/{reply_id}/best-answer",
                        web::post().to(replies::best_answer),
                    ),
            )
            .service(web::scope("/admin").route("/stats", web::get().to(admin::stats))),
    );
}

/// Public view of a user; never includes the password hash.
pub(crate) fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id.to_string(),
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
        created_at: user.created_at.to_rfc3339(),
    }
}
