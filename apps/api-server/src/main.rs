//! # Garage Forum API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use middleware::request_id::RequestIdMiddleware;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Garage Forum API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await;

    #[cfg(feature = "rate-limit")]
    let limiter: std::sync::Arc<dyn garage_core::ports::RateLimiter> = std::sync::Arc::new(
        garage_infra::InMemoryRateLimiter::new(config.rate_limit.clone()),
    );

    HttpServer::new(move || {
        let app = App::new();

        #[cfg(feature = "rate-limit")]
        let app = app.wrap(middleware::rate_limit::RateLimitMiddleware::new(
            limiter.clone(),
        ));

        app.wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .configure(handlers::configure(state.clone()))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
