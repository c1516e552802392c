use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::server::config::ServerConfig;
use crate::web::routes::*;

pub mod error;
pub mod routes;

pub use error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: DatabaseConnection,
    pub config: Arc<ServerConfig>,
}

async fn health_check_handler() -> &'static str {
    "OK"
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(vec![Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    match config.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => cors.allow_origin(origin),
        Some(Err(e)) => {
            warn!(error = %e, "FRONTEND_URL is not a valid origin, allowing any origin.");
            cors.allow_origin(Any)
        }
        None => cors.allow_origin(Any),
    }
}

pub fn create_axum_router(db_pool: DatabaseConnection, config: Arc<ServerConfig>) -> Router {
    let app_state = Arc::new(AppState {
        db_pool,
        config: config.clone(),
    });

    Router::new()
        .route("/api/health", get(health_check_handler))
        .merge(identity_routes::create_identity_router())
        .merge(program_routes::create_program_router())
        .merge(upload_routes::create_upload_router(config.max_upload_bytes))
        .merge(news_routes::create_news_router())
        .merge(visit_routes::create_visit_router())
        .nest_service(&config.public_upload_prefix, ServeDir::new(&config.upload_dir))
        .with_state(app_state)
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http())
}
