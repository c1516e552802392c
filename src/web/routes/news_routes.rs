use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use std::sync::Arc;
use tracing::error;

use crate::db::models::NewsItem;
use crate::db::services;
use crate::web::routes::method_not_allowed;
use crate::web::{AppError, AppState};

async fn list_news_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<NewsItem>>, AppError> {
    let news = services::get_all_news(&app_state.db_pool)
        .await
        .inspect_err(|e| error!(error = %e, "Error fetching news."))?;
    Ok(Json(news))
}

async fn get_news_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<NewsItem>, AppError> {
    let item = services::get_news_by_id(&app_state.db_pool, &id)
        .await
        .inspect_err(|e| error!(error = %e, news_id = %id, "Error fetching news item."))?
        .ok_or_else(|| AppError::NotFound("News item not found".to_string()))?;
    Ok(Json(item))
}

pub fn create_news_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/berita", get(list_news_handler).fallback(method_not_allowed))
        .route("/api/berita/{id}", get(get_news_handler).fallback(method_not_allowed))
}
