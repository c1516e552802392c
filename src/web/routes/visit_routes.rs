use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

use crate::db::models::DailyVisitCount;
use crate::db::services::{self, DEFAULT_VISIT_WINDOW_DAYS};
use crate::web::routes::method_not_allowed;
use crate::web::{AppError, AppState};

const MAX_VISIT_WINDOW_DAYS: u64 = 366;

#[derive(Deserialize)]
pub struct VisitWindowQuery {
    days: Option<u64>,
}

async fn daily_visits_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<VisitWindowQuery>,
) -> Result<Json<Vec<DailyVisitCount>>, AppError> {
    let days = query
        .days
        .unwrap_or(DEFAULT_VISIT_WINDOW_DAYS)
        .clamp(1, MAX_VISIT_WINDOW_DAYS);
    let counts = services::get_recent_daily_visit_counts(&app_state.db_pool, days)
        .await
        .inspect_err(|e| error!(error = %e, "Error aggregating visits."))?;
    Ok(Json(counts))
}

async fn record_visit_handler(State(app_state): State<Arc<AppState>>) -> Result<StatusCode, AppError> {
    services::record_visit(&app_state.db_pool)
        .await
        .inspect_err(|e| error!(error = %e, "Error recording visit."))?;
    Ok(StatusCode::CREATED)
}

pub fn create_visit_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/visits", get(daily_visits_handler).fallback(method_not_allowed))
        .route("/api/visit", post(record_visit_handler).fallback(method_not_allowed))
}
