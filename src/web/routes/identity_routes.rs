use axum::{
    Json, Router,
    extract::State,
    routing::{get, put},
};
use std::sync::Arc;
use tracing::{error, info};

use crate::db::models::{IdentityField, IdentityFieldUpdate};
use crate::db::services;
use crate::web::routes::method_not_allowed;
use crate::web::{AppError, AppState};

// --- Route Handlers ---

async fn list_identity_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<IdentityField>>, AppError> {
    let fields = services::get_all_identity_fields(&app_state.db_pool)
        .await
        .inspect_err(|e| error!(error = %e, "Error fetching identity fields."))?;
    Ok(Json(fields))
}

async fn update_identity_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<Vec<IdentityFieldUpdate>>,
) -> Result<Json<Vec<IdentityField>>, AppError> {
    if payload.is_empty() {
        return Err(AppError::InvalidInput("No identity fields submitted".to_string()));
    }
    let updated = services::update_identity_fields(&app_state.db_pool, &payload)
        .await
        .inspect_err(|e| error!(error = %e, "Error updating identity fields."))?;
    info!(count = updated.len(), "Identity fields updated.");
    Ok(Json(updated))
}

// --- Router ---

pub fn create_identity_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/identitas",
            get(list_identity_handler).fallback(method_not_allowed),
        )
        .route(
            "/api/identitasDetails",
            put(update_identity_handler).fallback(method_not_allowed),
        )
}
