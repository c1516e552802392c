use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::db::models::{NewProgram, ProgramEntry};
use crate::db::services;
use crate::web::routes::method_not_allowed;
use crate::web::{AppError, AppState};

#[derive(Serialize)]
pub struct ClearProgramsResponse {
    message: String,
    deleted: u64,
}

// --- Route Handlers ---

async fn list_programs_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProgramEntry>>, AppError> {
    let programs = services::get_all_programs(&app_state.db_pool)
        .await
        .inspect_err(|e| error!(error = %e, "Error fetching programs."))?;
    Ok(Json(programs))
}

/// Appends the submitted programs. Does not clear the existing ones.
async fn add_programs_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<Vec<NewProgram>>,
) -> Result<(StatusCode, Json<Vec<ProgramEntry>>), AppError> {
    if payload.is_empty() {
        return Err(AppError::InvalidInput("No programs submitted".to_string()));
    }
    let inserted = services::insert_programs(&app_state.db_pool, &payload)
        .await
        .inspect_err(|e| error!(error = %e, "Error inserting programs."))?;
    info!(count = inserted.len(), "Programs added.");
    Ok((StatusCode::CREATED, Json(inserted)))
}

/// Clears the catalog and inserts the submitted programs atomically.
async fn replace_programs_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<Vec<NewProgram>>,
) -> Result<Json<Vec<ProgramEntry>>, AppError> {
    if payload.is_empty() {
        return Err(AppError::InvalidInput("No programs submitted".to_string()));
    }
    let inserted = services::replace_programs(&app_state.db_pool, &payload)
        .await
        .inspect_err(|e| error!(error = %e, "Error replacing programs."))?;
    info!(count = inserted.len(), "Program catalog replaced.");
    Ok(Json(inserted))
}

async fn clear_programs_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<ClearProgramsResponse>, AppError> {
    let deleted = services::clear_programs(&app_state.db_pool)
        .await
        .inspect_err(|e| error!(error = %e, "Error clearing programs."))?;
    info!(deleted, "Program catalog cleared.");
    Ok(Json(ClearProgramsResponse {
        message: "Program catalog cleared".to_string(),
        deleted,
    }))
}

// --- Router ---

pub fn create_program_router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/prodi",
        get(list_programs_handler)
            .post(add_programs_handler)
            .put(replace_programs_handler)
            .delete(clear_programs_handler)
            .fallback(method_not_allowed),
    )
}
