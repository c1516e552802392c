use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::get,
};
use std::sync::Arc;
use tracing::{error, info};

use crate::db::models::IdentityField;
use crate::db::models::UploadedFile;
use crate::db::services::{self, STRUCTURE_IMAGE_KEY};
use crate::web::routes::method_not_allowed;
use crate::web::{AppError, AppState};

/// Pulls the first field named `file` out of the body. Other fields are skipped.
async fn extract_file_field(multipart: &mut Multipart) -> Result<Option<UploadedFile>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_owned)
            .ok_or_else(|| AppError::InvalidInput("File tidak ditemukan".to_string()))?;
        let bytes = field.bytes().await?;
        return Ok(Some(UploadedFile { file_name, bytes }));
    }
    Ok(None)
}

async fn upload_structure_image_handler(
    State(app_state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<IdentityField>), AppError> {
    let file = extract_file_field(&mut multipart)
        .await?
        .ok_or_else(|| AppError::InvalidInput("File tidak ditemukan".to_string()))?;

    let config = &app_state.config;
    let saved = services::save_structure_image(
        &app_state.db_pool,
        &config.upload_dir,
        &config.public_upload_prefix,
        &file,
    )
    .await
    .inspect_err(|e| error!(error = %e, file_name = %file.file_name, "Error saving file."))?;

    info!(path = %saved.value, "Organizational structure image updated.");
    Ok((StatusCode::ACCEPTED, Json(saved)))
}

async fn get_structure_image_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<IdentityField>, AppError> {
    let field = services::get_identity_field(&app_state.db_pool, STRUCTURE_IMAGE_KEY)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("'{STRUCTURE_IMAGE_KEY}' is not set up")))?;
    Ok(Json(field))
}

pub fn create_upload_router(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/strukturorganisasi",
        get(get_structure_image_handler)
            .put(upload_structure_image_handler)
            .fallback(method_not_allowed)
            .layer(DefaultBodyLimit::max(max_upload_bytes)),
    )
}
