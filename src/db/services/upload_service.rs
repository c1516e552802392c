use sea_orm::DatabaseConnection;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use crate::db::entities::identitas;
use crate::db::models::{IdentityFieldUpdate, UploadedFile};
use crate::db::services::identity_service::{STRUCTURE_IMAGE_KEY, update_identity_fields};
use crate::web::error::AppError;

/// Accepts the client's file name as-is unless it could escape the upload
/// directory.
pub fn validate_file_name(file_name: &str) -> Result<&str, AppError> {
    let invalid = file_name.is_empty()
        || file_name == "."
        || file_name == ".."
        || file_name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(AppError::InvalidInput(format!(
            "Invalid file name: {file_name:?}"
        )));
    }
    Ok(file_name)
}

/// Public URL path under which a stored file is served.
pub fn public_path(prefix: &str, file_name: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), file_name)
}

/// Writes the file into `upload_dir` under its original name, creating the
/// directory first if needed. An existing file with the same name is
/// overwritten.
pub async fn store_file(upload_dir: &Path, file: &UploadedFile) -> Result<PathBuf, AppError> {
    let file_name = validate_file_name(&file.file_name)?;

    fs::create_dir_all(upload_dir).await.map_err(|e| {
        AppError::StorageError(format!("Failed to create upload dir {upload_dir:?}: {e}"))
    })?;

    let target = upload_dir.join(file_name);
    fs::write(&target, &file.bytes)
        .await
        .map_err(|e| AppError::StorageError(format!("Failed to write {target:?}: {e}")))?;

    info!(path = ?target, size = file.bytes.len(), "Stored uploaded file.");
    Ok(target)
}

/// Stores the organizational-structure image and records its public path.
///
/// The file is written before the identity row is touched. If the row update
/// fails the file stays on disk.
pub async fn save_structure_image(
    db: &DatabaseConnection,
    upload_dir: &Path,
    public_prefix: &str,
    file: &UploadedFile,
) -> Result<identitas::Model, AppError> {
    store_file(upload_dir, file).await?;

    let update = IdentityFieldUpdate {
        name: STRUCTURE_IMAGE_KEY.to_string(),
        value: public_path(public_prefix, &file.file_name),
    };
    let mut updated = update_identity_fields(db, std::slice::from_ref(&update))
        .await
        .inspect_err(|e| warn!(error = %e, "Image stored but its path was not recorded."))?;

    updated
        .pop()
        .ok_or_else(|| AppError::InternalServerError("Identity update returned no row".to_string()))
}
