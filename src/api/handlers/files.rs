//! Uploaded-file listing handler.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};

use crate::types::{AppError, FileInfo, FileListResponse, Result};
use crate::AppState;

/// List uploaded documents.
///
/// Derived from the upload directory's `{uuid}_{filename}` layout; entries
/// that don't match it are skipped.
#[utoipa::path(
    get,
    path = "/files",
    responses(
        (status = 200, description = "Uploaded files", body = FileListResponse),
    ),
    tag = "documents"
)]
pub async fn list_files(State(state): State<AppState>) -> Result<Json<FileListResponse>> {
    let upload_dir = &state.config.storage.upload_dir;
    let mut files = Vec::new();

    if upload_dir.exists() {
        let mut entries = tokio::fs::read_dir(upload_dir)
            .await
            .map_err(|e| AppError::Internal(format!("cannot read upload directory: {e}")))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AppError::Internal(format!("cannot read upload directory: {e}")))?
        {
            let is_file = entry
                .file_type()
                .await
                .map(|kind| kind.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some((id, filename)) = name.split_once('_') {
                let uploaded_at = entry
                    .metadata()
                    .await
                    .ok()
                    .and_then(|meta| meta.modified().ok())
                    .map(DateTime::<Utc>::from);

                files.push(FileInfo {
                    id: id.to_string(),
                    filename: filename.to_string(),
                    uploaded_at,
                });
            }
        }
    }

    Ok(Json(FileListResponse { files }))
}
