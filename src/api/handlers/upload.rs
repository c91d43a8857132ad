//! Document upload and ingestion handler.

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::path::Path;
use std::time::Instant;
use uuid::Uuid;

use crate::extract;
use crate::types::{AppError, Result, UploadResponse};
use crate::AppState;

/// Upload formats the extraction layer understands.
const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "txt", "md", "docx", "png", "jpg", "jpeg"];

/// Upload a document, extract its text, and ingest it.
///
/// The raw file is persisted as `{document_id}_{filename}` before
/// extraction; if extraction or ingestion fails the file is removed again
/// and the failure reason is returned. Ingestion is all-or-nothing, so a
/// rejected upload leaves no partial records behind.
#[utoipa::path(
    post,
    path = "/upload",
    responses(
        (status = 200, description = "Document ingested", body = UploadResponse),
        (status = 400, description = "Unsupported file type or empty document"),
        (status = 503, description = "Model endpoint unreachable"),
    ),
    tag = "documents"
)]
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let start = Instant::now();

    // First file field wins; anything else in the body is ignored.
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("malformed multipart body: {e}")))?
    {
        if let Some(filename) = field.file_name().map(str::to_string) {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(format!("failed to read upload: {e}")))?;
            upload = Some((filename, data));
            break;
        }
    }

    let (filename, data) =
        upload.ok_or_else(|| AppError::InvalidInput("no file field in upload".to_string()))?;

    let extension = extract::extension_of(&filename);
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::InvalidInput(format!(
            "file type .{extension} not supported"
        )));
    }

    let document_id = Uuid::new_v4().to_string();
    let upload_dir = &state.config.storage.upload_dir;
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::Internal(format!("cannot create upload directory: {e}")))?;

    let path = upload_dir.join(format!("{document_id}_{}", sanitize_filename(&filename)));
    tokio::fs::write(&path, &data)
        .await
        .map_err(|e| AppError::Internal(format!("cannot persist upload: {e}")))?;

    match process_upload(&state, &document_id, &filename, &data).await {
        Ok(chunks_indexed) => {
            tracing::info!(
                document_id = %document_id,
                filename = %filename,
                chunks = chunks_indexed,
                duration_ms = start.elapsed().as_millis() as u64,
                "file uploaded and indexed"
            );

            Ok(Json(UploadResponse {
                status: "success".to_string(),
                file_id: document_id,
                filename,
                chunks_indexed,
            }))
        }
        Err(e) => {
            // The document was rejected; don't keep the raw file around.
            if let Err(remove) = tokio::fs::remove_file(&path).await {
                tracing::warn!(
                    path = %path.display(),
                    error = %remove,
                    "failed to remove rejected upload"
                );
            }
            Err(e)
        }
    }
}

async fn process_upload(
    state: &AppState,
    document_id: &str,
    filename: &str,
    data: &[u8],
) -> Result<usize> {
    let text = extract::extract_text(data, filename, &state.ollama).await?;
    if text.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "no text content extracted from file".to_string(),
        ));
    }
    state.ingestion.ingest(document_id, &text, filename).await
}

/// Keep only the final path component of a client-supplied filename.
fn sanitize_filename(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}
