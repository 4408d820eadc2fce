//! POST /api/upload
//!
//! Accepts one ZIP in the multipart field `file` and returns the raw names of
//! the stem files it contains.

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    Json,
};
use weaver_common::api::{ApiResponse, UploadData, FIELD_FILE};

use crate::error::{ApiError, ApiResult};
use crate::services::archive;
use crate::AppState;

pub const NO_FILE: &str = "No file uploaded.";
pub const UNREADABLE_ZIP: &str = "Failed to process ZIP file.";

pub async fn upload_archive(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<ApiResponse<UploadData>>> {
    let result = list_uploaded_stems(multipart).await;
    if let Err(ref e) = result {
        state.record_error(e).await;
    }
    result.map(|stems| Json(ApiResponse::ok(UploadData { stems })))
}

async fn list_uploaded_stems(mut multipart: Multipart) -> ApiResult<Vec<String>> {
    let mut file: Option<Bytes> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::from_multipart(e, NO_FILE))?
    {
        if field.name() == Some(FIELD_FILE) {
            let file_name = field.file_name().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::from_multipart(e, NO_FILE))?;
            tracing::debug!(file_name = ?file_name, size = bytes.len(), "Received upload");
            file = Some(bytes);
        }
    }

    let bytes = file.ok_or_else(|| ApiError::BadRequest(NO_FILE.to_string()))?;
    let size = bytes.len();

    let stems = tokio::task::spawn_blocking(move || archive::list_stems(&bytes))
        .await
        .map_err(|e| ApiError::Internal(format!("Upload task failed: {}", e)))?
        .map_err(|e| {
            tracing::error!(error = %e, size, "Upload error");
            ApiError::Internal(UNREADABLE_ZIP.to_string())
        })?;

    tracing::info!(size, stem_count = stems.len(), "Archive uploaded");
    Ok(stems)
}
