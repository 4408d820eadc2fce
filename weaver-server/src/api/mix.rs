//! POST /api/create-mix
//!
//! Multipart fields `fileA`, `fileB` (the two source archives) and
//! `selections` (JSON array of `{name, selectedVersion}`). Responds with the
//! mixed archive as an attachment.

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
};
use uuid::Uuid;
use weaver_common::api::{
    MixSelection, FIELD_FILE_A, FIELD_FILE_B, FIELD_SELECTIONS, MIX_FILE_NAME, ZIP_CONTENT_TYPE,
};

use crate::error::{ApiError, ApiResult};
use crate::services::mixer;
use crate::AppState;

pub const MISSING_DATA: &str = "Missing required data.";
pub const INVALID_SELECTIONS: &str = "Invalid selections.";
pub const MIX_FAILED: &str = "Failed to create mix.";

/// Parsed create-mix form
struct MixRequest {
    archive_a: Bytes,
    archive_b: Bytes,
    selections: Vec<MixSelection>,
}

pub async fn create_mix(State(state): State<AppState>, multipart: Multipart) -> ApiResult<Response> {
    let mix_id = Uuid::new_v4();
    let result = build_mix(mix_id, multipart).await;
    match &result {
        Ok(_) => state.record_mix(mix_id).await,
        Err(e) => state.record_error(e).await,
    }

    let bytes = result?;
    Ok((
        [
            (header::CONTENT_TYPE, ZIP_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", MIX_FILE_NAME),
            ),
        ],
        bytes,
    )
        .into_response())
}

async fn build_mix(mix_id: Uuid, multipart: Multipart) -> ApiResult<Vec<u8>> {
    let request = read_mix_request(multipart).await?;
    let selection_count = request.selections.len();

    let output = tokio::task::spawn_blocking(move || {
        mixer::create_mix(&request.archive_a, &request.archive_b, &request.selections)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Mix task failed: {}", e)))?
    .map_err(|e| {
        tracing::error!(mix_id = %mix_id, error = %e, "Mix creation error");
        ApiError::Internal(MIX_FAILED.to_string())
    })?;

    if !output.skipped.is_empty() {
        tracing::warn!(mix_id = %mix_id, skipped = ?output.skipped, "Selections without a matching entry");
    }
    tracing::info!(
        mix_id = %mix_id,
        selections = selection_count,
        entries = output.entries.len(),
        size = output.bytes.len(),
        "Mix created"
    );

    Ok(output.bytes)
}

async fn read_mix_request(mut multipart: Multipart) -> ApiResult<MixRequest> {
    let mut archive_a = None;
    let mut archive_b = None;
    let mut selections_json = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::from_multipart(e, MISSING_DATA))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FIELD_FILE_A) => {
                archive_a = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::from_multipart(e, MISSING_DATA))?,
                );
            }
            Some(FIELD_FILE_B) => {
                archive_b = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::from_multipart(e, MISSING_DATA))?,
                );
            }
            Some(FIELD_SELECTIONS) => {
                selections_json = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::from_multipart(e, MISSING_DATA))?,
                );
            }
            _ => {}
        }
    }

    let (Some(archive_a), Some(archive_b), Some(selections_json)) =
        (archive_a, archive_b, selections_json)
    else {
        return Err(ApiError::BadRequest(MISSING_DATA.to_string()));
    };

    let selections: Vec<MixSelection> = serde_json::from_str(&selections_json).map_err(|e| {
        tracing::warn!(error = %e, "Malformed selections");
        ApiError::BadRequest(INVALID_SELECTIONS.to_string())
    })?;

    Ok(MixRequest {
        archive_a,
        archive_b,
        selections,
    })
}
