//! POST /api/analyze
//!
//! Matches the two stem lists by canonical name and scores each common stem.
//! An empty `data` array means the archives share no stems; the client treats
//! that as a failed analysis.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use weaver_common::api::{AnalysisResult, AnalyzeRequest, ApiResponse};

use crate::error::{ApiError, ApiResult};
use crate::services::analyzer::analyze_stems;
use crate::AppState;

pub const ANALYSIS_FAILED: &str = "Failed to analyze stems.";

pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<Vec<AnalysisResult>>>> {
    let result = run_analysis(&state, payload).await;
    if let Err(ref e) = result {
        state.record_error(e).await;
    }
    result.map(|results| Json(ApiResponse::ok(results)))
}

async fn run_analysis(
    state: &AppState,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Vec<AnalysisResult>> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Malformed analysis request");
        ApiError::BadRequest(ANALYSIS_FAILED.to_string())
    })?;

    let results = analyze_stems(state.scorer.as_ref(), &request.stems_a, &request.stems_b)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Analysis error");
            ApiError::Internal(ANALYSIS_FAILED.to_string())
        })?;

    if results.is_empty() {
        tracing::info!("No common stems between archives");
    }
    Ok(results)
}
