//! GET /health
//!
//! Liveness plus a few counters: failed requests, mixes built and the id of
//! the most recent mix (matches the `mix_id` field in the logs).

use std::sync::atomic::Ordering;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::AppState;

const MODULE_NAME: &str = "weaver-server";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub failed_requests: u64,
    pub mixes_created: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_mix_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime_seconds = Utc::now()
        .signed_duration_since(state.startup_time)
        .num_seconds()
        .max(0) as u64;
    let failed_requests = state.stats.failed_requests.load(Ordering::Relaxed);

    Json(HealthResponse {
        status: "ok",
        module: MODULE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds,
        failed_requests,
        mixes_created: state.stats.mixes_created.load(Ordering::Relaxed),
        last_mix_id: *state.stats.last_mix_id.read().await,
        last_error: state.last_error.read().await.clone(),
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
