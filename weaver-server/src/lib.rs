//! weaver-server library interface for testing
//!
//! Exposes the application state and router so integration tests can drive
//! the HTTP API without binding a socket.

pub mod api;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use uuid::Uuid;
use weaver_common::config::ServerConfig;

use crate::services::analyzer::{RandomScorer, StemScorer};

/// Request outcome counters reported by /health
#[derive(Debug, Default)]
pub struct ServiceStats {
    pub failed_requests: AtomicU64,
    pub mixes_created: AtomicU64,
    pub last_mix_id: RwLock<Option<Uuid>>,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Produces the per-version quality scores
    pub scorer: Arc<dyn StemScorer>,
    /// Largest accepted request body
    pub max_upload_bytes: usize,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
    pub stats: Arc<ServiceStats>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        let scorer = RandomScorer::new(Duration::from_millis(config.analysis_delay_ms));
        Self {
            scorer: Arc::new(scorer),
            max_upload_bytes: config.max_upload_bytes,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
            stats: Arc::new(ServiceStats::default()),
        }
    }

    /// Replace the scorer (tests use a deterministic one)
    pub fn with_scorer(mut self, scorer: Arc<dyn StemScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Remember an error for /health
    pub async fn record_error(&self, error: &ApiError) {
        self.stats.failed_requests.fetch_add(1, Ordering::Relaxed);
        *self.last_error.write().await = Some(error.to_string());
    }

    pub async fn record_mix(&self, mix_id: Uuid) {
        self.stats.mixes_created.fetch_add(1, Ordering::Relaxed);
        *self.stats.last_mix_id.write().await = Some(mix_id);
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .merge(api::stem_routes())
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
