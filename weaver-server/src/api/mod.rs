//! HTTP API handlers for weaver-server
//!
//! - POST /api/upload: list the stems of one archive
//! - POST /api/analyze: match and score two stem lists
//! - POST /api/create-mix: assemble the mixed archive
//! - GET /health

pub mod analyze;
pub mod health;
pub mod mix;
pub mod upload;

pub use analyze::analyze;
pub use health::health_routes;
pub use mix::create_mix;
pub use upload::upload_archive;

use axum::{routing::post, Router};
use weaver_common::api::{ANALYZE_PATH, CREATE_MIX_PATH, UPLOAD_PATH};

use crate::AppState;

/// Build stem workflow routes
pub fn stem_routes() -> Router<AppState> {
    Router::new()
        .route(UPLOAD_PATH, post(upload_archive))
        .route(ANALYZE_PATH, post(analyze))
        .route(CREATE_MIX_PATH, post(create_mix))
}
