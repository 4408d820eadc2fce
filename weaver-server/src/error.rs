//! Error types for weaver-server
//!
//! Every failure renders as the shared JSON envelope
//! `{"success": false, "error": "<message>"}`. Messages are user-facing;
//! underlying causes are logged by the handler before conversion.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use weaver_common::api::ApiResponse;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Request body over the configured limit (413)
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// weaver-common error
    #[error("Common error: {0}")]
    Common(#[from] weaver_common::Error),
}

impl ApiError {
    /// Map a multipart read failure, keeping the size-limit case distinct
    pub fn from_multipart(err: MultipartError, message: &str) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge("Upload exceeds the size limit.".to_string())
        } else {
            ApiError::BadRequest(message.to_string())
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) | ApiError::Common(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the user
    pub fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::Internal(msg) => msg.clone(),
            ApiError::Common(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiResponse::<()>::failure(self.message()));
        (self.status(), body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Common(weaver_common::Error::Internal("x".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_message_is_unprefixed() {
        assert_eq!(
            ApiError::BadRequest("No file uploaded.".into()).message(),
            "No file uploaded."
        );
    }
}
