//! Shared API request/response types
//!
//! Every JSON response is wrapped in the [`ApiResponse`] envelope:
//! `{"success": true, "data": ...}` or `{"success": false, "error": "..."}`.

use serde::{Deserialize, Serialize};

use crate::stems::{StemScores, Version};

// ========================================
// Envelope
// ========================================

/// Response envelope for all JSON endpoints
///
/// # Examples
///
/// ```
/// use weaver_common::api::types::ApiResponse;
///
/// let ok = ApiResponse::ok(vec!["kick".to_string()]);
/// assert!(ok.success);
///
/// let err = ApiResponse::<()>::failure("No file uploaded.");
/// assert_eq!(err.error.as_deref(), Some("No file uploaded."));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Payload of a successful response, or the reported error
    pub fn into_result(self) -> std::result::Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err("Response carried no data".to_string()),
            (false, _) => Err(self
                .error
                .unwrap_or_else(|| "Request failed".to_string())),
        }
    }
}

// ========================================
// Upload
// ========================================

/// POST /api/upload response data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadData {
    /// Raw entry names of the stem files in the archive
    pub stems: Vec<String>,
}

// ========================================
// Analysis
// ========================================

/// POST /api/analyze request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub stems_a: Vec<String>,
    pub stems_b: Vec<String>,
}

/// One matched stem with its per-version scores
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub name: String,
    pub scores: StemScores,
}

// ========================================
// Mix
// ========================================

/// One entry of the `selections` multipart field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixSelection {
    pub name: String,
    pub selected_version: Version,
}

impl MixSelection {
    pub fn new(name: impl Into<String>, selected_version: Version) -> Self {
        Self {
            name: name.into(),
            selected_version,
        }
    }
}

// ========================================
// Tests
// ========================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_request_uses_camel_case() {
        let json = r#"{"stemsA": ["kick.wav"], "stemsB": ["kick.mp3", "hats.wav"]}"#;
        let request: AnalyzeRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.stems_a, vec!["kick.wav"]);
        assert_eq!(request.stems_b.len(), 2);
    }

    #[test]
    fn test_selection_wire_format() {
        let selection = MixSelection::new("kick", Version::B);
        let json = serde_json::to_value(&selection).unwrap();

        assert_eq!(json, serde_json::json!({"name": "kick", "selectedVersion": "B"}));
    }

    #[test]
    fn test_selection_rejects_unknown_version() {
        let json = r#"[{"name": "kick", "selectedVersion": "C"}]"#;
        assert!(serde_json::from_str::<Vec<MixSelection>>(json).is_err());
    }

    #[test]
    fn test_failure_envelope_omits_data() {
        let json = serde_json::to_value(ApiResponse::<UploadData>::failure("nope")).unwrap();

        assert_eq!(json, serde_json::json!({"success": false, "error": "nope"}));
    }

    #[test]
    fn test_analysis_envelope_round_trip() {
        let json = r#"{"success": true, "data": [{"name": "kick", "scores": {"A": 91, "B": 84}}]}"#;
        let response: ApiResponse<Vec<AnalysisResult>> = serde_json::from_str(json).unwrap();
        let data = response.into_result().unwrap();

        assert_eq!(data[0].name, "kick");
        assert_eq!(data[0].scores, StemScores::new(91, 84));
    }

    fn decode<T: serde::de::DeserializeOwned>(json: &str) -> ApiResponse<T> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_generic_decode_without_default_payload() {
        let response: ApiResponse<UploadData> = decode(r#"{"success": true, "data": {"stems": []}}"#);
        assert_eq!(response.into_result().unwrap(), UploadData { stems: vec![] });

        let response: ApiResponse<AnalysisResult> = decode(r#"{"success": false, "error": "x"}"#);
        assert!(response.data.is_none());
        assert_eq!(response.error.as_deref(), Some("x"));
    }

    #[test]
    fn test_into_result_reports_error() {
        let json = r#"{"success": false, "error": "Failed to analyze stems."}"#;
        let response: ApiResponse<Vec<AnalysisResult>> = serde_json::from_str(json).unwrap();

        assert_eq!(response.into_result().unwrap_err(), "Failed to analyze stems.");
    }
}
