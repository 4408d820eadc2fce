//! API module for the shared HTTP contract
//!
//! Endpoint paths, multipart field names and JSON types used by both
//! weaver-server (producer) and weaver-client (consumer).
//!
//! # Design Principle
//!
//! This module contains ONLY:
//! - Pure data types (no HTTP framework dependencies)
//! - Constants naming the wire contract

pub mod types;

pub use types::{
    AnalysisResult, AnalyzeRequest, ApiResponse, MixSelection, UploadData,
};

/// POST, multipart field [`FIELD_FILE`]
pub const UPLOAD_PATH: &str = "/api/upload";
/// POST, JSON [`AnalyzeRequest`]
pub const ANALYZE_PATH: &str = "/api/analyze";
/// POST, multipart fields [`FIELD_FILE_A`], [`FIELD_FILE_B`], [`FIELD_SELECTIONS`]
pub const CREATE_MIX_PATH: &str = "/api/create-mix";

pub const FIELD_FILE: &str = "file";
pub const FIELD_FILE_A: &str = "fileA";
pub const FIELD_FILE_B: &str = "fileB";
pub const FIELD_SELECTIONS: &str = "selections";

/// File name offered for the mixed archive download
pub const MIX_FILE_NAME: &str = "StemWeaver_Mix.zip";

pub const ZIP_CONTENT_TYPE: &str = "application/zip";
