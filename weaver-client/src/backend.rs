//! Backend seam for the workflow store
//!
//! The store never talks HTTP directly; it calls a [`WeaverBackend`]. The
//! production implementation is [`crate::http::HttpBackend`].

use async_trait::async_trait;
use std::path::Path;
use weaver_common::api::{AnalysisResult, MixSelection, ZIP_CONTENT_TYPE};

use crate::error::ClientResult;

/// A user-chosen archive file, held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFile {
    pub file_name: String,
    /// MIME type reported by the picker, if any
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ArchiveFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read a file from disk
    pub async fn from_path(path: &Path) -> ClientResult<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(file_name, bytes))
    }

    /// ZIP by MIME type or by `.zip` extension
    pub fn is_zip(&self) -> bool {
        self.content_type.as_deref() == Some(ZIP_CONTENT_TYPE)
            || self.file_name.to_ascii_lowercase().ends_with(".zip")
    }
}

/// Server operations the workflow needs
#[async_trait]
pub trait WeaverBackend: Send + Sync {
    /// Raw stem entry names in the archive
    async fn upload(&self, file: &ArchiveFile) -> ClientResult<Vec<String>>;

    /// Common stems with per-version scores
    async fn analyze(
        &self,
        stems_a: &[String],
        stems_b: &[String],
    ) -> ClientResult<Vec<AnalysisResult>>;

    /// Mixed archive bytes
    async fn create_mix(
        &self,
        file_a: &ArchiveFile,
        file_b: &ArchiveFile,
        selections: &[MixSelection],
    ) -> ClientResult<Vec<u8>>;
}
