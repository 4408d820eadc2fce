//! HTTP implementation of [`WeaverBackend`]

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use weaver_common::api::{
    AnalysisResult, AnalyzeRequest, ApiResponse, MixSelection, UploadData, ANALYZE_PATH,
    CREATE_MIX_PATH, FIELD_FILE, FIELD_FILE_A, FIELD_FILE_B, FIELD_SELECTIONS, UPLOAD_PATH,
    ZIP_CONTENT_TYPE,
};

use crate::backend::{ArchiveFile, WeaverBackend};
use crate::error::{ClientError, ClientResult};

/// Talks to a weaver-server instance
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// `base_url` without trailing slash, e.g. "http://127.0.0.1:5790"
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn archive_part(file: &ArchiveFile) -> ClientResult<Part> {
    let content_type = file.content_type.as_deref().unwrap_or(ZIP_CONTENT_TYPE);
    Ok(Part::bytes(file.bytes.clone())
        .file_name(file.file_name.clone())
        .mime_str(content_type)?)
}

/// Decode the JSON envelope, turning `success: false` into an error
async fn read_envelope<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    let body = response.bytes().await?;
    decode_envelope(status, &body)
}

fn decode_envelope<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> ClientResult<T> {
    let envelope: ApiResponse<T> = serde_json::from_slice(body).map_err(|e| {
        if status.is_success() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Api {
                status: status.as_u16(),
                message: String::from_utf8_lossy(body).into_owned(),
            }
        }
    })?;

    envelope.into_result().map_err(|message| ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl WeaverBackend for HttpBackend {
    async fn upload(&self, file: &ArchiveFile) -> ClientResult<Vec<String>> {
        let form = Form::new().part(FIELD_FILE, archive_part(file)?);
        let response = self
            .client
            .post(self.url(UPLOAD_PATH))
            .multipart(form)
            .send()
            .await?;

        let data: UploadData = read_envelope(response).await?;
        tracing::debug!(file = %file.file_name, stems = data.stems.len(), "Upload response");
        Ok(data.stems)
    }

    async fn analyze(
        &self,
        stems_a: &[String],
        stems_b: &[String],
    ) -> ClientResult<Vec<AnalysisResult>> {
        let request = AnalyzeRequest {
            stems_a: stems_a.to_vec(),
            stems_b: stems_b.to_vec(),
        };
        let response = self
            .client
            .post(self.url(ANALYZE_PATH))
            .json(&request)
            .send()
            .await?;

        read_envelope(response).await
    }

    async fn create_mix(
        &self,
        file_a: &ArchiveFile,
        file_b: &ArchiveFile,
        selections: &[MixSelection],
    ) -> ClientResult<Vec<u8>> {
        let selections_json =
            serde_json::to_string(selections).map_err(|e| ClientError::Decode(e.to_string()))?;
        let form = Form::new()
            .part(FIELD_FILE_A, archive_part(file_a)?)
            .part(FIELD_FILE_B, archive_part(file_b)?)
            .text(FIELD_SELECTIONS, selections_json);

        let response = self
            .client
            .post(self.url(CREATE_MIX_PATH))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await?;
            let message = serde_json::from_slice::<ApiResponse<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.error)
                .unwrap_or_else(|| String::from_utf8_lossy(&body).into_owned());
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
