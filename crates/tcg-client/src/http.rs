//! reqwest implementation of [`TestCaseBackend`]

use crate::backend::{TestCaseBackend, UploadRequest};
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tcg_model::{
    ComplianceMetrics, ExtractionResponse, FileInfo, GenerationResponse, ImproveRequest,
    ImproveResponse, JiraPushResponse, Requirement, TestCasesPayload, UploadResponse,
};

/// Backend reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    root: String,
}

impl HttpBackend {
    /// Create backend for `config`
    ///
    /// # Errors
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            root: config.api_root(),
        })
    }

    /// Create backend around an existing client
    #[must_use]
    pub fn with_client(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            root: config.api_root(),
        }
    }

    /// Absolute URL of an endpoint path
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.root, path)
    }

    /// Absolute URL of an endpoint built from segments, each percent-encoded
    ///
    /// # Errors
    /// Returns [`ApiError::InvalidUrl`] if the API root is not a base URL.
    pub fn segment_url(&self, segments: &[&str]) -> ApiResult<Url> {
        let invalid = |reason: String| ApiError::InvalidUrl {
            url: self.root.clone(),
            reason,
        };
        let mut url = Url::parse(&self.root).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_text(&self, path: &str) -> ApiResult<String> {
        tracing::debug!(path, "GET");
        let response = self.client.get(self.url(path)).send().await?;
        read_body(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let body = self.get_text(path).await?;
        decode(path, &body)
    }

    async fn post_json<T, B>(&self, path: &str, body: Option<&B>) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        tracing::debug!(path, "POST");
        let mut request = self.client.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let text = read_body(request.send().await?).await?;
        decode(path, &text)
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.post_json::<T, Value>(path, None).await
    }

    async fn post_segments<T: DeserializeOwned>(&self, segments: &[&str]) -> ApiResult<T> {
        let url = self.segment_url(segments)?;
        let endpoint = url.path().to_string();
        tracing::debug!(path = %endpoint, "POST");
        let text = read_body(self.client.post(url).send().await?).await?;
        decode(&endpoint, &text)
    }
}

/// Body text of a successful response, or the mapped error
async fn read_body(response: Response) -> ApiResult<String> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        let message = error_message(status, &body);
        tracing::warn!(status = status.as_u16(), %message, "backend returned error");
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> ApiResult<T> {
    // Some handlers answer 200 with an empty body
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::decode(endpoint, e))
}

/// Best-effort message for a failed response
///
/// Uses the JSON body's `detail` or `message` field, falling back to the
/// canonical status text.
#[must_use]
pub fn error_message(status: StatusCode, body: &str) -> String {
    let from_body = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        ["detail", "message"].into_iter().find_map(|key| match value.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(Value::String(_)) => None,
            Some(other) => Some(other.to_string()),
        })
    });
    from_body.unwrap_or_else(|| {
        status
            .canonical_reason()
            .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_string)
    })
}

async fn file_part(path: &Path) -> ApiResult<Part> {
    let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Part::bytes(bytes).file_name(name))
}

#[async_trait::async_trait]
impl TestCaseBackend for HttpBackend {
    async fn list_requirements(&self) -> ApiResult<Vec<Requirement>> {
        let requirements: Option<Vec<Requirement>> = self.get_json("/requirements/").await?;
        Ok(requirements.unwrap_or_default())
    }

    async fn list_test_cases(&self) -> ApiResult<TestCasesPayload> {
        let path = "/test-cases/";
        let body = self.get_text(path).await?;
        let body = if body.trim().is_empty() { "null" } else { &body };
        let payload = TestCasesPayload::from_json(body).map_err(|e| ApiError::decode(path, e))?;
        tracing::debug!(records = payload.record_count(), "fetched test cases");
        Ok(payload)
    }

    async fn generate_for_requirement(&self, requirement_id: String) -> ApiResult<GenerationResponse> {
        tracing::info!(%requirement_id, "generating test cases");
        let response: Option<GenerationResponse> = self
            .post_segments(&["test-cases", "generate", "requirement", requirement_id.as_str()])
            .await?;
        Ok(response.unwrap_or_default())
    }

    async fn generate_for_file(&self, file_id: String) -> ApiResult<GenerationResponse> {
        tracing::info!(%file_id, "generating test cases for file");
        let response: Option<GenerationResponse> = self
            .post_segments(&["test-cases", "generate", "file", file_id.as_str()])
            .await?;
        Ok(response.unwrap_or_default())
    }

    async fn improve_test_case(&self, request: ImproveRequest) -> ApiResult<ImproveResponse> {
        tracing::info!(tc_id = %request.tc_id, "improving test case");
        self.post_json("/test-cases/improve", Some(&request)).await
    }

    async fn push_to_jira(&self) -> ApiResult<JiraPushResponse> {
        tracing::info!("pushing test cases to jira");
        let response: Option<JiraPushResponse> = self.post_empty("/jira/push").await?;
        Ok(response.unwrap_or_default())
    }

    async fn compliance_metrics(&self) -> ApiResult<ComplianceMetrics> {
        let metrics: Option<ComplianceMetrics> = self.get_json("/jira/compliance-metrics").await?;
        Ok(metrics.unwrap_or_default())
    }

    async fn upload_files(&self, request: UploadRequest) -> ApiResult<UploadResponse> {
        let mut form = Form::new();
        for path in &request.requirement_files {
            form = form.part("requirement_files", file_part(path).await?);
        }
        for path in &request.input_files {
            form = form.part("input_files", file_part(path).await?);
        }
        tracing::info!(
            requirement_files = request.requirement_files.len(),
            input_files = request.input_files.len(),
            "uploading files"
        );

        let path = "/files/upload";
        let response = self.client.post(self.url(path)).multipart(form).send().await?;
        let body = read_body(response).await?;
        let response: Option<UploadResponse> = decode(path, &body)?;
        Ok(response.unwrap_or_default())
    }

    async fn list_files(&self) -> ApiResult<Vec<FileInfo>> {
        let files: Option<Vec<FileInfo>> = self.get_json("/files/").await?;
        Ok(files.unwrap_or_default())
    }

    async fn extract_requirements(&self, file_id: String) -> ApiResult<ExtractionResponse> {
        tracing::info!(%file_id, "extracting requirements");
        let response: Option<ExtractionResponse> = self
            .post_segments(&["requirements", file_id.as_str(), "extract"])
            .await?;
        Ok(response.unwrap_or_default())
    }
}
