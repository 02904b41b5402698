//! The backend REST surface as an async trait
//!
//! [`HttpBackend`](crate::HttpBackend) is the production implementation;
//! tests drive the dashboard through a mock.

use crate::error::ApiResult;
use std::path::PathBuf;
use tcg_model::{
    ComplianceMetrics, ExtractionResponse, FileInfo, GenerationResponse, ImproveRequest,
    ImproveResponse, JiraPushResponse, Requirement, TestCasesPayload, UploadResponse,
};

/// Files for one `POST /files/upload`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadRequest {
    /// Sent as `requirement_files` parts
    pub requirement_files: Vec<PathBuf>,
    /// Sent as `input_files` parts
    pub input_files: Vec<PathBuf>,
}

impl UploadRequest {
    /// Create empty upload
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a requirement document
    #[inline]
    #[must_use]
    pub fn with_requirement_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.requirement_files.push(path.into());
        self
    }

    /// With an input data file
    #[inline]
    #[must_use]
    pub fn with_input_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_files.push(path.into());
        self
    }

    /// Check if there is nothing to send
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requirement_files.is_empty() && self.input_files.is_empty()
    }
}

/// Test-case generation backend
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TestCaseBackend: Send + Sync {
    /// `GET /requirements/`
    async fn list_requirements(&self) -> ApiResult<Vec<Requirement>>;

    /// `GET /test-cases/`, in either layout
    async fn list_test_cases(&self) -> ApiResult<TestCasesPayload>;

    /// `POST /test-cases/generate/requirement/{id}`
    async fn generate_for_requirement(&self, requirement_id: String) -> ApiResult<GenerationResponse>;

    /// `POST /test-cases/generate/file/{file_id}`
    async fn generate_for_file(&self, file_id: String) -> ApiResult<GenerationResponse>;

    /// `POST /test-cases/improve`
    async fn improve_test_case(&self, request: ImproveRequest) -> ApiResult<ImproveResponse>;

    /// `POST /jira/push`
    async fn push_to_jira(&self) -> ApiResult<JiraPushResponse>;

    /// `GET /jira/compliance-metrics`
    async fn compliance_metrics(&self) -> ApiResult<ComplianceMetrics>;

    /// `POST /files/upload` (multipart)
    async fn upload_files(&self, request: UploadRequest) -> ApiResult<UploadResponse>;

    /// `GET /files/`
    async fn list_files(&self) -> ApiResult<Vec<FileInfo>>;

    /// `POST /requirements/{file_id}/extract`
    async fn extract_requirements(&self, file_id: String) -> ApiResult<ExtractionResponse>;
}
