//! Request and response bodies for the backend endpoints
//!
//! Responses default every field so that an older or newer backend that adds
//! or drops keys still decodes.

use crate::record::Requirement;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `POST /test-cases/improve` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImproveRequest {
    /// Requirement the test case belongs to
    pub requirement_id: String,
    /// Test case to improve
    pub tc_id: String,
    /// Reviewer guidance for the rewrite
    pub user_input: String,
    /// Current description, when the caller has it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_description: Option<String>,
}

impl ImproveRequest {
    /// Create improve request
    #[must_use]
    pub fn new(
        requirement_id: impl Into<String>,
        tc_id: impl Into<String>,
        user_input: impl Into<String>,
    ) -> Self {
        Self {
            requirement_id: requirement_id.into(),
            tc_id: tc_id.into(),
            user_input: user_input.into(),
            original_description: None,
        }
    }

    /// With the current description
    #[inline]
    #[must_use]
    pub fn with_original(mut self, description: impl Into<String>) -> Self {
        self.original_description = Some(description.into());
        self
    }
}

/// `POST /test-cases/improve` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImproveResponse {
    /// Rewritten description
    #[serde(default)]
    pub improved_description: String,
    /// Status message
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /jira/push` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JiraPushResponse {
    /// Number of test cases pushed
    #[serde(default)]
    pub pushed_count: Option<u64>,
    /// Number of requirement issues created or updated
    #[serde(default)]
    pub requirements_pushed: Option<u64>,
    /// Status message
    #[serde(default)]
    pub message: Option<String>,
    /// Requirement id → issue key
    #[serde(default)]
    pub jira_map: IndexMap<String, String>,
}

impl JiraPushResponse {
    /// Best available pushed count
    #[inline]
    #[must_use]
    pub fn pushed(&self) -> Option<u64> {
        self.pushed_count.or(self.requirements_pushed)
    }
}

/// `POST /files/upload` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Status message
    #[serde(default)]
    pub message: Option<String>,
    /// Ids assigned to the uploaded files
    #[serde(default)]
    pub file_ids: Vec<String>,
    /// Stored file names
    #[serde(default)]
    pub filenames: Vec<String>,
}

/// `GET /files/` entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// File id
    #[serde(default)]
    pub file_id: String,
    /// Original file name
    #[serde(default)]
    pub filename: String,
    /// Processing status label
    #[serde(default)]
    pub status: String,
}

/// `POST /requirements/{file_id}/extract` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResponse {
    /// Status message
    #[serde(default)]
    pub message: String,
    /// Number of requirements extracted
    #[serde(default)]
    pub requirement_count: u64,
    /// Extracted requirements
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

/// Response of the generation endpoints
///
/// Only success matters to callers; the body is kept for logging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Status message
    #[serde(default)]
    pub message: Option<String>,
    /// Remaining fields as sent
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn improve_request_body() {
        let body = serde_json::to_value(ImproveRequest::new("R1", "TC1", "add boundary case")).unwrap();
        assert_eq!(
            body,
            json!({ "requirement_id": "R1", "tc_id": "TC1", "user_input": "add boundary case" })
        );
    }

    #[test]
    fn jira_push_count_fallback() {
        let resp: JiraPushResponse = serde_json::from_value(json!({
            "message": "Successfully pushed 4 test cases to Jira",
            "requirements_pushed": 2,
            "jira_map": { "REQ-001": "HC-1", "REQ-002": "HC-2" }
        }))
        .unwrap();
        assert_eq!(resp.pushed(), Some(2));
        assert_eq!(resp.jira_map.get("REQ-002").map(String::as_str), Some("HC-2"));

        let resp: JiraPushResponse =
            serde_json::from_value(json!({ "pushed_count": 4, "requirements_pushed": 2 })).unwrap();
        assert_eq!(resp.pushed(), Some(4));
    }

    #[test]
    fn generation_response_keeps_extra() {
        let resp: GenerationResponse = serde_json::from_value(json!({
            "message": "Generated 3 test cases",
            "total_testcases_generated": 3
        }))
        .unwrap();
        assert_eq!(resp.extra.get("total_testcases_generated"), Some(&json!(3)));
    }
}
