//! Requirement and flat test-case record types
//!
//! A [`TestCaseRecord`] is one (requirement, test case) association, with the
//! requirement's fields denormalised into it. The same `tc_id` appears once
//! per linked requirement.

use crate::error::{ModelError, ModelResult};
use crate::fields::{json_text, opt_text, text};
use crate::status::{RiskLevel, TestStatus};
use crate::tags::ComplianceTags;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Pick the canonical requirement identity
///
/// `primary` (the requirement id) wins when it is non-blank; otherwise the
/// title id is used. Both are trimmed.
#[inline]
#[must_use]
pub fn canonical_key<'a>(primary: &'a str, alias: &'a str) -> &'a str {
    let primary = primary.trim();
    if primary.is_empty() {
        alias.trim()
    } else {
        primary
    }
}

/// Requirement extracted from an uploaded document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Stable requirement id
    #[serde(default)]
    pub requirement_id: String,
    /// Human-facing id (e.g. `REQ-001`), also used as a join key upstream
    #[serde(default)]
    pub req_title_id: String,
    /// Short title
    #[serde(default)]
    pub title: String,
    /// Full requirement text
    #[serde(default)]
    pub description: String,
    /// Source file id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    /// Requirement type (`Functional`, ...)
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Priority label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// Category label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Extraction timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Requirement {
    /// Create requirement with id and title fields
    #[must_use]
    pub fn new(
        requirement_id: impl Into<String>,
        req_title_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            requirement_id: requirement_id.into(),
            req_title_id: req_title_id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Canonical identity (`requirement_id`, else `req_title_id`)
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        canonical_key(&self.requirement_id, &self.req_title_id)
    }

    /// Check whether `id` names this requirement under either key
    #[must_use]
    pub fn answers_to(&self, id: &str) -> bool {
        let id = id.trim();
        !id.is_empty() && (self.requirement_id.trim() == id || self.req_title_id.trim() == id)
    }
}

/// Flat test-case record: one requirement association per record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestCaseRecord {
    /// Test-case id (shared across associations)
    pub tc_id: String,
    /// Test-case title
    pub tc_title: String,
    /// Steps / description
    pub tc_description: String,
    /// Expected result
    pub expected_result: String,
    /// JSON-encoded input data (may be malformed)
    pub input_data: String,
    /// Normalised compliance tags
    pub compliance_tags: ComplianceTags,
    /// Execution status label, if reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Risk label, if reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk: Option<String>,
    /// Requirement id this record links to
    pub req_id: String,
    /// Requirement title id (display alias)
    pub req_title_id: String,
    /// Requirement title
    pub req_title: String,
    /// Requirement description
    pub req_description: String,
    /// Source file id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    /// Creation timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl TestCaseRecord {
    /// Create minimal record linking `tc_id` to `req_id`
    #[must_use]
    pub fn new(tc_id: impl Into<String>, req_id: impl Into<String>) -> Self {
        Self {
            tc_id: tc_id.into(),
            req_id: req_id.into(),
            ..Self::default()
        }
    }

    /// With title
    #[inline]
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.tc_title = title.into();
        self
    }

    /// With status label
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// With compliance tags parsed from delimited text
    #[inline]
    #[must_use]
    pub fn with_tags(mut self, tags: &str) -> Self {
        self.compliance_tags = ComplianceTags::parse(tags);
        self
    }

    /// With requirement display fields
    #[inline]
    #[must_use]
    pub fn with_requirement(
        mut self,
        req_title_id: impl Into<String>,
        req_title: impl Into<String>,
    ) -> Self {
        self.req_title_id = req_title_id.into();
        self.req_title = req_title.into();
        self
    }

    /// With input data text
    #[inline]
    #[must_use]
    pub fn with_input_data(mut self, input_data: impl Into<String>) -> Self {
        self.input_data = input_data.into();
        self
    }

    /// Canonical requirement identity (`req_id`, else `req_title_id`)
    #[inline]
    #[must_use]
    pub fn requirement_key(&self) -> &str {
        canonical_key(&self.req_id, &self.req_title_id)
    }

    /// Status classified into the fixed enumeration
    #[inline]
    #[must_use]
    pub fn classified_status(&self) -> TestStatus {
        self.status
            .as_deref()
            .map_or(TestStatus::NotExecuted, TestStatus::classify)
    }

    /// Risk level, `Low` when absent, `None` when unrecognised
    #[inline]
    #[must_use]
    pub fn risk_level(&self) -> Option<RiskLevel> {
        RiskLevel::parse_lenient(self.risk.as_deref())
    }

    /// Decode one record from a loosely-typed JSON object
    ///
    /// Field aliases are tried in order, so a row carrying both `tc_id` and a
    /// storage `id` keeps `tc_id`.
    ///
    /// # Errors
    /// Returns [`ModelError::NotAnObject`] if `value` is not an object.
    pub fn from_value(value: &Value) -> ModelResult<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| ModelError::not_an_object("test case record", value))?;
        Ok(Self::from_map(map))
    }

    pub(crate) fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            tc_id: text(map, &["tc_id", "tcId", "id"]),
            tc_title: text(map, &["tc_title", "title", "tcTitle"]),
            tc_description: text(map, &["tc_description", "description"]),
            expected_result: text(map, &["expected_result", "expectedResult"]),
            input_data: json_text(map, &["input_data", "inputData"]),
            compliance_tags: crate::fields::first(map, &["compliance_tags", "complianceTags"])
                .map(ComplianceTags::from)
                .unwrap_or_default(),
            status: opt_text(map, &["status"]),
            risk: opt_text(map, &["risk", "Risk"]),
            req_id: text(map, &["req_id", "requirement_id", "reqId", "requirementId"]),
            req_title_id: text(map, &["req_title_id", "reqTitleId"]),
            req_title: text(map, &["req_title"]),
            req_description: text(map, &["req_description", "requirement_description"]),
            file_id: opt_text(map, &["file_id"]),
            created_at: opt_text(map, &["created_at", "createdAt"]),
        }
    }
}

impl<'de> Deserialize<'de> for TestCaseRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}
