//! Aggregated compliance and risk metrics
//!
//! Normally produced by `GET /jira/compliance-metrics`;
//! [`ComplianceMetrics::from_records`] recomputes the same aggregate from flat
//! records when only the test-case listing is at hand.

use crate::record::TestCaseRecord;
use crate::status::RiskLevel;
use crate::tags::ComplianceTags;
use crate::time::parse_timestamp;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// File id reported for metrics aggregated over every file
pub const ALL_FILES: &str = "all";

fn all_files() -> String {
    ALL_FILES.to_string()
}

/// Open per-test-case record carried by the metrics payload
///
/// Holds at least `compliance_tags`, `risk` and `created_at`; any other keys
/// the backend adds are preserved in arrival order for export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricsRecord(pub Map<String, Value>);

impl MetricsRecord {
    /// Compliance tags, normalised
    #[must_use]
    pub fn tags(&self) -> ComplianceTags {
        self.0
            .get("compliance_tags")
            .map(ComplianceTags::from)
            .unwrap_or_default()
    }

    /// Creation timestamp, if present and non-null
    #[must_use]
    pub fn created_at(&self) -> Option<&str> {
        self.0.get("created_at").and_then(Value::as_str)
    }

    /// Risk label, if present
    #[must_use]
    pub fn risk(&self) -> Option<&str> {
        self.0.get("risk").and_then(Value::as_str)
    }

    /// Raw field map
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Compliance metrics across all uploaded files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceMetrics {
    /// Scope of the aggregate (`"all"`)
    #[serde(default = "all_files")]
    pub file_id: String,
    /// Number of test cases counted
    #[serde(default)]
    pub total_test_cases: u64,
    /// Distinct tags, sorted
    #[serde(default)]
    pub compliance_tags: Vec<String>,
    /// Tag → number of test cases carrying it
    #[serde(default)]
    pub compliance_counts: IndexMap<String, u64>,
    /// Risk level → number of test cases
    #[serde(default)]
    pub risk_counts: IndexMap<String, u64>,
    /// Per-test-case records for client-side filtering
    #[serde(default)]
    pub test_cases: Vec<MetricsRecord>,
    /// Latest creation timestamp seen
    #[serde(default)]
    pub last_updated: Option<String>,
}

impl ComplianceMetrics {
    /// Empty aggregate, shown when the metrics fetch fails
    #[must_use]
    pub fn empty() -> Self {
        Self {
            file_id: all_files(),
            total_test_cases: 0,
            compliance_tags: Vec::new(),
            compliance_counts: IndexMap::new(),
            risk_counts: IndexMap::new(),
            test_cases: Vec::new(),
            last_updated: None,
        }
    }

    /// Check if no test cases were counted
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_test_cases == 0
    }

    /// Recompute the aggregate from flat records
    ///
    /// Risk labels are compared case-insensitively and default to `Low`;
    /// labels outside the four levels are not counted.
    #[must_use]
    pub fn from_records(records: &[TestCaseRecord]) -> Self {
        if records.is_empty() {
            return Self::empty();
        }

        let mut compliance_counts: IndexMap<String, u64> = IndexMap::new();
        let mut risk_counts: IndexMap<String, u64> = RiskLevel::ALL
            .iter()
            .map(|level| (level.as_str().to_string(), 0))
            .collect();
        let mut all_tags = BTreeSet::new();
        let mut latest: Option<(chrono::NaiveDateTime, &str)> = None;
        let mut test_cases = Vec::with_capacity(records.len());

        for record in records {
            for tag in record.compliance_tags.iter() {
                *compliance_counts.entry(tag.to_string()).or_insert(0) += 1;
                all_tags.insert(tag.to_string());
            }

            if let Some(level) = record.risk_level() {
                if let Some(count) = risk_counts.get_mut(level.as_str()) {
                    *count += 1;
                }
            }

            if let Some(raw) = record.created_at.as_deref() {
                if let Some(ts) = parse_timestamp(raw) {
                    if latest.map_or(true, |(best, _)| ts > best) {
                        latest = Some((ts, raw));
                    }
                }
            }

            let mut fields = Map::new();
            fields.insert(
                "compliance_tags".to_string(),
                serde_json::to_value(&record.compliance_tags).unwrap_or(Value::Null),
            );
            fields.insert(
                "risk".to_string(),
                record.risk.clone().map_or(Value::Null, Value::String),
            );
            fields.insert(
                "created_at".to_string(),
                record.created_at.clone().map_or(Value::Null, Value::String),
            );
            test_cases.push(MetricsRecord(fields));
        }

        Self {
            file_id: all_files(),
            total_test_cases: records.len() as u64,
            compliance_tags: all_tags.into_iter().collect(),
            compliance_counts,
            risk_counts,
            test_cases,
            last_updated: latest.map(|(_, raw)| raw.to_string()),
        }
    }
}

impl Default for ComplianceMetrics {
    fn default() -> Self {
        Self::empty()
    }
}
