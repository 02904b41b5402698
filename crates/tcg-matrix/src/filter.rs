//! Live filtering of grouped test cases
//!
//! Every active predicate must hold (AND). Unset and empty predicates match
//! everything, so the default filter returns the full list in order.

use crate::matrix::{MatrixModel, MatrixTestCase};
use serde::{Deserialize, Serialize};

/// Filter values the matrix screen exposes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixFilter {
    /// Case-insensitive substring of `tc_id` or `tc_title`
    #[serde(default)]
    pub search: String,
    /// Exact effective status
    #[serde(default)]
    pub status: Option<String>,
    /// Compliance tag any detail must carry
    #[serde(default)]
    pub compliance: Option<String>,
    /// Requirement key any detail must link to
    #[serde(default)]
    pub highlighted_requirement: Option<String>,
}

impl MatrixFilter {
    /// Create filter that matches everything
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With search text
    #[inline]
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// With status filter
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// With compliance tag filter
    #[inline]
    #[must_use]
    pub fn with_compliance(mut self, tag: impl Into<String>) -> Self {
        self.compliance = Some(tag.into());
        self
    }

    /// With highlighted requirement
    #[inline]
    #[must_use]
    pub fn with_highlight(mut self, req_id: impl Into<String>) -> Self {
        self.highlighted_requirement = Some(req_id.into());
        self
    }

    /// Check if no predicate is active
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.search.trim().is_empty()
            && active(self.status.as_deref()).is_none()
            && active(self.compliance.as_deref()).is_none()
            && active(self.highlighted_requirement.as_deref()).is_none()
    }

    /// Check a single test case against every active predicate
    #[must_use]
    pub fn matches(&self, tc: &MatrixTestCase) -> bool {
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty()
            && !tc.tc_id.to_lowercase().contains(&needle)
            && !tc.tc_title.to_lowercase().contains(&needle)
        {
            return false;
        }

        if let Some(status) = active(self.status.as_deref()) {
            if tc.effective_status() != status {
                return false;
            }
        }

        if let Some(tag) = active(self.compliance.as_deref()) {
            if !tc.details.iter().any(|d| d.compliance_tags.contains(tag)) {
                return false;
            }
        }

        if let Some(req_id) = active(self.highlighted_requirement.as_deref()) {
            if !tc.links(req_id) {
                return false;
            }
        }

        true
    }
}

fn active(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Test cases passing `filter`, in model order
#[must_use]
pub fn filter_test_cases<'a>(model: &'a MatrixModel, filter: &MatrixFilter) -> Vec<&'a MatrixTestCase> {
    model
        .test_cases()
        .iter()
        .filter(|tc| filter.matches(tc))
        .collect()
}
