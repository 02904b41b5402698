//! Execution status and risk level enumerations

use serde::{Deserialize, Serialize};
use std::fmt;

/// Execution status of a test case
///
/// The status tally is over this fixed set; anything else the backend sends
/// is counted as [`TestStatus::NotExecuted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TestStatus {
    /// Test ran and passed
    Passed,
    /// Test ran and failed
    Failed,
    /// Test could not run
    Blocked,
    /// Test has not run (also the bucket for unknown statuses)
    #[serde(rename = "Not Executed")]
    NotExecuted,
}

impl TestStatus {
    /// All statuses in display order
    pub const ALL: [TestStatus; 4] = [
        TestStatus::Passed,
        TestStatus::Failed,
        TestStatus::Blocked,
        TestStatus::NotExecuted,
    ];

    /// Label shown when a test case carries no status at all
    pub const DEFAULT_LABEL: &'static str = "Not Executed";

    /// Display label
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TestStatus::Passed => "Passed",
            TestStatus::Failed => "Failed",
            TestStatus::Blocked => "Blocked",
            TestStatus::NotExecuted => Self::DEFAULT_LABEL,
        }
    }

    /// Classify a raw status label; unknown labels fold into `NotExecuted`
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        match raw.trim() {
            "Passed" => TestStatus::Passed,
            "Failed" => TestStatus::Failed,
            "Blocked" => TestStatus::Blocked,
            _ => TestStatus::NotExecuted,
        }
    }

    /// Position within [`TestStatus::ALL`]
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            TestStatus::Passed => 0,
            TestStatus::Failed => 1,
            TestStatus::Blocked => 2,
            TestStatus::NotExecuted => 3,
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk level assigned to a generated test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Critical risk
    Critical,
    /// High risk
    High,
    /// Medium risk
    Medium,
    /// Low risk (default)
    Low,
}

impl RiskLevel {
    /// All levels in display order
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Critical,
        RiskLevel::High,
        RiskLevel::Medium,
        RiskLevel::Low,
    ];

    /// Display label
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Critical => "Critical",
            RiskLevel::High => "High",
            RiskLevel::Medium => "Medium",
            RiskLevel::Low => "Low",
        }
    }

    /// Parse a raw label case-insensitively; `None` or blank means `Low`
    ///
    /// Returns `None` for labels outside the enumeration.
    #[must_use]
    pub fn parse_lenient(raw: Option<&str>) -> Option<Self> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty());
        let Some(raw) = raw else {
            return Some(RiskLevel::Low);
        };
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(raw))
    }
}

impl Default for RiskLevel {
    fn default() -> Self {
        RiskLevel::Low
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
