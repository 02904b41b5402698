//! Compliance metrics view
//!
//! Client-side filtering over the per-test-case records of a
//! [`ComplianceMetrics`] aggregate, plus the percentage cards.

use crate::error::MatrixError;
use crate::matrix::rounded_percent;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tcg_model::{parse_date, ComplianceMetrics, MetricsRecord};

/// Time window over `created_at`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum TimeWindow {
    /// No restriction
    #[default]
    All,
    /// Up to 7 days old
    Last7Days,
    /// Up to 30 days old
    Last30Days,
    /// Up to 90 days old
    Last90Days,
    /// Up to 365 days old
    LastYear,
}

impl TimeWindow {
    /// All windows, narrowest last
    pub const ALL: [Self; 5] = [
        Self::All,
        Self::Last7Days,
        Self::Last30Days,
        Self::Last90Days,
        Self::LastYear,
    ];

    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Last7Days => "7days",
            Self::Last30Days => "30days",
            Self::Last90Days => "90days",
            Self::LastYear => "year",
        }
    }

    /// Maximum age in days, `None` for [`TimeWindow::All`]
    #[must_use]
    pub fn threshold_days(self) -> Option<i64> {
        match self {
            Self::All => None,
            Self::Last7Days => Some(7),
            Self::Last30Days => Some(30),
            Self::Last90Days => Some(90),
            Self::LastYear => Some(365),
        }
    }

    /// Check whether a record created at `created_at` falls in the window
    ///
    /// Missing timestamps always pass; unparseable ones never do, except in
    /// [`TimeWindow::All`].
    #[must_use]
    pub fn admits(self, created_at: Option<&str>, today: NaiveDate) -> bool {
        let Some(threshold) = self.threshold_days() else {
            return true;
        };
        let Some(raw) = created_at.filter(|raw| !raw.trim().is_empty()) else {
            return true;
        };
        parse_date(raw).is_some_and(|created| (today - created).num_days() <= threshold)
    }
}

impl FromStr for TimeWindow {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|w| w.as_str() == s.trim())
            .ok_or_else(|| MatrixError::UnknownWindow(s.to_string()))
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag selection and time window
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplianceFilter {
    /// Selected tags; a record passes if it has any of them
    pub tags: Vec<String>,
    /// Time window
    pub window: TimeWindow,
}

impl ComplianceFilter {
    /// Create filter that passes everything
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With time window
    #[inline]
    #[must_use]
    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }

    /// With one more selected tag
    #[inline]
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Check a record against tag selection and window
    #[must_use]
    pub fn admits(&self, record: &MetricsRecord, today: NaiveDate) -> bool {
        let tag_ok = self.tags.is_empty() || {
            let tags = record.tags();
            self.tags.iter().any(|t| tags.contains(t))
        };
        tag_ok && self.window.admits(record.created_at(), today)
    }
}

/// One percentage card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Share {
    /// Tag or risk level
    pub label: String,
    /// Test cases counted
    pub count: u64,
    /// `round(100 * count / total)`
    pub percent: u32,
}

/// Metrics aggregate seen through a filter
#[derive(Debug, Clone)]
pub struct ComplianceView<'a> {
    metrics: &'a ComplianceMetrics,
    filter: ComplianceFilter,
    today: NaiveDate,
}

impl<'a> ComplianceView<'a> {
    /// Create view; `today` anchors the time window
    #[must_use]
    pub fn new(metrics: &'a ComplianceMetrics, filter: ComplianceFilter, today: NaiveDate) -> Self {
        Self {
            metrics,
            filter,
            today,
        }
    }

    /// Underlying aggregate
    #[inline]
    #[must_use]
    pub fn metrics(&self) -> &ComplianceMetrics {
        self.metrics
    }

    /// Records passing both filters, in payload order
    #[must_use]
    pub fn filtered_records(&self) -> Vec<&'a MetricsRecord> {
        self.metrics
            .test_cases
            .iter()
            .filter(|r| self.filter.admits(r, self.today))
            .collect()
    }

    /// Per-tag share of all test cases
    #[must_use]
    pub fn tag_coverage(&self) -> Vec<Share> {
        self.metrics
            .compliance_tags
            .iter()
            .map(|tag| self.share(tag, self.metrics.compliance_counts.get(tag).copied()))
            .collect()
    }

    /// Per-risk-level share of all test cases
    #[must_use]
    pub fn risk_breakdown(&self) -> Vec<Share> {
        self.metrics
            .risk_counts
            .iter()
            .map(|(level, count)| self.share(level, Some(*count)))
            .collect()
    }

    fn share(&self, label: &str, count: Option<u64>) -> Share {
        let count = count.unwrap_or(0);
        Share {
            label: label.to_string(),
            count,
            percent: rounded_percent(count, self.metrics.total_test_cases),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()
    }

    fn metrics() -> ComplianceMetrics {
        serde_json::from_value(json!({
            "total_test_cases": 4,
            "compliance_tags": ["FDA", "GDPR", "HIPAA"],
            "compliance_counts": { "FDA": 3, "HIPAA": 1, "GDPR": 1 },
            "risk_counts": { "Critical": 0, "High": 1, "Medium": 0, "Low": 3 },
            "test_cases": [
                { "compliance_tags": ["FDA"], "risk": "High", "created_at": "2026-03-30T08:00:00" },
                { "compliance_tags": ["FDA", "HIPAA"], "risk": "Low", "created_at": "2026-01-15T08:00:00" },
                { "compliance_tags": ["GDPR"], "risk": "Low", "created_at": null },
                { "compliance_tags": "FDA", "risk": "Low", "created_at": "yesterday" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn window_parse() {
        assert_eq!("7days".parse::<TimeWindow>().unwrap(), TimeWindow::Last7Days);
        assert_eq!("year".parse::<TimeWindow>().unwrap(), TimeWindow::LastYear);
        assert!("week".parse::<TimeWindow>().is_err());
        for w in TimeWindow::ALL {
            assert_eq!(w.to_string().parse::<TimeWindow>().unwrap(), w);
        }
    }

    #[test]
    fn window_uses_calendar_days() {
        let w = TimeWindow::Last7Days;
        assert!(w.admits(Some("2026-03-24T23:59:00"), today()));
        assert!(!w.admits(Some("2026-03-23T23:59:00"), today()));
        assert!(w.admits(None, today()));
        assert!(!w.admits(Some("garbage"), today()));
        assert!(TimeWindow::All.admits(Some("garbage"), today()));
    }

    #[test]
    fn no_filter_keeps_everything() {
        let m = metrics();
        let view = ComplianceView::new(&m, ComplianceFilter::new(), today());
        assert_eq!(view.filtered_records().len(), 4);
    }

    #[test]
    fn tag_filter_is_any_of() {
        let m = metrics();
        let filter = ComplianceFilter::new().with_tag("HIPAA").with_tag("GDPR");
        let view = ComplianceView::new(&m, filter, today());
        assert_eq!(view.filtered_records().len(), 2);
    }

    #[test]
    fn tag_and_window_combine() {
        let m = metrics();
        let filter = ComplianceFilter::new()
            .with_tag("FDA")
            .with_window(TimeWindow::Last30Days);
        let view = ComplianceView::new(&m, filter, today());
        let records = view.filtered_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].risk(), Some("High"));
    }

    #[test]
    fn percentages() {
        let m = metrics();
        let view = ComplianceView::new(&m, ComplianceFilter::new(), today());

        let tags = view.tag_coverage();
        assert_eq!(tags[0], Share { label: "FDA".to_string(), count: 3, percent: 75 });
        assert_eq!(tags[1].percent, 25);

        let risk: Vec<(String, u32)> = view.risk_breakdown().into_iter().map(|s| (s.label, s.percent)).collect();
        assert_eq!(
            risk,
            [
                ("Critical".to_string(), 0),
                ("High".to_string(), 25),
                ("Medium".to_string(), 0),
                ("Low".to_string(), 75)
            ]
        );
    }

    #[test]
    fn empty_metrics_have_zero_percent() {
        let m = ComplianceMetrics::empty();
        let view = ComplianceView::new(&m, ComplianceFilter::new(), today());
        assert!(view.tag_coverage().is_empty());
        assert!(view.risk_breakdown().is_empty());
        assert!(view.filtered_records().is_empty());
    }
}
