//! Traceability matrix construction
//!
//! Folds flat [`TestCaseRecord`]s into:
//! - a requirement registry (column headers), first-seen wins for display fields
//! - one [`MatrixTestCase`] per distinct `tc_id` (rows), each carrying its
//!   requirement associations as `details`
//! - the incidence set of distinct `(tc_id, req_id)` pairs
//! - coverage and status metrics
//!
//! # Invariants
//! - A requirement key appears once in `requirements`.
//! - A `tc_id` appears once in `test_cases`.
//! - `details` holds one record per distinct pair, at the position the pair
//!   was first seen; a repeated pair overwrites that record (last wins).
//! - `is_linked(tc, req)` holds iff some detail of `tc` has `req_id == req`.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tcg_model::{ComplianceTags, Requirement, TestCaseRecord, TestStatus};

/// Requirement column of the matrix
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatrixRequirement {
    /// Canonical requirement key
    pub req_id: String,
    /// Display id
    pub req_title_id: String,
    /// Title
    pub req_title: String,
    /// Description
    pub req_description: String,
}

impl MatrixRequirement {
    fn from_catalog(req: &Requirement) -> Self {
        Self {
            req_id: req.key().to_string(),
            req_title_id: req.req_title_id.clone(),
            req_title: req.title.clone(),
            req_description: req.description.clone(),
        }
    }

    fn from_record(key: &str, record: &TestCaseRecord) -> Self {
        Self {
            req_id: key.to_string(),
            req_title_id: record.req_title_id.clone(),
            req_title: record.req_title.clone(),
            req_description: record.req_description.clone(),
        }
    }

    /// Header label: the display id, or the key when there is none
    #[must_use]
    pub fn label(&self) -> &str {
        if self.req_title_id.trim().is_empty() {
            &self.req_id
        } else {
            &self.req_title_id
        }
    }
}

/// Test-case row of the matrix
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatrixTestCase {
    /// Test-case id
    pub tc_id: String,
    /// Title (first seen)
    pub tc_title: String,
    /// Effective status: the first detail's status, or `Not Executed`
    pub status: String,
    /// One record per linked requirement
    pub details: Vec<TestCaseRecord>,
}

impl MatrixTestCase {
    /// Effective status label
    #[inline]
    #[must_use]
    pub fn effective_status(&self) -> &str {
        &self.status
    }

    /// Effective status classified into the fixed enumeration
    #[inline]
    #[must_use]
    pub fn classified_status(&self) -> TestStatus {
        TestStatus::classify(&self.status)
    }

    /// Check whether any detail links to `req_id`
    #[must_use]
    pub fn links(&self, req_id: &str) -> bool {
        self.details.iter().any(|d| d.req_id == req_id)
    }

    /// Union of the details' compliance tags, first-seen order
    #[must_use]
    pub fn compliance_tags(&self) -> ComplianceTags {
        let mut tags = ComplianceTags::new();
        for detail in &self.details {
            tags.extend_from(&detail.compliance_tags);
        }
        tags
    }
}

/// One `(tc_id, req_id)` association
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct IncidenceKey {
    /// Test-case id
    pub tc_id: String,
    /// Canonical requirement key
    pub req_id: String,
}

impl IncidenceKey {
    /// Create incidence key
    #[must_use]
    pub fn new(tc_id: impl Into<String>, req_id: impl Into<String>) -> Self {
        Self {
            tc_id: tc_id.into(),
            req_id: req_id.into(),
        }
    }
}

impl fmt::Display for IncidenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.tc_id, self.req_id)
    }
}

/// Per-status tally over grouped test cases
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    /// Passed
    pub passed: usize,
    /// Failed
    pub failed: usize,
    /// Blocked
    pub blocked: usize,
    /// Not executed, including unknown statuses
    pub not_executed: usize,
}

impl StatusCounts {
    /// Count one test case
    pub fn record(&mut self, status: TestStatus) {
        match status {
            TestStatus::Passed => self.passed += 1,
            TestStatus::Failed => self.failed += 1,
            TestStatus::Blocked => self.blocked += 1,
            TestStatus::NotExecuted => self.not_executed += 1,
        }
    }

    /// Count for one status
    #[must_use]
    pub fn get(&self, status: TestStatus) -> usize {
        match status {
            TestStatus::Passed => self.passed,
            TestStatus::Failed => self.failed,
            TestStatus::Blocked => self.blocked,
            TestStatus::NotExecuted => self.not_executed,
        }
    }

    /// Iterate `(status, count)` in display order
    pub fn iter(&self) -> impl Iterator<Item = (TestStatus, usize)> + '_ {
        TestStatus::ALL.into_iter().map(move |s| (s, self.get(s)))
    }

    /// Sum over all statuses
    #[must_use]
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.blocked + self.not_executed
    }
}

/// Summary metrics of a matrix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatrixMetrics {
    /// Requirements in the registry
    pub total_requirements: usize,
    /// Distinct test cases
    pub total_test_cases: usize,
    /// Requirements with at least one linked test case
    pub requirements_with_test_cases: usize,
    /// `round(100 * with / total)`, 0 when there are no requirements
    pub coverage: u32,
    /// Status tally
    pub status_counts: StatusCounts,
    /// Input records dropped for lacking a test-case id or requirement key
    pub skipped_records: usize,
}

/// Rounded percentage, half away from zero; 0 when `whole` is 0
#[must_use]
pub fn rounded_percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    let scaled = (200 * part + whole) / (2 * whole);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Immutable traceability model
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatrixModel {
    requirements: Vec<MatrixRequirement>,
    test_cases: Vec<MatrixTestCase>,
    incidence: IndexSet<IncidenceKey>,
    metrics: MatrixMetrics,
}

impl MatrixModel {
    /// Empty model
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Requirement columns in registry order
    #[inline]
    #[must_use]
    pub fn requirements(&self) -> &[MatrixRequirement] {
        &self.requirements
    }

    /// Test-case rows in first-seen order
    #[inline]
    #[must_use]
    pub fn test_cases(&self) -> &[MatrixTestCase] {
        &self.test_cases
    }

    /// Distinct incidence pairs in first-seen order
    pub fn incidence(&self) -> impl Iterator<Item = &IncidenceKey> {
        self.incidence.iter()
    }

    /// Number of distinct incidence pairs
    #[inline]
    #[must_use]
    pub fn incidence_count(&self) -> usize {
        self.incidence.len()
    }

    /// Check whether `tc_id` is linked to requirement `req_id`
    #[must_use]
    pub fn is_linked(&self, tc_id: &str, req_id: &str) -> bool {
        self.incidence.contains(&IncidenceKey::new(tc_id, req_id))
    }

    /// Look up a requirement by canonical key or display id
    #[must_use]
    pub fn requirement(&self, id: &str) -> Option<&MatrixRequirement> {
        self.requirements
            .iter()
            .find(|r| r.req_id == id)
            .or_else(|| self.requirements.iter().find(|r| r.req_title_id == id))
    }

    /// Look up a test case
    #[must_use]
    pub fn test_case(&self, tc_id: &str) -> Option<&MatrixTestCase> {
        self.test_cases.iter().find(|tc| tc.tc_id == tc_id)
    }

    /// Summary metrics
    #[inline]
    #[must_use]
    pub fn metrics(&self) -> &MatrixMetrics {
        &self.metrics
    }

    /// Coverage percentage
    #[inline]
    #[must_use]
    pub fn coverage(&self) -> u32 {
        self.metrics.coverage
    }

    /// Check if the model has no test cases and no requirements
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty() && self.test_cases.is_empty()
    }

    /// Distinct compliance tags over every detail, first-seen order
    #[must_use]
    pub fn all_compliance_tags(&self) -> ComplianceTags {
        let mut tags = ComplianceTags::new();
        for tc in &self.test_cases {
            for detail in &tc.details {
                tags.extend_from(&detail.compliance_tags);
            }
        }
        tags
    }
}

/// Build a matrix from records alone
///
/// The requirement registry holds exactly the requirement keys the records
/// mention, so coverage is 100 whenever there is any record.
#[must_use]
pub fn build_matrix(records: &[TestCaseRecord]) -> MatrixModel {
    build_matrix_with_catalog(&[], records)
}

/// Build a matrix, seeding the registry with a requirement catalog
///
/// Catalog requirements keep catalog order ahead of any requirement first
/// seen in `records`; those without a linked test case lower the coverage.
/// A record's `req_id` always names its requirement. A record with only a
/// `req_title_id` joins the requirement that a catalog entry, or failing that
/// any record, pairs with that display id.
#[must_use]
pub fn build_matrix_with_catalog(
    catalog: &[Requirement],
    records: &[TestCaseRecord],
) -> MatrixModel {
    let mut registry = Registry::default();
    for req in catalog {
        registry.seed(req);
    }
    for record in records {
        registry.learn_alias(record);
    }

    let mut rows: IndexMap<String, Row> = IndexMap::new();
    let mut incidence: IndexSet<IncidenceKey> = IndexSet::new();
    let mut skipped_records = 0;

    for record in records {
        let tc_id = record.tc_id.trim();
        if tc_id.is_empty() {
            skipped_records += 1;
            continue;
        }
        let Some(req_key) = registry.resolve(record) else {
            skipped_records += 1;
            continue;
        };

        let mut detail = record.clone();
        detail.tc_id = tc_id.to_string();
        detail.req_id.clone_from(&req_key);

        let row = rows.entry(tc_id.to_string()).or_insert_with(|| Row {
            tc_title: record.tc_title.clone(),
            details: IndexMap::new(),
        });
        // `insert` on an existing key keeps its position
        row.details.insert(req_key.clone(), detail);
        incidence.insert(IncidenceKey::new(tc_id, req_key));
    }

    if skipped_records > 0 {
        tracing::warn!(skipped_records, "records without test case id or requirement key dropped");
    }

    let test_cases: Vec<MatrixTestCase> = rows
        .into_iter()
        .map(|(tc_id, row)| {
            let details: Vec<TestCaseRecord> = row.details.into_values().collect();
            let status = details
                .first()
                .and_then(|d| d.status.as_deref())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(TestStatus::DEFAULT_LABEL)
                .to_string();
            MatrixTestCase {
                tc_id,
                tc_title: row.tc_title,
                status,
                details,
            }
        })
        .collect();

    let requirements = registry.into_requirements();

    let linked: HashSet<&str> = incidence.iter().map(|k| k.req_id.as_str()).collect();
    let requirements_with_test_cases = requirements
        .iter()
        .filter(|r| linked.contains(r.req_id.as_str()))
        .count();

    let mut status_counts = StatusCounts::default();
    for tc in &test_cases {
        status_counts.record(tc.classified_status());
    }

    let metrics = MatrixMetrics {
        total_requirements: requirements.len(),
        total_test_cases: test_cases.len(),
        requirements_with_test_cases,
        coverage: rounded_percent(
            requirements_with_test_cases as u64,
            requirements.len() as u64,
        ),
        status_counts,
        skipped_records,
    };

    tracing::debug!(
        requirements = metrics.total_requirements,
        test_cases = metrics.total_test_cases,
        pairs = incidence.len(),
        coverage = metrics.coverage,
        "built traceability matrix"
    );

    MatrixModel {
        requirements,
        test_cases,
        incidence,
        metrics,
    }
}

struct Row {
    tc_title: String,
    details: IndexMap<String, TestCaseRecord>,
}

#[derive(Default)]
struct Registry {
    entries: IndexMap<String, MatrixRequirement>,
    /// display id → canonical key; catalog pairings first, then record ones
    aliases: HashMap<String, String>,
}

impl Registry {
    fn seed(&mut self, req: &Requirement) {
        let key = req.key();
        if key.is_empty() || self.entries.contains_key(key) {
            return;
        }
        let alias = req.req_title_id.trim();
        if !alias.is_empty() && alias != key {
            self.aliases
                .entry(alias.to_string())
                .or_insert_with(|| key.to_string());
        }
        self.entries
            .insert(key.to_string(), MatrixRequirement::from_catalog(req));
    }

    /// Remember the display id a record pairs with its `req_id`
    fn learn_alias(&mut self, record: &TestCaseRecord) {
        let req_id = record.req_id.trim();
        let title_id = record.req_title_id.trim();
        if req_id.is_empty() || title_id.is_empty() || title_id == req_id {
            return;
        }
        let target = self
            .aliases
            .get(req_id)
            .cloned()
            .unwrap_or_else(|| req_id.to_string());
        self.aliases.entry(title_id.to_string()).or_insert(target);
    }

    /// Canonical key for a record, registering the requirement if new
    ///
    /// Only the canonical key itself is looked up as an alias, so a record's
    /// explicit `req_id` is never traded for its `req_title_id` pairing.
    fn resolve(&mut self, record: &TestCaseRecord) -> Option<String> {
        let key = record.requirement_key();
        if key.is_empty() {
            return None;
        }
        if self.entries.contains_key(key) {
            return Some(key.to_string());
        }
        let canonical = self
            .aliases
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string());
        self.entries
            .entry(canonical.clone())
            .or_insert_with(|| MatrixRequirement::from_record(&canonical, record));
        Some(canonical)
    }

    fn into_requirements(self) -> Vec<MatrixRequirement> {
        self.entries.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rec(tc: &str, req: &str) -> TestCaseRecord {
        TestCaseRecord::new(tc, req).with_title(format!("{tc} title"))
    }

    #[test]
    fn rounded_percent_rounds_half_up() {
        assert_eq!(rounded_percent(0, 0), 0);
        assert_eq!(rounded_percent(1, 2), 50);
        assert_eq!(rounded_percent(1, 3), 33);
        assert_eq!(rounded_percent(2, 3), 67);
        assert_eq!(rounded_percent(1, 8), 13);
        assert_eq!(rounded_percent(3, 3), 100);
    }

    #[test]
    fn one_test_case_two_requirements() {
        let model = build_matrix(&[rec("TC1", "R1"), rec("TC1", "R2")]);

        assert_eq!(model.test_cases().len(), 1);
        assert_eq!(model.test_cases()[0].details.len(), 2);
        assert_eq!(model.requirements().len(), 2);
        assert!(model.is_linked("TC1", "R1"));
        assert!(model.is_linked("TC1", "R2"));
        assert_eq!(model.coverage(), 100);

        let keys: Vec<String> = model.incidence().map(ToString::to_string).collect();
        assert_eq!(keys, ["TC1-R1", "TC1-R2"]);
    }

    #[test]
    fn empty_input() {
        let model = build_matrix(&[]);
        assert!(model.is_empty());
        assert_eq!(model.metrics(), &MatrixMetrics::default());
        assert_eq!(model.coverage(), 0);
    }

    #[test]
    fn requirement_fields_first_seen_wins() {
        let first = rec("TC1", "R1").with_requirement("REQ-1", "First title");
        let second = rec("TC2", "R1").with_requirement("REQ-1", "Second title");
        let model = build_matrix(&[first, second]);

        assert_eq!(model.requirements().len(), 1);
        assert_eq!(model.requirements()[0].req_title, "First title");
    }

    #[test]
    fn repeated_pair_last_wins_in_place() {
        let mut early = rec("TC1", "R1");
        early.expected_result = "old".to_string();
        let mut late = rec("TC1", "R1");
        late.expected_result = "new".to_string();

        let model = build_matrix(&[early, rec("TC1", "R2"), late]);
        let tc = model.test_case("TC1").unwrap();

        assert_eq!(tc.details.len(), 2);
        assert_eq!(tc.details[0].req_id, "R1");
        assert_eq!(tc.details[0].expected_result, "new");
        assert_eq!(tc.details[1].req_id, "R2");
        assert_eq!(model.incidence_count(), 2);
    }

    #[test]
    fn status_defaults_and_unknowns() {
        let model = build_matrix(&[
            rec("TC1", "R1").with_status("Passed"),
            rec("TC2", "R1"),
            rec("TC3", "R1").with_status("Not Run"),
            rec("TC4", "R1").with_status("  "),
            rec("TC5", "R1").with_status("Failed"),
        ]);

        let statuses: Vec<&str> = model.test_cases().iter().map(MatrixTestCase::effective_status).collect();
        assert_eq!(statuses, ["Passed", "Not Executed", "Not Run", "Not Executed", "Failed"]);

        let counts = model.metrics().status_counts;
        assert_eq!(counts.passed, 1);
        assert_eq!(counts.failed, 1);
        assert_eq!(counts.blocked, 0);
        assert_eq!(counts.not_executed, 3);
        assert_eq!(counts.total(), model.test_cases().len());
    }

    #[test]
    fn status_comes_from_first_detail() {
        let model = build_matrix(&[
            rec("TC1", "R1").with_status("Blocked"),
            rec("TC1", "R2").with_status("Passed"),
        ]);
        assert_eq!(model.test_cases()[0].classified_status(), TestStatus::Blocked);
    }

    #[test]
    fn title_id_used_when_req_id_missing() {
        let record = TestCaseRecord::new("TC1", "").with_requirement("REQ-9", "Audit log");
        let model = build_matrix(&[record]);
        assert_eq!(model.requirements()[0].req_id, "REQ-9");
        assert!(model.is_linked("TC1", "REQ-9"));
        assert_eq!(model.test_cases()[0].details[0].req_id, "REQ-9");
    }

    #[test]
    fn title_only_record_joins_paired_requirement() {
        let model = build_matrix(&[
            TestCaseRecord::new("TC1", "R1").with_requirement("REQ-1", "Login"),
            TestCaseRecord::new("TC2", "").with_requirement("REQ-1", "Login"),
        ]);
        let keys: Vec<&str> = model.requirements().iter().map(|r| r.req_id.as_str()).collect();
        assert_eq!(keys, ["R1"]);
        assert!(model.is_linked("TC2", "R1"));
        assert_eq!(model.test_cases()[1].details[0].req_id, "R1");
    }

    #[test]
    fn title_only_record_first_still_uses_req_id() {
        let model = build_matrix(&[
            TestCaseRecord::new("TC2", "").with_requirement("REQ-1", "Login"),
            TestCaseRecord::new("TC1", " R1 ").with_requirement("REQ-1", "Sign in"),
        ]);
        assert_eq!(model.requirements().len(), 1);
        let req = &model.requirements()[0];
        assert_eq!(req.req_id, "R1");
        assert_eq!(req.req_title_id, "REQ-1");
        assert_eq!(req.req_title, "Login");
        assert!(model.is_linked("TC1", "R1"));
        assert!(model.is_linked("TC2", "R1"));
    }

    #[test]
    fn explicit_req_id_beats_catalog_display_id() {
        let catalog = vec![Requirement::new("R1", "REQ-001", "Login")];
        let record = TestCaseRecord::new("TC1", "R5").with_requirement("REQ-001", "Login");
        let model = build_matrix_with_catalog(&catalog, &[record]);

        assert!(model.is_linked("TC1", "R5"));
        assert!(!model.is_linked("TC1", "R1"));
        assert_eq!(model.metrics().total_requirements, 2);
    }

    #[test]
    fn title_only_record_resolves_through_catalog() {
        let catalog = vec![Requirement::new("R1", "REQ-001", "Login")];
        let record = TestCaseRecord::new("TC1", "").with_requirement("REQ-001", "Login");
        let model = build_matrix_with_catalog(&catalog, &[record]);

        assert!(model.is_linked("TC1", "R1"));
        assert_eq!(model.metrics().total_requirements, 1);
    }

    #[test]
    fn details_carry_trimmed_tc_id() {
        let model = build_matrix(&[rec(" TC1 ", "R1"), rec("TC1", "R2")]);
        assert_eq!(model.test_cases().len(), 1);
        let tc = &model.test_cases()[0];
        assert_eq!(tc.tc_id, "TC1");
        assert!(tc.details.iter().all(|d| d.tc_id == "TC1"));
    }

    #[test]
    fn records_without_keys_skipped() {
        let model = build_matrix(&[
            TestCaseRecord::new("TC1", ""),
            TestCaseRecord::new("  ", "R1"),
            rec("TC2", "R1"),
        ]);
        assert_eq!(model.metrics().skipped_records, 2);
        assert_eq!(model.test_cases().len(), 1);
    }

    #[test]
    fn catalog_lowers_coverage() {
        let catalog = vec![
            Requirement::new("R1", "REQ-001", "Login"),
            Requirement::new("R2", "REQ-002", "Logout"),
            Requirement::new("R3", "REQ-003", "Audit"),
        ];
        let model = build_matrix_with_catalog(&catalog, &[rec("TC1", "R1"), rec("TC2", "REQ-002")]);

        assert_eq!(model.metrics().total_requirements, 3);
        assert_eq!(model.metrics().requirements_with_test_cases, 2);
        assert_eq!(model.coverage(), 67);
        assert!(model.is_linked("TC2", "R2"));
        assert_eq!(model.requirement("REQ-003").map(|r| r.req_id.as_str()), Some("R3"));
    }

    #[test]
    fn catalog_order_then_discovered() {
        let catalog = vec![Requirement::new("R2", "REQ-002", "Logout")];
        let model = build_matrix_with_catalog(&catalog, &[rec("TC1", "R9"), rec("TC2", "R2")]);
        let keys: Vec<&str> = model.requirements().iter().map(|r| r.req_id.as_str()).collect();
        assert_eq!(keys, ["R2", "R9"]);
        assert_eq!(model.requirements()[0].req_title, "Logout");
    }

    #[test]
    fn compliance_tag_union() {
        let model = build_matrix(&[
            rec("TC1", "R1").with_tags("FDA, HIPAA"),
            rec("TC1", "R2").with_tags("HIPAA|ISO 13485"),
            rec("TC2", "R1").with_tags("GDPR"),
        ]);
        assert_eq!(
            model.test_cases()[0].compliance_tags().as_slice(),
            ["FDA", "HIPAA", "ISO 13485"]
        );
        assert_eq!(
            model.all_compliance_tags().as_slice(),
            ["FDA", "HIPAA", "ISO 13485", "GDPR"]
        );
    }

    #[test]
    fn requirement_label_falls_back_to_key() {
        let model = build_matrix(&[rec("TC1", "R1")]);
        assert_eq!(model.requirements()[0].label(), "R1");
    }
}
