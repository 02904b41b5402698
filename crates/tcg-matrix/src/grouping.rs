//! Test cases grouped under catalog requirements
//!
//! Used by the generation screen, which lists requirements with their
//! generated test cases underneath. Unlike the matrix, grouping is driven by
//! the requirement catalog: records are attached to the catalog entry whose
//! `requirement_id` or `req_title_id` they name.

use serde::Serialize;
use tcg_model::{Requirement, TestCaseRecord};

/// Key of the group collecting records that match no catalog requirement
pub const UNMATCHED_KEY: &str = "unmatched";

/// Title of the unmatched group
pub const UNMATCHED_TITLE: &str = "Unmatched Requirement";

/// One requirement with its test cases
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupedRequirement {
    /// Requirement id, or [`UNMATCHED_KEY`]
    pub requirement_id: String,
    /// Display id
    pub req_title_id: String,
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Test cases in record order
    pub test_cases: Vec<TestCaseRecord>,
}

impl GroupedRequirement {
    fn for_requirement(req: &Requirement) -> Self {
        Self {
            requirement_id: req.key().to_string(),
            req_title_id: req.req_title_id.clone(),
            title: req.title.clone(),
            description: req.description.clone(),
            test_cases: Vec::new(),
        }
    }

    fn unmatched() -> Self {
        Self {
            requirement_id: UNMATCHED_KEY.to_string(),
            req_title_id: String::new(),
            title: UNMATCHED_TITLE.to_string(),
            description: String::new(),
            test_cases: Vec::new(),
        }
    }

    /// Check if this is the unmatched group
    #[must_use]
    pub fn is_unmatched(&self) -> bool {
        self.requirement_id == UNMATCHED_KEY
    }

    fn selected_by(&self, selection: &[String]) -> bool {
        selection
            .iter()
            .any(|id| *id == self.requirement_id || (!self.req_title_id.is_empty() && *id == self.req_title_id))
    }
}

/// Group `records` under `catalog`, optionally keeping only `selection`
///
/// Groups follow catalog order with the unmatched group last. Groups with no
/// test case are omitted.
#[must_use]
pub fn group_by_requirement(
    records: &[TestCaseRecord],
    catalog: &[Requirement],
    selection: Option<&[String]>,
) -> Vec<GroupedRequirement> {
    let mut groups: Vec<GroupedRequirement> =
        catalog.iter().map(GroupedRequirement::for_requirement).collect();
    let mut unmatched = GroupedRequirement::unmatched();

    for record in records {
        let position = catalog.iter().position(|req| {
            [record.req_id.as_str(), record.req_title_id.as_str()]
                .into_iter()
                .map(str::trim)
                .any(|id| !id.is_empty() && req.answers_to(id))
        });
        match position {
            Some(idx) => groups[idx].test_cases.push(record.clone()),
            None => unmatched.test_cases.push(record.clone()),
        }
    }
    groups.push(unmatched);

    groups
        .into_iter()
        .filter(|g| !g.test_cases.is_empty())
        .filter(|g| selection.map_or(true, |sel| g.selected_by(sel)))
        .collect()
}
