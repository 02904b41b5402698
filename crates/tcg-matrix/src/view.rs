//! Matrix screen state as explicit transitions
//!
//! [`ViewState`] is a value; [`ViewState::apply`] consumes it with a
//! [`ViewAction`] and returns the successor. Nothing else mutates it, so the
//! filtering shown on screen is always `filter_test_cases(model, &state.filter)`.

use crate::filter::{filter_test_cases, MatrixFilter};
use crate::matrix::{MatrixModel, MatrixTestCase};
use serde::{Deserialize, Serialize};

/// Screen state: filter values, expanded row and requirement selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    /// Active filter
    #[serde(default)]
    pub filter: MatrixFilter,
    /// Expanded test-case row
    #[serde(default)]
    pub expanded: Option<String>,
    /// Selected requirement keys, selection order
    #[serde(default)]
    pub selected_requirements: Vec<String>,
}

/// One user interaction on the matrix screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    /// Replace the search text
    Search(String),
    /// Set or clear the status filter
    FilterStatus(Option<String>),
    /// Set or clear the compliance filter
    FilterCompliance(Option<String>),
    /// Highlight a requirement column; highlighting it again clears it
    HighlightRequirement(String),
    /// Clear the highlighted column
    ClearHighlight,
    /// Expand a row, or collapse it if it is already expanded
    ToggleExpanded(String),
    /// Add or remove one requirement from the selection
    ToggleRequirement(String),
    /// Select every listed requirement, or clear if all are already selected
    ToggleSelectAll(Vec<String>),
    /// Empty the selection
    ClearSelection,
    /// Reset every filter, keeping selection and expansion
    ResetFilters,
}

impl ViewState {
    /// Initial state
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Successor state after `action`
    #[must_use]
    pub fn apply(mut self, action: ViewAction) -> Self {
        match action {
            ViewAction::Search(text) => self.filter.search = text,
            ViewAction::FilterStatus(status) => self.filter.status = status,
            ViewAction::FilterCompliance(tag) => self.filter.compliance = tag,
            ViewAction::HighlightRequirement(req_id) => {
                if self.filter.highlighted_requirement.as_deref() == Some(req_id.as_str()) {
                    self.filter.highlighted_requirement = None;
                } else {
                    self.filter.highlighted_requirement = Some(req_id);
                }
            }
            ViewAction::ClearHighlight => self.filter.highlighted_requirement = None,
            ViewAction::ToggleExpanded(tc_id) => {
                if self.expanded.as_deref() == Some(tc_id.as_str()) {
                    self.expanded = None;
                } else {
                    self.expanded = Some(tc_id);
                }
            }
            ViewAction::ToggleRequirement(req_id) => {
                if let Some(pos) = self.selected_requirements.iter().position(|id| *id == req_id) {
                    self.selected_requirements.remove(pos);
                } else {
                    self.selected_requirements.push(req_id);
                }
            }
            ViewAction::ToggleSelectAll(all) => {
                let every_selected = !all.is_empty()
                    && all.iter().all(|id| self.selected_requirements.contains(id));
                if every_selected {
                    self.selected_requirements.clear();
                } else {
                    self.selected_requirements = all;
                }
            }
            ViewAction::ClearSelection => self.selected_requirements.clear(),
            ViewAction::ResetFilters => self.filter = MatrixFilter::default(),
        }
        self
    }

    /// Fold a sequence of actions
    #[must_use]
    pub fn apply_all(self, actions: impl IntoIterator<Item = ViewAction>) -> Self {
        actions.into_iter().fold(self, Self::apply)
    }

    /// Rows visible under the current filter
    #[must_use]
    pub fn visible<'a>(&self, model: &'a MatrixModel) -> Vec<&'a MatrixTestCase> {
        filter_test_cases(model, &self.filter)
    }

    /// Check if a row is expanded
    #[must_use]
    pub fn is_expanded(&self, tc_id: &str) -> bool {
        self.expanded.as_deref() == Some(tc_id)
    }

    /// Check if a requirement is selected
    #[must_use]
    pub fn is_selected(&self, req_id: &str) -> bool {
        self.selected_requirements.iter().any(|id| id == req_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::build_matrix;
    use pretty_assertions::assert_eq;
    use tcg_model::TestCaseRecord;

    #[test]
    fn apply_does_not_touch_previous_state() {
        let before = ViewState::new();
        let after = before.clone().apply(ViewAction::Search("login".to_string()));
        assert_eq!(before, ViewState::default());
        assert_eq!(after.filter.search, "login");
    }

    #[test]
    fn highlight_toggles() {
        let state = ViewState::new()
            .apply(ViewAction::HighlightRequirement("R1".to_string()))
            .apply(ViewAction::HighlightRequirement("R2".to_string()));
        assert_eq!(state.filter.highlighted_requirement.as_deref(), Some("R2"));

        let state = state.apply(ViewAction::HighlightRequirement("R2".to_string()));
        assert_eq!(state.filter.highlighted_requirement, None);
    }

    #[test]
    fn expand_toggles() {
        let state = ViewState::new().apply(ViewAction::ToggleExpanded("TC1".to_string()));
        assert!(state.is_expanded("TC1"));
        let state = state.apply(ViewAction::ToggleExpanded("TC1".to_string()));
        assert_eq!(state.expanded, None);
    }

    #[test]
    fn selection_toggles() {
        let all = vec!["R1".to_string(), "R2".to_string()];
        let state = ViewState::new().apply_all([
            ViewAction::ToggleRequirement("R2".to_string()),
            ViewAction::ToggleRequirement("R1".to_string()),
            ViewAction::ToggleRequirement("R2".to_string()),
        ]);
        assert_eq!(state.selected_requirements, ["R1"]);

        let state = state.apply(ViewAction::ToggleSelectAll(all.clone()));
        assert_eq!(state.selected_requirements, all);

        let state = state.apply(ViewAction::ToggleSelectAll(all));
        assert!(state.selected_requirements.is_empty());
    }

    #[test]
    fn reset_keeps_selection() {
        let state = ViewState::new()
            .apply(ViewAction::ToggleRequirement("R1".to_string()))
            .apply(ViewAction::FilterStatus(Some("Passed".to_string())))
            .apply(ViewAction::ResetFilters);
        assert!(state.filter.is_unset());
        assert!(state.is_selected("R1"));
    }

    #[test]
    fn visible_follows_filter() {
        let model = build_matrix(&[
            TestCaseRecord::new("TC1", "R1").with_status("Passed"),
            TestCaseRecord::new("TC2", "R2"),
        ]);
        let state = ViewState::new();
        assert_eq!(state.visible(&model).len(), 2);

        let state = state.apply(ViewAction::HighlightRequirement("R2".to_string()));
        let visible = state.visible(&model);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].tc_id, "TC2");
    }
}
