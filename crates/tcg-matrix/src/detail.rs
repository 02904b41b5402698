//! Rendering helpers for an expanded test-case row

use crate::matrix::MatrixModel;
use regex::Regex;
use std::sync::OnceLock;
use tcg_model::ComplianceTags;

fn step_marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+\.\s").expect("step marker regex"))
}

/// Pretty-print `input_data`
///
/// Valid JSON is re-indented with two spaces; anything else is returned
/// unchanged. Never fails.
#[must_use]
pub fn pretty_input_data(raw: &str) -> String {
    serde_json::from_str::<serde_json::Value>(raw)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| raw.to_string())
}

/// Check whether `input_data` has anything worth showing
#[must_use]
pub fn has_input_data(raw: &str) -> bool {
    let raw = raw.trim();
    !raw.is_empty() && raw != "null"
}

/// Split a description into steps
///
/// `"1. Open app 2. Log in"` yields `["Open app", "Log in"]`. Without numbered
/// markers the non-empty lines are returned instead.
#[must_use]
pub fn description_steps(desc: &str) -> Vec<String> {
    let markers: Vec<_> = step_marker_regex().find_iter(desc).collect();
    if !markers.is_empty() {
        let steps: Vec<String> = markers
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let end = markers.get(i + 1).map_or(desc.len(), |next| next.start());
                desc[m.end()..end].trim().to_string()
            })
            .filter(|step| !step.is_empty())
            .collect();
        if !steps.is_empty() {
            return steps;
        }
    }
    desc.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Distinct compliance tags across the whole model, first-seen order
#[inline]
#[must_use]
pub fn all_compliance_tags(model: &MatrixModel) -> ComplianceTags {
    model.all_compliance_tags()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pretty_prints_json() {
        assert_eq!(pretty_input_data(r#"{"user":"a","n":1}"#), "{\n  \"user\": \"a\",\n  \"n\": 1\n}");
    }

    #[test]
    fn malformed_json_returned_raw() {
        assert_eq!(pretty_input_data("{not json"), "{not json");
        assert_eq!(pretty_input_data(""), "");
    }

    #[test]
    fn input_data_presence() {
        assert!(has_input_data("{}"));
        assert!(!has_input_data(""));
        assert!(!has_input_data("   "));
        assert!(!has_input_data("null"));
    }

    #[test]
    fn numbered_steps() {
        assert_eq!(
            description_steps("1. Open the app 2. Enter 3 digits 3. Submit"),
            ["Open the app", "Enter 3 digits", "Submit"]
        );
    }

    #[test]
    fn line_fallback() {
        assert_eq!(description_steps("Open the app\n\n  Submit  \n"), ["Open the app", "Submit"]);
        assert!(description_steps("").is_empty());
    }
}
