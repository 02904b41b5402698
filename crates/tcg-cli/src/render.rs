//! Plain-text rendering for terminal output

use std::fmt::Write as _;
use tcg_matrix::{
    description_steps, has_input_data, pretty_input_data, ComplianceView, GroupedRequirement,
    MatrixModel, MatrixTestCase,
};
use tcg_model::{FileInfo, Requirement, TestCaseRecord};

const LINKED: &str = "x";
const UNLINKED: &str = ".";

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{text}{}", " ".repeat(width - len))
    }
}

/// Left-aligned table with a header row
pub(crate) fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad(c, *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = line(headers.to_vec());
    for row in rows {
        out.push('\n');
        out.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    out
}

pub(crate) fn requirements(reqs: &[Requirement]) -> String {
    if reqs.is_empty() {
        return "No requirements found.".to_string();
    }
    let rows: Vec<Vec<String>> = reqs
        .iter()
        .map(|r| {
            vec![
                r.key().to_string(),
                r.req_title_id.clone(),
                r.title.clone(),
                r.priority.clone().unwrap_or_default(),
            ]
        })
        .collect();
    table(&["ID", "TITLE ID", "TITLE", "PRIORITY"], &rows)
}

pub(crate) fn files(files: &[FileInfo]) -> String {
    if files.is_empty() {
        return "No files uploaded.".to_string();
    }
    let rows: Vec<Vec<String>> = files
        .iter()
        .map(|f| vec![f.file_id.clone(), f.filename.clone(), f.status.clone()])
        .collect();
    table(&["FILE ID", "NAME", "STATUS"], &rows)
}

/// Incidence grid of `visible` rows against every requirement column
pub(crate) fn matrix(model: &MatrixModel, visible: &[&MatrixTestCase]) -> String {
    let m = model.metrics();
    let mut out = format!(
        "Requirements: {}  Test cases: {}  Covered: {}  Coverage: {}%\n",
        m.total_requirements, m.total_test_cases, m.requirements_with_test_cases, m.coverage
    );
    let counts: Vec<String> = m
        .status_counts
        .iter()
        .map(|(status, n)| format!("{status}: {n}"))
        .collect();
    out.push_str(&counts.join("  "));
    out.push_str("\n\n");

    if visible.is_empty() {
        out.push_str("No test cases match the current filters.");
        return out;
    }

    let mut headers = vec!["TEST CASE", "TITLE", "STATUS"];
    headers.extend(model.requirements().iter().map(|r| r.label()));
    let rows: Vec<Vec<String>> = visible
        .iter()
        .map(|tc| {
            let mut row = vec![tc.tc_id.clone(), tc.tc_title.clone(), tc.status.clone()];
            row.extend(model.requirements().iter().map(|r| {
                let mark = if model.is_linked(&tc.tc_id, &r.req_id) { LINKED } else { UNLINKED };
                mark.to_string()
            }));
            row
        })
        .collect();
    out.push_str(&table(&headers, &rows));
    out
}

fn detail_block(out: &mut String, detail: &TestCaseRecord) {
    let _ = writeln!(out, "  Requirement: {} {}", detail.req_id, detail.req_title);
    if !detail.compliance_tags.is_empty() {
        let _ = writeln!(out, "  Compliance: {}", detail.compliance_tags.to_pipe());
    }
    let steps = description_steps(&detail.tc_description);
    if !steps.is_empty() {
        out.push_str("  Steps:\n");
        for (i, step) in steps.iter().enumerate() {
            let _ = writeln!(out, "    {}. {step}", i + 1);
        }
    }
    if !detail.expected_result.trim().is_empty() {
        let _ = writeln!(out, "  Expected: {}", detail.expected_result);
    }
    if has_input_data(&detail.input_data) {
        out.push_str("  Input data:\n");
        for line in pretty_input_data(&detail.input_data).lines() {
            let _ = writeln!(out, "    {line}");
        }
    }
}

/// Expanded view of one test case
pub(crate) fn expanded(tc: &MatrixTestCase) -> String {
    let mut out = format!("{} - {} [{}]\n", tc.tc_id, tc.tc_title, tc.status);
    for detail in &tc.details {
        detail_block(&mut out, detail);
    }
    out.trim_end().to_string()
}

pub(crate) fn groups(groups: &[GroupedRequirement]) -> String {
    if groups.is_empty() {
        return "No test cases generated yet.".to_string();
    }
    let mut out = String::new();
    for group in groups {
        let _ = writeln!(out, "{} {} ({} test cases)", group.requirement_id, group.title, group.test_cases.len());
        for tc in &group.test_cases {
            let _ = writeln!(out, "  {}  {}", tc.tc_id, tc.tc_title);
        }
    }
    out.trim_end().to_string()
}

pub(crate) fn compliance(view: &ComplianceView<'_>) -> String {
    let metrics = view.metrics();
    let mut out = format!("Total test cases: {}\n", metrics.total_test_cases);
    if let Some(updated) = &metrics.last_updated {
        let _ = writeln!(out, "Last updated: {updated}");
    }

    let coverage: Vec<Vec<String>> = view
        .tag_coverage()
        .into_iter()
        .map(|s| vec![s.label, s.count.to_string(), format!("{}%", s.percent)])
        .collect();
    out.push('\n');
    out.push_str(&table(&["COMPLIANCE", "COUNT", "COVERAGE"], &coverage));

    let risk: Vec<Vec<String>> = view
        .risk_breakdown()
        .into_iter()
        .map(|s| vec![s.label, s.count.to_string(), format!("{}%", s.percent)])
        .collect();
    out.push_str("\n\n");
    out.push_str(&table(&["RISK", "COUNT", "SHARE"], &risk));

    let _ = write!(out, "\n\nMatching test cases: {}", view.filtered_records().len());
    out
}
