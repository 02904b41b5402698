//! The two export paths and their file names

use crate::csv::{to_csv, HeaderPolicy, Row};
use crate::error::{ExportError, ExportResult};
use chrono::NaiveDate;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tcg_model::{ComplianceMetrics, TestCaseRecord};

/// Aggregate columns repeated on every compliance report row
///
/// `file_id` is left out on purpose.
pub const COMPLIANCE_META_KEYS: [&str; 5] = [
    "total_test_cases",
    "last_updated",
    "compliance_tags",
    "compliance_counts",
    "risk_counts",
];

/// Columns of `test_cases.csv`
pub const TEST_CASE_COLUMNS: [&str; 13] = [
    "file_id",
    "req_id",
    "req_title_id",
    "req_title",
    "req_description",
    "tc_id",
    "tc_title",
    "tc_description",
    "expected_result",
    "input_data",
    "compliance_tags",
    "risk",
    "created_at",
];

/// File name of the test-case export
pub const TEST_CASES_FILE_NAME: &str = "test_cases.csv";

/// `compliance_report_all_<YYYY-MM-DD>.csv`
#[must_use]
pub fn compliance_report_file_name(date: NaiveDate) -> String {
    format!("compliance_report_all_{}.csv", date.format("%Y-%m-%d"))
}

/// Render a compliance report
///
/// One row per metrics record: the aggregate columns, then every key the
/// records carry in first-seen order. With no records a single row of
/// aggregate values is written.
///
/// # Errors
/// Returns [`ExportError::Json`] if the aggregate cannot be serialized.
pub fn compliance_report_csv(metrics: &ComplianceMetrics) -> ExportResult<String> {
    let aggregate = match serde_json::to_value(metrics)? {
        Value::Object(map) => map,
        _ => Row::new(),
    };
    let mut meta = Row::new();
    for key in COMPLIANCE_META_KEYS {
        meta.insert(
            key.to_string(),
            aggregate.get(key).cloned().unwrap_or(Value::Null),
        );
    }

    let rows: Vec<Row> = if metrics.test_cases.is_empty() {
        vec![meta]
    } else {
        metrics
            .test_cases
            .iter()
            .map(|record| {
                let mut row = meta.clone();
                for (key, value) in record.fields() {
                    if !row.contains_key(key) {
                        row.insert(key.clone(), value.clone());
                    }
                }
                row
            })
            .collect()
    };

    let csv = to_csv(&rows, &HeaderPolicy::prefix(&COMPLIANCE_META_KEYS));
    tracing::debug!(rows = rows.len(), bytes = csv.len(), "rendered compliance report");
    Ok(csv)
}

/// Render the flat test-case listing
#[must_use]
pub fn test_cases_csv(records: &[TestCaseRecord]) -> String {
    let rows: Vec<Row> = records.iter().map(test_case_row).collect();
    to_csv(&rows, &HeaderPolicy::fixed(&TEST_CASE_COLUMNS))
}

fn test_case_row(record: &TestCaseRecord) -> Row {
    let text = |s: &str| Value::String(s.to_string());
    let optional = |s: &Option<String>| s.clone().map_or(Value::Null, Value::String);
    let tags = record
        .compliance_tags
        .iter()
        .map(|t| Value::String(t.to_string()))
        .collect();

    let mut row = Row::new();
    row.insert("file_id".into(), optional(&record.file_id));
    row.insert("req_id".into(), text(&record.req_id));
    row.insert("req_title_id".into(), text(&record.req_title_id));
    row.insert("req_title".into(), text(&record.req_title));
    row.insert("req_description".into(), text(&record.req_description));
    row.insert("tc_id".into(), text(&record.tc_id));
    row.insert("tc_title".into(), text(&record.tc_title));
    row.insert("tc_description".into(), text(&record.tc_description));
    row.insert("expected_result".into(), text(&record.expected_result));
    row.insert("input_data".into(), text(&record.input_data));
    row.insert("compliance_tags".into(), Value::Array(tags));
    row.insert("risk".into(), optional(&record.risk));
    row.insert("created_at".into(), optional(&record.created_at));
    row
}

/// Write `contents` to `dir/file_name`, creating `dir` if needed
///
/// # Errors
/// Returns [`ExportError::Io`] naming the path that failed.
pub fn write_export(dir: &Path, file_name: &str, contents: &str) -> ExportResult<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| ExportError::io(dir, e))?;
    let path = dir.join(file_name);
    std::fs::write(&path, contents).map_err(|e| ExportError::io(&path, e))?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "export written");
    Ok(path)
}
