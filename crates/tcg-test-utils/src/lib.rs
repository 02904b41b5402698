//! Testing utilities for the TCG workspace
//!
//! Shared fixtures, proptest strategies and a reference CSV reader.

#![allow(missing_docs)]

use proptest::prelude::*;
use serde_json::{json, Value};
use tcg_model::{Requirement, TestCaseRecord};

pub fn record(tc_id: &str, req_id: &str) -> TestCaseRecord {
    TestCaseRecord::new(tc_id, req_id).with_title(format!("{tc_id} title"))
}

/// Three requirements, the last one without test cases in [`sample_records`]
pub fn sample_catalog() -> Vec<Requirement> {
    vec![
        Requirement::new("R1", "REQ-001", "Patient login").with_description("Patients log in with MFA"),
        Requirement::new("R2", "REQ-002", "Record access").with_description("Clinicians read charts"),
        Requirement::new("R3", "REQ-003", "Audit trail").with_description("Every access is logged"),
    ]
}

pub fn sample_records() -> Vec<TestCaseRecord> {
    vec![
        TestCaseRecord::new("TC-001", "R1")
            .with_title("Valid MFA login")
            .with_requirement("REQ-001", "Patient login")
            .with_status("Passed")
            .with_tags("FDA, HIPAA")
            .with_input_data(r#"{"user":"pat01","otp":"123456"}"#),
        TestCaseRecord::new("TC-001", "R2")
            .with_title("Valid MFA login")
            .with_requirement("REQ-002", "Record access")
            .with_tags("HIPAA"),
        TestCaseRecord::new("TC-002", "R2")
            .with_title("Chart read denied")
            .with_requirement("REQ-002", "Record access")
            .with_status("Failed")
            .with_tags("ISO 13485"),
    ]
}

/// `GET /test-cases/` body in the flat layout
pub fn flat_payload_json() -> Value {
    json!([
        {
            "tc_id": "TC-001", "tc_title": "Valid MFA login", "req_id": "R1",
            "req_title_id": "REQ-001", "req_title": "Patient login",
            "compliance_tags": "FDA, HIPAA", "input_data": "{\"user\":\"pat01\"}",
            "status": "Passed", "risk": "High", "created_at": "2026-03-01T10:00:00"
        },
        {
            "tc_id": "TC-002", "tc_title": "Chart read denied", "req_id": "R2",
            "req_title_id": "REQ-002", "req_title": "Record access",
            "compliance_tags": ["ISO 13485"], "input_data": { "chart": 7 }
        }
    ])
}

/// `GET /test-cases/` body in the nested layout, same content as [`flat_payload_json`]
pub fn nested_payload_json() -> Value {
    json!({
        "requirements": [
            {
                "requirement_id": "R1", "req_title_id": "REQ-001", "req_title": "Patient login",
                "test_cases": [{
                    "tc_id": "TC-001", "tc_title": "Valid MFA login",
                    "compliance_tags": "FDA, HIPAA", "input_data": "{\"user\":\"pat01\"}",
                    "status": "Passed", "risk": "High", "created_at": "2026-03-01T10:00:00"
                }]
            },
            {
                "requirement_id": "R2", "req_title_id": "REQ-002", "req_title": "Record access",
                "test_cases": [{
                    "tc_id": "TC-002", "tc_title": "Chart read denied",
                    "compliance_tags": ["ISO 13485"], "input_data": { "chart": 7 }
                }]
            }
        ]
    })
}

/// `GET /jira/compliance-metrics` body
pub fn metrics_json() -> Value {
    json!({
        "file_id": "all",
        "total_test_cases": 2,
        "compliance_tags": ["FDA", "HIPAA"],
        "compliance_counts": { "FDA": 2, "HIPAA": 1 },
        "risk_counts": { "Critical": 0, "High": 1, "Medium": 0, "Low": 1 },
        "last_updated": "2026-03-01T10:00:00",
        "test_cases": [
            { "tc_id": "TC-001", "compliance_tags": ["FDA", "HIPAA"], "risk": "High", "created_at": "2026-03-01T10:00:00" },
            { "tc_id": "TC-002", "compliance_tags": ["FDA"], "risk": "Low", "created_at": null, "notes": "has \"quotes\"" }
        ]
    })
}

/// Read quoted CSV the standard way
///
/// Handles quoted and bare fields, doubled quotes, and separators or line
/// breaks inside quotes. Rows are split on `\n` (an optional `\r` before it
/// is dropped outside quotes). A trailing newline does not add a row.
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();
    let mut pending = false;

    while let Some(c) = chars.next() {
        pending = true;
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
                pending = false;
            }
            other => field.push(other),
        }
    }
    if pending {
        row.push(field);
        rows.push(row);
    }
    rows
}

prop_compose! {
    /// Record drawn from small id pools so that ids and pairs repeat
    pub fn arb_record()(
        tc in 0u8..6,
        req in 0u8..5,
        status in prop::sample::select(vec!["", "Passed", "Failed", "Blocked", "Not Executed", "Retest"]),
        tags in prop::sample::subsequence(vec!["FDA", "HIPAA", "GDPR", "ISO 13485"], 0..=4),
        expected in "[a-z]{0,6}",
    ) -> TestCaseRecord {
        let mut record = TestCaseRecord::new(format!("TC{tc}"), format!("R{req}"))
            .with_title(format!("Case {tc}"))
            .with_tags(&tags.join(", "));
        if !status.is_empty() {
            record = record.with_status(status);
        }
        record.expected_result = expected;
        record
    }
}

pub fn arb_records() -> impl Strategy<Value = Vec<TestCaseRecord>> {
    prop::collection::vec(arb_record(), 0..24)
}

/// Cell text free to contain separators, quotes and line breaks
pub fn arb_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,8}",
        "[a-z,\"\n; ]{0,8}",
        Just(String::new()),
        Just("\"\"".to_string()),
    ]
}
