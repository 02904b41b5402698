use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{Map, Value};
use tcg_export::{cell_text, compliance_report_csv, test_cases_csv, to_csv, HeaderPolicy, Row, TEST_CASE_COLUMNS};
use tcg_model::{ComplianceMetrics, TestCasesPayload};
use tcg_test_utils::{arb_cell, flat_payload_json, metrics_json, parse_csv};

fn rows_from(cells: &[Vec<String>], width: usize) -> Vec<Row> {
    cells
        .iter()
        .map(|cells| {
            let mut row = Map::new();
            for (i, cell) in cells.iter().take(width).enumerate() {
                row.insert(format!("col{i}"), Value::String(cell.clone()));
            }
            row
        })
        .collect()
}

#[test]
fn compliance_report_reads_back() {
    let metrics: ComplianceMetrics = serde_json::from_value(metrics_json()).unwrap();
    let parsed = parse_csv(&compliance_report_csv(&metrics).unwrap());

    assert_eq!(parsed.len(), 3);
    assert_eq!(
        parsed[0],
        ["total_test_cases", "last_updated", "compliance_tags", "compliance_counts", "risk_counts", "tc_id", "risk", "created_at", "notes"]
    );
    assert_eq!(parsed[1][0], "2");
    assert_eq!(parsed[1][2], "FDA; HIPAA");
    assert_eq!(parsed[1][3], r#"{"FDA":2,"HIPAA":1}"#);
    assert_eq!(parsed[2][5], "TC-002");
    assert_eq!(parsed[2][7], "");
    assert_eq!(parsed[2][8], "has \"quotes\"");
}

#[test]
fn test_cases_read_back() {
    let records = TestCasesPayload::from_value(&flat_payload_json()).unwrap().into_records();
    let parsed = parse_csv(&test_cases_csv(&records));

    assert_eq!(parsed[0], TEST_CASE_COLUMNS);
    assert_eq!(parsed.len(), 3);
    assert_eq!(parsed[1][5], "TC-001");
    assert_eq!(parsed[1][9], r#"{"user":"pat01"}"#);
    assert_eq!(parsed[1][10], "FDA; HIPAA");
    assert_eq!(parsed[2][9], r#"{"chart":7}"#);
}

proptest! {
    #[test]
    fn prop_csv_round_trips(
        width in 1usize..5,
        cells in prop::collection::vec(prop::collection::vec(arb_cell(), 5), 1..6),
    ) {
        let rows = rows_from(&cells, width);
        let columns: Vec<String> = (0..width).map(|i| format!("col{i}")).collect();
        let csv = to_csv(&rows, &HeaderPolicy::Fixed(columns.clone()));

        let parsed = parse_csv(&csv);
        prop_assert_eq!(&parsed[0], &columns);
        prop_assert_eq!(parsed.len(), rows.len() + 1);
        for (row, line) in rows.iter().zip(&parsed[1..]) {
            let expected: Vec<String> = columns.iter().map(|c| row.get(c).map(cell_text).unwrap_or_default()).collect();
            prop_assert_eq!(line, &expected);
        }
    }
}
