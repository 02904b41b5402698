use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::HashSet;
use tcg_matrix::{
    build_matrix, build_matrix_with_catalog, filter_test_cases, group_by_requirement, MatrixFilter,
    ViewAction, ViewState,
};
use tcg_model::{TestCasesPayload, TestStatus};
use tcg_test_utils::{arb_records, nested_payload_json, flat_payload_json, sample_catalog, sample_records};

#[test]
fn sample_matrix() {
    let model = build_matrix(&sample_records());

    assert_eq!(model.requirements().len(), 2);
    assert_eq!(model.test_cases().len(), 2);
    assert_eq!(model.coverage(), 100);
    assert!(model.is_linked("TC-001", "R1"));
    assert!(model.is_linked("TC-001", "R2"));
    assert!(!model.is_linked("TC-002", "R1"));
    assert_eq!(model.metrics().status_counts.get(TestStatus::Passed), 1);
    assert_eq!(model.metrics().status_counts.get(TestStatus::Failed), 1);
}

#[test]
fn catalog_counts_untested_requirement() {
    let model = build_matrix_with_catalog(&sample_catalog(), &sample_records());
    assert_eq!(model.metrics().total_requirements, 3);
    assert_eq!(model.metrics().requirements_with_test_cases, 2);
    assert_eq!(model.coverage(), 67);
}

#[test]
fn compliance_filter_scenario() {
    let model = build_matrix(&sample_records());
    let found = filter_test_cases(&model, &MatrixFilter::new().with_compliance("FDA"));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].tc_id, "TC-001");
}

#[test]
fn either_payload_layout_builds_same_matrix() {
    let flat = TestCasesPayload::from_value(&flat_payload_json()).unwrap().into_records();
    let nested = TestCasesPayload::from_value(&nested_payload_json()).unwrap().into_records();
    assert_eq!(build_matrix(&flat), build_matrix(&nested));
}

#[test]
fn grouping_sample() {
    let groups = group_by_requirement(&sample_records(), &sample_catalog(), None);
    let keys: Vec<&str> = groups.iter().map(|g| g.requirement_id.as_str()).collect();
    assert_eq!(keys, ["R1", "R2"]);
    assert_eq!(groups[1].test_cases.len(), 2);
}

proptest! {
    #[test]
    fn prop_requirement_count_is_distinct_keys(records in arb_records()) {
        let model = build_matrix(&records);
        let keys: HashSet<&str> = records.iter().map(|r| r.req_id.as_str()).collect();
        prop_assert_eq!(model.requirements().len(), keys.len());
    }

    #[test]
    fn prop_details_sum_is_distinct_pairs(records in arb_records()) {
        let model = build_matrix(&records);
        let tcs: HashSet<&str> = records.iter().map(|r| r.tc_id.as_str()).collect();
        let pairs: HashSet<(&str, &str)> = records
            .iter()
            .map(|r| (r.tc_id.as_str(), r.req_id.as_str()))
            .collect();

        prop_assert_eq!(model.test_cases().len(), tcs.len());
        let details: usize = model.test_cases().iter().map(|tc| tc.details.len()).sum();
        prop_assert_eq!(details, pairs.len());
        prop_assert_eq!(model.incidence_count(), pairs.len());
    }

    #[test]
    fn prop_incidence_matches_details(records in arb_records()) {
        let model = build_matrix(&records);
        for key in model.incidence() {
            let tc = model.test_case(&key.tc_id);
            prop_assert!(tc.is_some_and(|tc| tc.links(&key.req_id)));
        }
        for tc in model.test_cases() {
            for detail in &tc.details {
                prop_assert!(model.is_linked(&tc.tc_id, &detail.req_id));
            }
        }
    }

    #[test]
    fn prop_coverage_bounds(records in arb_records()) {
        let model = build_matrix(&records);
        if records.is_empty() {
            prop_assert_eq!(model.coverage(), 0);
        } else {
            prop_assert_eq!(model.coverage(), 100);
        }
        prop_assert!(build_matrix_with_catalog(&sample_catalog(), &records).coverage() <= 100);
    }

    #[test]
    fn prop_status_tally_covers_every_test_case(records in arb_records()) {
        let model = build_matrix(&records);
        prop_assert_eq!(model.metrics().status_counts.total(), model.test_cases().len());
    }

    #[test]
    fn prop_unset_filter_is_identity(records in arb_records()) {
        let model = build_matrix(&records);
        let all: Vec<&str> = model.test_cases().iter().map(|tc| tc.tc_id.as_str()).collect();
        let visible: Vec<&str> = ViewState::new()
            .visible(&model)
            .into_iter()
            .map(|tc| tc.tc_id.as_str())
            .collect();
        prop_assert_eq!(visible, all);
    }

    #[test]
    fn prop_filters_narrow(records in arb_records(), tag in prop::sample::select(vec!["FDA", "HIPAA", "GDPR"])) {
        let model = build_matrix(&records);
        let by_tag = filter_test_cases(&model, &MatrixFilter::new().with_compliance(tag)).len();
        let by_tag_and_req = ViewState::new()
            .apply(ViewAction::FilterCompliance(Some(tag.to_string())))
            .apply(ViewAction::HighlightRequirement("R0".to_string()))
            .visible(&model)
            .len();
        prop_assert!(by_tag_and_req <= by_tag);
        prop_assert!(by_tag <= model.test_cases().len());
    }

    #[test]
    fn prop_deterministic(records in arb_records()) {
        prop_assert_eq!(build_matrix(&records), build_matrix(&records));
    }
}
