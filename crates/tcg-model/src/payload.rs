//! `GET /test-cases/` payload normalisation
//!
//! The endpoint has returned two layouts over time:
//!
//! ```text
//! flat:    [ { tc_id, req_id, req_title_id, ... }, ... ]
//! nested:  { "requirements": [ { req_title_id, req_title, requirement_description,
//!                                test_cases: [ { tc_id, ... } ] } ] }
//! ```
//!
//! plus wrapper objects (`{"data": [...]}`, `{"test_cases": [...]}`) around
//! the flat form. [`TestCasesPayload`] recognises all of them and
//! [`TestCasesPayload::into_records`] folds them into flat records, so nothing
//! downstream ever sees the ambiguity.

use crate::error::{json_type_name, ModelError, ModelResult};
use crate::fields::text;
use crate::record::{canonical_key, TestCaseRecord};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// One requirement group in the nested layout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementGroup {
    /// Requirement id, when the group carries one
    pub requirement_id: String,
    /// Requirement title id
    pub req_title_id: String,
    /// Requirement title
    pub req_title: String,
    /// Requirement description
    pub requirement_description: String,
    /// Test cases nested under the requirement
    pub test_cases: Vec<TestCaseRecord>,
}

impl RequirementGroup {
    fn from_map(map: &Map<String, Value>) -> ModelResult<Self> {
        let test_cases = match map.get("test_cases") {
            Some(Value::Array(items)) => items
                .iter()
                .map(TestCaseRecord::from_value)
                .collect::<ModelResult<Vec<_>>>()?,
            _ => Vec::new(),
        };
        Ok(Self {
            requirement_id: text(map, &["requirement_id", "req_id"]),
            req_title_id: text(map, &["req_title_id"]),
            req_title: text(map, &["req_title", "title"]),
            requirement_description: text(map, &["requirement_description", "req_description"]),
            test_cases,
        })
    }

    /// Flatten, stamping the group's requirement fields onto every record
    fn into_records(self) -> impl Iterator<Item = TestCaseRecord> {
        let req_id = canonical_key(&self.requirement_id, &self.req_title_id).to_string();
        let req_title_id = self.req_title_id;
        let req_title = self.req_title;
        let req_description = self.requirement_description;
        self.test_cases.into_iter().map(move |mut record| {
            record.req_id.clone_from(&req_id);
            record.req_title_id.clone_from(&req_title_id);
            record.req_title.clone_from(&req_title);
            record.req_description.clone_from(&req_description);
            record
        })
    }
}

/// Either layout of the test-case listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestCasesPayload {
    /// Flat list of records
    Flat(Vec<TestCaseRecord>),
    /// Records nested under requirement groups
    Nested(Vec<RequirementGroup>),
}

impl TestCasesPayload {
    /// Parse a response body
    ///
    /// # Errors
    /// Returns an error if the body is not JSON or matches no known layout.
    pub fn from_json(body: &str) -> ModelResult<Self> {
        let value: Value = serde_json::from_str(body)?;
        Self::from_value(&value)
    }

    /// Recognise the layout of an already-parsed body
    ///
    /// # Errors
    /// Returns [`ModelError::UnrecognizedPayload`] for unknown layouts.
    pub fn from_value(value: &Value) -> ModelResult<Self> {
        match value {
            Value::Array(items) => Ok(Self::Flat(flat_records(items)?)),
            Value::Object(map) => {
                if let Some(Value::Array(groups)) = map.get("requirements") {
                    let groups = groups
                        .iter()
                        .map(|group| {
                            group
                                .as_object()
                                .ok_or_else(|| ModelError::not_an_object("requirement group", group))
                                .and_then(RequirementGroup::from_map)
                        })
                        .collect::<ModelResult<Vec<_>>>()?;
                    tracing::debug!(groups = groups.len(), "nested test-case payload");
                    return Ok(Self::Nested(groups));
                }
                for key in ["data", "test_cases"] {
                    if let Some(Value::Array(items)) = map.get(key) {
                        tracing::debug!(wrapper = key, records = items.len(), "wrapped test-case payload");
                        return Ok(Self::Flat(flat_records(items)?));
                    }
                }
                let keys: Vec<&str> = map.keys().map(String::as_str).collect();
                Err(ModelError::UnrecognizedPayload(format!(
                    "object with keys [{}]",
                    keys.join(", ")
                )))
            }
            Value::Null => Ok(Self::Flat(Vec::new())),
            other => Err(ModelError::UnrecognizedPayload(
                json_type_name(other).to_string(),
            )),
        }
    }

    /// Canonical flat record sequence, in payload order
    #[must_use]
    pub fn into_records(self) -> Vec<TestCaseRecord> {
        match self {
            Self::Flat(records) => records,
            Self::Nested(groups) => groups
                .into_iter()
                .flat_map(RequirementGroup::into_records)
                .collect(),
        }
    }

    /// Number of records either layout will flatten to
    #[must_use]
    pub fn record_count(&self) -> usize {
        match self {
            Self::Flat(records) => records.len(),
            Self::Nested(groups) => groups.iter().map(|g| g.test_cases.len()).sum(),
        }
    }
}

impl<'de> Deserialize<'de> for TestCasesPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

fn flat_records(items: &[Value]) -> ModelResult<Vec<TestCaseRecord>> {
    items.iter().map(TestCaseRecord::from_value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn flat_array_passes_through() {
        let payload = TestCasesPayload::from_value(&json!([
            { "tc_id": "TC1", "req_id": "R1" },
            { "tc_id": "TC1", "req_id": "R2" }
        ]))
        .unwrap();
        assert_eq!(payload.record_count(), 2);
        let records = payload.into_records();
        assert_eq!(records[1].req_id, "R2");
    }

    #[test]
    fn nested_groups_stamp_requirement_fields() {
        let payload = TestCasesPayload::from_value(&json!({
            "requirements": [{
                "req_title_id": "REQ-001",
                "req_title": "Login",
                "requirement_description": "Users log in",
                "test_cases": [
                    { "tc_id": "TC1", "tc_title": "Valid", "compliance_tags": ["FDA"] },
                    { "tc_id": "TC2", "tc_title": "Invalid", "req_id": "stale" }
                ]
            }]
        }))
        .unwrap();

        let records = payload.into_records();
        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(record.req_id, "REQ-001");
            assert_eq!(record.req_title, "Login");
            assert_eq!(record.req_description, "Users log in");
        }
        assert_eq!(records[0].compliance_tags.as_slice(), ["FDA"]);
    }

    #[test]
    fn nested_prefers_requirement_id() {
        let payload = TestCasesPayload::from_value(&json!({
            "requirements": [{
                "requirement_id": "R1",
                "req_title_id": "REQ-001",
                "test_cases": [{ "tc_id": "TC1" }]
            }]
        }))
        .unwrap();
        let records = payload.into_records();
        assert_eq!(records[0].req_id, "R1");
        assert_eq!(records[0].req_title_id, "REQ-001");
    }

    #[test]
    fn wrapped_lists_accepted() {
        for key in ["data", "test_cases"] {
            let mut body = Map::new();
            body.insert(key.to_string(), json!([{ "tc_id": "TC1" }]));
            let payload = TestCasesPayload::from_value(&Value::Object(body)).unwrap();
            assert_eq!(payload.record_count(), 1);
        }
    }

    #[test]
    fn null_is_empty() {
        let payload = TestCasesPayload::from_value(&Value::Null).unwrap();
        assert!(payload.into_records().is_empty());
    }

    #[test]
    fn unknown_shapes_rejected() {
        let err = TestCasesPayload::from_value(&json!({ "items": [] })).unwrap_err();
        assert!(err.to_string().contains("items"));

        let err = TestCasesPayload::from_value(&json!(12)).unwrap_err();
        assert!(matches!(err, ModelError::UnrecognizedPayload(_)));
    }

    #[test]
    fn from_json_reports_syntax() {
        assert!(matches!(
            TestCasesPayload::from_json("[{"),
            Err(ModelError::Json(_))
        ));
    }
}
