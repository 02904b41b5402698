//! Compliance tag normalisation
//!
//! Tags travel as a comma-separated string on the wire, as a pipe-separated
//! string in some renderings, and occasionally as a JSON array. In memory they
//! are always an ordered sequence: trimmed, non-empty, deduplicated, first
//! occurrence wins. Matching is case-sensitive.

use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters accepted as tag separators when parsing delimited text
pub const TAG_DELIMITERS: [char; 3] = [',', '|', ';'];

/// Ordered, deduplicated set of compliance tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ComplianceTags(Vec<String>);

impl ComplianceTags {
    /// Create empty tag set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse delimited text (`,`, `|` or `;`)
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        raw.split(TAG_DELIMITERS).collect()
    }

    /// Add every tag of a delimited string
    pub fn insert_delimited(&mut self, raw: &str) {
        for tag in raw.split(TAG_DELIMITERS) {
            self.insert(tag);
        }
    }

    /// Add one array element: strings are split, numbers and booleans taken as text
    fn insert_element(&mut self, value: &serde_json::Value) {
        if let Some(text) = crate::fields::scalar_text(value) {
            self.insert_delimited(&text);
        }
    }

    /// Add a tag, ignoring blanks and duplicates
    ///
    /// Returns `true` if the tag was new.
    pub fn insert(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.0.push(tag.to_string());
        true
    }

    /// Merge another tag set, keeping this set's order first
    pub fn extend_from(&mut self, other: &ComplianceTags) {
        for tag in other.iter() {
            self.insert(tag);
        }
    }

    /// Case-sensitive membership test
    #[inline]
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    /// Iterate in order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Tags as a slice
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Number of tags
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no tags
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Comma-separated wire form (`"FDA, ISO 13485"`)
    #[must_use]
    pub fn to_wire(&self) -> String {
        self.0.join(", ")
    }

    /// Pipe-separated badge form (`"FDA|ISO 13485"`)
    #[must_use]
    pub fn to_pipe(&self) -> String {
        self.0.join("|")
    }
}

impl<S: AsRef<str>> FromIterator<S> for ComplianceTags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tags = Self::new();
        for tag in iter {
            tags.insert(tag.as_ref());
        }
        tags
    }
}

impl fmt::Display for ComplianceTags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl<'a> IntoIterator for &'a ComplianceTags {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for ComplianceTags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for tag in &self.0 {
            seq.serialize_element(tag)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for ComplianceTags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TagsVisitor)
    }
}

struct TagsVisitor;

impl<'de> Visitor<'de> for TagsVisitor {
    type Value = ComplianceTags;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a delimited tag string or an array of tags")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(ComplianceTags::parse(value))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ComplianceTags::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ComplianceTags::new())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut tags = ComplianceTags::new();
        while let Some(item) = seq.next_element::<serde_json::Value>()? {
            tags.insert_element(&item);
        }
        Ok(tags)
    }
}

impl From<&serde_json::Value> for ComplianceTags {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Self::parse(s),
            serde_json::Value::Array(items) => {
                let mut tags = Self::new();
                for item in items {
                    tags.insert_element(item);
                }
                tags
            }
            _ => Self::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_trims_whitespace() {
        let tags = ComplianceTags::parse("FDA, ISO 13485");
        assert_eq!(tags.as_slice(), ["FDA", "ISO 13485"]);

        let tags = ComplianceTags::parse("  FDA ,ISO 13485  ");
        assert_eq!(tags.as_slice(), ["FDA", "ISO 13485"]);
    }

    #[test]
    fn parse_accepts_pipe_and_semicolon() {
        assert_eq!(
            ComplianceTags::parse("FDA|IEC 62304|ISO 13485").as_slice(),
            ["FDA", "IEC 62304", "ISO 13485"]
        );
        assert_eq!(
            ComplianceTags::parse("HIPAA; GDPR").as_slice(),
            ["HIPAA", "GDPR"]
        );
    }

    #[test]
    fn duplicates_and_blanks_dropped() {
        let tags = ComplianceTags::parse("FDA,,FDA, |HIPAA");
        assert_eq!(tags.as_slice(), ["FDA", "HIPAA"]);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let tags = ComplianceTags::parse("FDA,fda");
        assert_eq!(tags.len(), 2);
        assert!(tags.contains("FDA"));
        assert!(!tags.contains("Fda"));
    }

    #[test]
    fn forms_agree() {
        let from_wire = ComplianceTags::parse("FDA, ISO 13485");
        let from_pipe = ComplianceTags::parse(&from_wire.to_pipe());
        assert_eq!(from_wire, from_pipe);
        assert_eq!(from_wire.to_wire(), "FDA, ISO 13485");
        assert_eq!(from_wire.to_pipe(), "FDA|ISO 13485");
    }

    #[test]
    fn deserialize_string_array_and_null() {
        let tags: ComplianceTags = serde_json::from_str(r#""FDA,HIPAA""#).unwrap();
        assert_eq!(tags.as_slice(), ["FDA", "HIPAA"]);

        let tags: ComplianceTags = serde_json::from_str(r#"[" FDA", "HIPAA", null, "FDA"]"#).unwrap();
        assert_eq!(tags.as_slice(), ["FDA", "HIPAA"]);

        let tags: ComplianceTags = serde_json::from_str("null").unwrap();
        assert!(tags.is_empty());
    }

    #[test]
    fn array_elements_are_split_like_strings() {
        let tags: ComplianceTags = serde_json::from_str(r#"["FDA|HIPAA", "GDPR; FDA"]"#).unwrap();
        assert_eq!(tags.as_slice(), ["FDA", "HIPAA", "GDPR"]);
        assert_eq!(ComplianceTags::parse(&tags.to_pipe()), tags);
    }

    #[test]
    fn both_array_paths_agree() {
        let raw = serde_json::json!(["FDA|HIPAA", 62304, true, null, { "x": 1 }]);
        let decoded: ComplianceTags = serde_json::from_value(raw.clone()).unwrap();
        let converted = ComplianceTags::from(&raw);
        assert_eq!(decoded, converted);
        assert_eq!(decoded.as_slice(), ["FDA", "HIPAA", "62304", "true"]);
    }

    #[test]
    fn serializes_as_sequence() {
        let tags = ComplianceTags::parse("FDA|GDPR");
        assert_eq!(serde_json::to_string(&tags).unwrap(), r#"["FDA","GDPR"]"#);
    }
}
