//! Quoted CSV writer shared by every export
//!
//! Output rules:
//! - every cell, header cells included, is wrapped in double quotes
//! - embedded quotes are doubled
//! - rows are joined with `\n`, no trailing newline
//!
//! Cells are stringified by [`cell_text`]: `null` is empty, arrays are
//! joined with `"; "` (object items as JSON), objects are JSON, other
//! primitives print as-is.

use serde_json::{Map, Value};

/// One export row: column name → value
pub type Row = Map<String, Value>;

/// Which columns a CSV has and in what order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderPolicy {
    /// Exactly these columns
    Fixed(Vec<String>),
    /// These columns first, then every other key in first-seen row order
    PrefixThenObserved(Vec<String>),
}

impl HeaderPolicy {
    /// Fixed columns from string literals
    #[must_use]
    pub fn fixed(columns: &[&str]) -> Self {
        Self::Fixed(columns.iter().map(|c| (*c).to_string()).collect())
    }

    /// Prefix columns from string literals
    #[must_use]
    pub fn prefix(columns: &[&str]) -> Self {
        Self::PrefixThenObserved(columns.iter().map(|c| (*c).to_string()).collect())
    }

    /// Resolve the header row for `rows`
    #[must_use]
    pub fn headers(&self, rows: &[Row]) -> Vec<String> {
        match self {
            Self::Fixed(columns) => columns.clone(),
            Self::PrefixThenObserved(prefix) => {
                let mut headers = prefix.clone();
                for row in rows {
                    for key in row.keys() {
                        if !headers.iter().any(|h| h == key) {
                            headers.push(key.clone());
                        }
                    }
                }
                headers
            }
        }
    }
}

/// Stringify one value for a cell
#[must_use]
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                Value::Null => "null".to_string(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        Value::Object(_) | Value::Number(_) | Value::Bool(_) => value.to_string(),
    }
}

/// Quote a cell unconditionally
#[must_use]
pub fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

fn join_line<I>(cells: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    cells
        .into_iter()
        .map(|c| quote(c.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Render rows as quoted CSV
///
/// A column a row lacks renders as an empty cell.
#[must_use]
pub fn to_csv(rows: &[Row], policy: &HeaderPolicy) -> String {
    let headers = policy.headers(rows);
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(join_line(&headers));
    for row in rows {
        lines.push(join_line(
            headers
                .iter()
                .map(|h| row.get(h).map(cell_text).unwrap_or_default()),
        ));
    }
    lines.join("\n")
}
