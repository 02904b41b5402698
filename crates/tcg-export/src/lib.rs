//! TCG Export - quoted CSV for compliance reports and test cases
//!
//! Both exports share one writer ([`to_csv`]) that quotes every cell. Column
//! order is deterministic: a fixed list, or a fixed prefix followed by the
//! keys the rows carry in first-seen order.
//!
//! # Example
//!
//! ```rust,ignore
//! use tcg_export::{compliance_report_csv, compliance_report_file_name, write_export};
//!
//! let csv = compliance_report_csv(&metrics)?;
//! write_export(dir, &compliance_report_file_name(today), &csv)?;
//! ```

#![warn(unreachable_pub)]

pub mod csv;
pub mod error;
pub mod report;

pub use csv::{cell_text, quote, to_csv, HeaderPolicy, Row};
pub use error::{ExportError, ExportResult};
pub use report::{
    compliance_report_csv, compliance_report_file_name, test_cases_csv, write_export,
    COMPLIANCE_META_KEYS, TEST_CASES_FILE_NAME, TEST_CASE_COLUMNS,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
