//! TCG Model - wire types for the test-case generation backend
//!
//! Everything the REST boundary hands us, in one canonical in-memory form:
//! - Requirements and flat test-case records
//! - Compliance tags normalised to an ordered, deduplicated sequence
//! - Execution status and risk enumerations
//! - The two `GET /test-cases/` payload shapes, folded into flat records
//! - Aggregated compliance metrics
//!
//! # Example
//!
//! ```rust,ignore
//! use tcg_model::TestCasesPayload;
//!
//! let payload = TestCasesPayload::from_json(body)?;
//! let records = payload.into_records();
//! ```

#![warn(unreachable_pub)]

pub mod api;
pub mod compliance;
pub mod error;
mod fields;
pub mod payload;
pub mod record;
pub mod status;
pub mod tags;
pub mod time;

pub use api::{
    ExtractionResponse, FileInfo, GenerationResponse, ImproveRequest, ImproveResponse,
    JiraPushResponse, UploadResponse,
};
pub use compliance::{ComplianceMetrics, MetricsRecord, ALL_FILES};
pub use error::{ModelError, ModelResult};
pub use payload::{RequirementGroup, TestCasesPayload};
pub use record::{canonical_key, Requirement, TestCaseRecord};
pub use status::{RiskLevel, TestStatus};
pub use tags::{ComplianceTags, TAG_DELIMITERS};
pub use time::{parse_date, parse_timestamp};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with TCG wire types
    pub use crate::{
        ComplianceMetrics, ComplianceTags, Requirement, RiskLevel, TestCaseRecord,
        TestCasesPayload, TestStatus,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
