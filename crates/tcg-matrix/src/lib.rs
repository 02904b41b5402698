//! TCG Matrix - traceability aggregation and the views built on it
//!
//! Turns flat test-case records into a requirement/test-case matrix and
//! supports the screens that read it:
//! - [`build_matrix`] and [`build_matrix_with_catalog`] fold records into a
//!   [`MatrixModel`] with coverage and status metrics
//! - [`filter_test_cases`] applies the live filters
//! - [`ViewState`] holds screen state as pure transitions
//! - [`group_by_requirement`] lists test cases under catalog requirements
//! - [`ComplianceView`] filters compliance metrics by tag and time window
//!
//! # Example
//!
//! ```rust,ignore
//! use tcg_matrix::{build_matrix, filter_test_cases, MatrixFilter};
//!
//! let model = build_matrix(&records);
//! let fda = filter_test_cases(&model, &MatrixFilter::new().with_compliance("FDA"));
//! println!("coverage {}%", model.coverage());
//! ```

#![warn(unreachable_pub)]

pub mod compliance;
pub mod detail;
pub mod error;
pub mod filter;
pub mod grouping;
pub mod matrix;
pub mod view;

pub use compliance::{ComplianceFilter, ComplianceView, Share, TimeWindow};
pub use detail::{all_compliance_tags, description_steps, has_input_data, pretty_input_data};
pub use error::{MatrixError, MatrixResult};
pub use filter::{filter_test_cases, MatrixFilter};
pub use grouping::{group_by_requirement, GroupedRequirement, UNMATCHED_KEY, UNMATCHED_TITLE};
pub use matrix::{
    build_matrix, build_matrix_with_catalog, rounded_percent, IncidenceKey, MatrixMetrics,
    MatrixModel, MatrixRequirement, MatrixTestCase, StatusCounts,
};
pub use view::{ViewAction, ViewState};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for matrix consumers
    pub use crate::{
        build_matrix, build_matrix_with_catalog, filter_test_cases, MatrixFilter, MatrixModel,
        MatrixTestCase, ViewAction, ViewState,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
