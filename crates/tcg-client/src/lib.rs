//! TCG Client - REST boundary and dashboard service
//!
//! - [`TestCaseBackend`]: every backend endpoint as an async trait
//! - [`HttpBackend`]: reqwest implementation
//! - [`ClientConfig`]: backend address, loaded from TOML and the environment
//! - [`Dashboard`]: owns the current matrix snapshot, runs the screen operations
//!
//! # Example
//!
//! ```rust,ignore
//! use tcg_client::{ClientConfig, Dashboard, HttpBackend};
//!
//! let config = ClientConfig::load(None)?;
//! let dashboard = Dashboard::new(HttpBackend::new(&config)?);
//! let snapshot = dashboard.load_matrix().await?;
//! println!("coverage {}%", snapshot.model.coverage());
//! ```

#![warn(unreachable_pub)]

pub mod backend;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod http;

pub use backend::{TestCaseBackend, UploadRequest};
pub use config::{ClientConfig, DEFAULT_API_PREFIX, DEFAULT_BASE_URL};
pub use dashboard::{Dashboard, GenerationOutcome, Snapshot};
pub use error::{ApiError, ApiResult, ConfigError, DashboardError, DashboardResult};
pub use http::{error_message, HttpBackend};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for dashboard consumers
    pub use crate::{ClientConfig, Dashboard, DashboardError, HttpBackend, TestCaseBackend};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
