//! Error types for the REST boundary and the dashboard service
//!
//! Maps the failure taxonomy onto variants:
//! - transport failures → [`ApiError::Transport`]
//! - non-2xx responses → [`ApiError::Status`] with the best message the body offers
//! - bodies that do not decode → [`ApiError::Decode`]

use std::path::PathBuf;
use tcg_export::ExportError;
use tcg_model::ModelError;

/// Errors raised by a backend call
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request never produced a response
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("request failed with status {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// `detail`/`message` from the body, or the status text
        message: String,
    },

    /// Response body did not decode
    #[error("invalid response from {endpoint}: {source}")]
    Decode {
        /// Endpoint path
        endpoint: String,
        /// Underlying error
        #[source]
        source: ModelError,
    },

    /// Configured API root cannot carry endpoint segments
    #[error("invalid api url {url}: {reason}")]
    InvalidUrl {
        /// Offending URL
        url: String,
        /// Parser message
        reason: String,
    },

    /// A file to upload could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    /// Create decode error
    #[must_use]
    pub fn decode(endpoint: impl Into<String>, source: impl Into<ModelError>) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            source: source.into(),
        }
    }

    /// Check if the request never reached the backend
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// HTTP status, if the backend answered
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Message suitable for showing inline
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for backend calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors raised while loading client configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    /// A setting has an unusable value
    #[error("invalid value for {key}: {value}")]
    InvalidValue {
        /// Setting name
        key: &'static str,
        /// Offending value
        value: String,
    },
}

/// Errors raised by dashboard operations
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// A backend call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Generation was requested with nothing selected
    #[error("please select at least one requirement")]
    NoSelection,

    /// At least one request of a concurrent batch failed
    #[error("generation failed for a batch of {total} requirements: {source}")]
    BatchFailed {
        /// Requests in the batch
        total: usize,
        /// First failure observed
        #[source]
        source: ApiError,
    },

    /// Writing an export failed
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl DashboardError {
    /// Check if the failure came from a single backend call
    #[must_use]
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) | Self::BatchFailed { source: err, .. } => Some(err),
            _ => None,
        }
    }
}

/// Result type alias for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;
