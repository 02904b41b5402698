//! Error types for CSV export

use std::path::PathBuf;

/// Errors raised while producing or writing an export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Writing the file failed
    #[error("failed to write {path}: {source}")]
    Io {
        /// Target file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A value could not be turned into JSON for a cell
    #[error("failed to serialize export row: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExportError {
    /// Create io error for a target path
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for export operations
pub type ExportResult<T> = Result<T, ExportError>;
