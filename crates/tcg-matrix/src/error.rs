//! Error types for matrix views

/// Errors raised while configuring matrix or compliance views
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatrixError {
    /// Time window name outside `all|7days|30days|90days|year`
    #[error("unknown time window: {0}")]
    UnknownWindow(String),
}

/// Result type alias for matrix operations
pub type MatrixResult<T> = Result<T, MatrixError>;
